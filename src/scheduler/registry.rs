//! Bookkeeping that maps a pending wait to the session awaiting it.

use crate::session::{Interest, Resource, SessionError, SessionId, WaitRequest};

use std::collections::HashMap;

/// Mapping from a resource (plus declared interest) to the single session
/// suspended on it.
///
/// Invariant: at most one live entry per resource. The set of resources held
/// here is kept identical to the set registered with the poller; both are
/// only mutated from the loop's single control thread.
pub(crate) struct WaitRegistry {
    entries: HashMap<Resource, (Interest, SessionId)>,
}

impl WaitRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Installs a wait. Errors with [`SessionError::ResourceBusy`] if the
    /// resource already has a waiter; the existing entry is left untouched.
    pub(crate) fn register(
        &mut self,
        request: WaitRequest,
        session: SessionId,
    ) -> Result<(), SessionError> {
        if self.entries.contains_key(&request.resource) {
            return Err(SessionError::ResourceBusy(request.resource));
        }

        self.entries
            .insert(request.resource, (request.interest, session));

        Ok(())
    }

    /// Consumes the wait on `resource` if its declared interest intersects
    /// `fired`, returning the session to resume.
    ///
    /// Returns `None` for a resource with no waiter (stale notification,
    /// tolerated) and for a fired interest that does not satisfy the declared
    /// one; in the latter case the entry stays installed.
    pub(crate) fn resolve(&mut self, resource: Resource, fired: Interest) -> Option<SessionId> {
        let (declared, _) = self.entries.get(&resource)?;

        if !declared.intersects(fired) {
            return None;
        }

        self.entries.remove(&resource).map(|(_, session)| session)
    }

    /// Removes any pending wait on `resource`, regardless of interest. Used
    /// to keep the poller's registered set consistent when a registration is
    /// rolled back.
    pub(crate) fn cancel(&mut self, resource: Resource) -> Option<(Interest, SessionId)> {
        self.entries.remove(&resource)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
