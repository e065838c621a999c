//! Fluent builder for Scheduler construction.
//!
//! Provides a builder pattern interface for creating and configuring
//! Scheduler instances.

use crate::reactor::core::DEFAULT_EVENT_CAPACITY;
use crate::reactor::{Poller, Reactor};
use crate::scheduler::{LoopError, Scheduler};

/// Builder for constructing Scheduler instances with a fluent API.
///
/// # Example
/// ```ignore
/// let scheduler = SchedulerBuilder::new().event_capacity(256).build()?;
/// ```
pub struct SchedulerBuilder {
    event_capacity: usize,
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerBuilder {
    /// Creates a new scheduler builder with default settings.
    pub fn new() -> Self {
        Self {
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Sets the maximum number of ready resources reported per poll batch.
    ///
    /// Larger batches mean fewer wakeups under load; resources beyond the
    /// batch size are simply reported by the next poll.
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Builds a scheduler backed by the epoll reactor.
    ///
    /// # Returns
    /// A newly constructed Scheduler, or [`LoopError::Create`] if the
    /// reactor could not be set up.
    pub fn build(self) -> Result<Scheduler, LoopError> {
        let reactor = Reactor::with_capacity(self.event_capacity).map_err(LoopError::Create)?;
        Ok(Scheduler::with_poller(reactor))
    }

    /// Builds a scheduler driven by a custom poller.
    ///
    /// This is the injection point for synthetic readiness sources, used by
    /// the crate's own loop tests.
    pub fn build_with_poller<P: Poller>(self, poller: P) -> Scheduler<P> {
        Scheduler::with_poller(poller)
    }
}
