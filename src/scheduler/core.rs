//! Event loop that drives sessions between suspension points.
//!
//! The scheduler admits sessions, advances each one until it suspends or
//! terminates, and blocks on the readiness reactor whenever every live
//! session is suspended. Exactly one session executes at any instant;
//! concurrency is interleaving on the loop's single thread, so no
//! synchronization is needed between sessions and the loop.

use crate::reactor::{Poller, Reactor};
use crate::scheduler::registry::WaitRegistry;
use crate::scheduler::slab::Slab;
use crate::session::{Inbound, Interest, Resource, Session, SessionError, SessionId, Step, WaitRequest};

use std::any::Any;
use std::collections::VecDeque;
use std::io;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

/// A failure fatal to the loop as a whole. Individual session failures are
/// not loop errors; they are collected in the [`RunReport`].
#[derive(Debug, Error)]
pub enum LoopError {
    /// The readiness poll itself failed. No further readiness information
    /// can be trusted, so the loop stops.
    #[error("readiness poll failed: {0}")]
    Poll(#[source] io::Error),

    /// The reactor could not be constructed.
    #[error("failed to create reactor: {0}")]
    Create(#[source] io::Error),
}

/// Per-run accounting of session outcomes.
///
/// Session failures are observable here (and logged) without ever halting
/// the loop; only a reactor-level failure terminates a run early.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Sessions that reached normal completion during this run.
    pub completed: usize,
    /// Sessions that terminated with a failure, in termination order.
    pub failures: Vec<(SessionId, SessionError)>,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Cooperative event loop for suspend/resume sessions.
///
/// Generic over the readiness [`Poller`] so tests can drive the loop with
/// synthetic readiness; production schedulers use the epoll [`Reactor`].
///
/// # Example
/// ```ignore
/// let mut scheduler = Scheduler::new()?;
/// let id = scheduler.submit(Box::new(relay_session));
/// let report = scheduler.run()?;
/// assert!(report.is_clean());
/// ```
pub struct Scheduler<P: Poller = Reactor> {
    poller: P,
    sessions: Slab<Box<dyn Session>>,
    registry: WaitRegistry,
    ready: VecDeque<(SessionId, Inbound)>,
}

impl Scheduler<Reactor> {
    /// Creates a scheduler backed by an epoll reactor with default batch
    /// capacity.
    pub fn new() -> Result<Self, LoopError> {
        Ok(Self::with_poller(
            Reactor::new().map_err(LoopError::Create)?,
        ))
    }
}

impl<P: Poller> Scheduler<P> {
    /// Creates a scheduler driven by the given poller.
    pub fn with_poller(poller: P) -> Self {
        Self {
            poller,
            sessions: Slab::new(),
            registry: WaitRegistry::new(),
            ready: VecDeque::new(),
        }
    }

    /// Admits a fresh, not-yet-started session. It receives its first
    /// resume, with [`Inbound::Start`], on the next loop iteration.
    pub fn submit(&mut self, session: Box<dyn Session>) -> SessionId {
        let id = SessionId(self.sessions.insert(session));
        self.ready.push_back((id, Inbound::Start));

        log::debug!("{id} submitted");

        id
    }

    /// Number of sessions currently suspended on a wait.
    pub fn pending_waits(&self) -> usize {
        self.registry.len()
    }

    /// Drives the loop to quiescence: returns once no session is running,
    /// queued, or suspended. Returns immediately if nothing was submitted.
    ///
    /// This is the only call in the crate that blocks the thread, and it
    /// blocks only inside the reactor's poll. Sessions made ready by one
    /// poll batch are all resumed, in the order the reactor reported them,
    /// before the next poll.
    pub fn run(&mut self) -> Result<RunReport, LoopError> {
        let mut report = RunReport::default();
        let mut batch: Vec<(Resource, Interest)> = Vec::new();

        loop {
            // Drain every ready session before considering blocking.
            while let Some((id, inbound)) = self.ready.pop_front() {
                self.advance(id, inbound, &mut report);
            }

            // No suspended sessions and nothing queued: all work is done.
            if self.registry.is_empty() {
                break;
            }

            batch.clear();
            self.poller.poll(&mut batch).map_err(LoopError::Poll)?;

            for &(resource, fired) in batch.iter() {
                match self.registry.resolve(resource, fired) {
                    Some(id) => {
                        if let Err(err) = self.poller.deregister(resource) {
                            log::warn!("failed to deregister {resource}: {err}");
                        }

                        self.ready.push_back((id, Inbound::Ready(fired)));
                    }
                    None => {
                        log::debug!("stale readiness for {resource}, ignored");
                    }
                }
            }
        }

        Ok(report)
    }

    /// Resumes one session and routes its outcome. Failures raised inside
    /// the resume, including panics, terminate only this session.
    fn advance(&mut self, id: SessionId, inbound: Inbound, report: &mut RunReport) {
        let mut session = match self.sessions.take(id.0) {
            Some(session) => session,
            None => return,
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| session.resume(inbound)));

        match outcome {
            Ok(Ok(Step::Wait(request))) => match self.install_wait(request, id) {
                Ok(()) => self.sessions.restore(id.0, session),
                Err(err) => self.terminate(id, session, Err(err), report),
            },
            Ok(Ok(Step::Done)) => self.terminate(id, session, Ok(()), report),
            Ok(Err(err)) => self.terminate(id, session, Err(err), report),
            Err(payload) => {
                let err = SessionError::Panicked(panic_message(payload));
                self.terminate(id, session, Err(err), report);
            }
        }
    }

    /// Installs a wait in the registry and the poller together, so the
    /// poller's registered set always matches the live registry entries. On
    /// a poller failure the registry entry is rolled back.
    fn install_wait(&mut self, request: WaitRequest, id: SessionId) -> Result<(), SessionError> {
        self.registry.register(request, id)?;

        if let Err(err) = self.poller.register(request.resource, request.interest) {
            self.registry.cancel(request.resource);
            return Err(SessionError::Io(err));
        }

        Ok(())
    }

    fn terminate(
        &mut self,
        id: SessionId,
        mut session: Box<dyn Session>,
        outcome: Result<(), SessionError>,
        report: &mut RunReport,
    ) {
        session.release();
        self.sessions.remove(id.0);

        match outcome {
            Ok(()) => {
                report.completed += 1;
                log::debug!("{id} completed");
            }
            Err(err) => {
                log::warn!("{id} failed: {err}");
                report.failures.push((id, err));
            }
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
