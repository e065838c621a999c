//! Session abstraction and the suspend/resume protocol.
//!
//! A session is a sequential unit of work that shares the scheduler's thread
//! with other sessions by suspending instead of blocking. Each call to
//! [`Session::resume`] runs the session's logic synchronously until it either
//! declares a [`WaitRequest`] (suspends), finishes, or fails.

use std::fmt;
use std::io;
use std::os::unix::io::RawFd;

use thiserror::Error;

/// Opaque identity of an I/O endpoint, used as the registry key.
///
/// The scheduler and reactor only ever compare resources and hand them to the
/// OS readiness facility; they never read from or write to one. Ownership of
/// the underlying endpoint stays with the session that opened it.
///
/// # Example
/// ```ignore
/// let resource = Resource(pipe_read_end);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Resource(pub RawFd);

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource {}", self.0)
    }
}

/// Readiness condition(s) a session waits for on a resource.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Interest {
    Readable,
    Writable,
    Both,
}

impl Interest {
    /// Returns true if a notification fired for `fired` satisfies a wait
    /// declared with `self`. `Both` acts as the union on either side.
    pub fn intersects(self, fired: Interest) -> bool {
        match (self, fired) {
            (Interest::Both, _) | (_, Interest::Both) => true,
            (a, b) => a == b,
        }
    }
}

/// A declaration of which resource and readiness condition a session is
/// suspended on.
///
/// A wait request exists only while its session is suspended and is consumed
/// exactly once, when the resource becomes ready in the declared interest or
/// the wait is cancelled.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct WaitRequest {
    pub resource: Resource,
    pub interest: Interest,
}

impl WaitRequest {
    pub fn readable(resource: Resource) -> Self {
        Self {
            resource,
            interest: Interest::Readable,
        }
    }

    pub fn writable(resource: Resource) -> Self {
        Self {
            resource,
            interest: Interest::Writable,
        }
    }
}

/// Value handed to a session when it is resumed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Inbound {
    /// First resume of a freshly submitted session.
    Start,
    /// The previous wait resolved; carries the interest that fired.
    Ready(Interest),
}

/// Outcome of one synchronous stretch of session execution.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Step {
    /// The session suspended; resume it once the request is satisfied.
    Wait(WaitRequest),
    /// The session finished normally.
    Done,
}

/// A failure local to one session. Recorded in the run report and logged;
/// never halts the loop.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),

    /// Another session already holds a wait on this resource. Registering a
    /// second waiter is a programming error of the session that tried.
    #[error("{0} already has a registered waiter")]
    ResourceBusy(Resource),

    /// The session's logic panicked during a resume.
    #[error("session panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Failed(String),
}

/// A cooperative unit of sequential logic, driven by the scheduler.
///
/// Implementations are explicit state machines: local state lives in the
/// struct, and `resume` picks up exactly where the last `Step::Wait` left
/// off. All operations attempted inside `resume` must be non-blocking; when
/// one would block, return `Step::Wait` instead of waiting.
///
/// # Example
/// ```ignore
/// struct Relay { from: Resource, state: RelayState }
///
/// impl Session for Relay {
///     fn resume(&mut self, _inbound: Inbound) -> Result<Step, SessionError> {
///         match io::try_read(self.from, &mut buf) {
///             TryOp::WouldBlock => Ok(Step::Wait(WaitRequest::readable(self.from))),
///             TryOp::Completed(n) => { /* advance state */ Ok(Step::Done) }
///             TryOp::Failed(e) => Err(e.into()),
///         }
///     }
/// }
/// ```
pub trait Session {
    /// Runs the session's logic from wherever it last suspended.
    ///
    /// `inbound` is [`Inbound::Start`] on the first call and
    /// [`Inbound::Ready`] after a wait resolves. Returns the next suspension
    /// point, completion, or a failure that terminates the session.
    fn resume(&mut self, inbound: Inbound) -> Result<Step, SessionError>;

    /// Best-effort resource sweep, called exactly once by the scheduler when
    /// the session terminates (normally or after a failure). Sessions that
    /// close their resources in their own logic can leave this as the no-op
    /// default.
    fn release(&mut self) {}
}

/// Identity of a submitted session, as returned by `Scheduler::submit`.
///
/// Used to correlate entries in the run report with the session that
/// produced them. Identifiers are reused after a session is destroyed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SessionId(pub(crate) usize);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session {}", self.0)
    }
}
