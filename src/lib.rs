//! Single-threaded cooperative session scheduler over readiness multiplexing.
//!
//! This crate lets many independent, sequential units of work ("sessions")
//! share one thread: a session suspends exactly at the point it would
//! otherwise block on a resource, and the scheduler resumes it once the
//! resource becomes usable.
//!
//! # Architecture
//!
//! - **Scheduler**: Event loop that admits sessions, resumes the ready ones,
//!   and blocks on the reactor when everyone is suspended
//! - **Session**: Explicit state machine driven through a resume/suspend
//!   contract, one outstanding [`WaitRequest`] at a time
//! - **WaitRegistry**: Maps each awaited resource to its single waiter
//! - **Reactor**: epoll-backed readiness poller behind the [`Poller`] trait
//! - **TryOp**: Tri-state non-blocking I/O result; `WouldBlock` is the
//!   suspend trigger, never an error
//! - **SchedulerBuilder**: Fluent builder for scheduler instantiation

mod builder;
pub mod io;
mod reactor;
mod scheduler;
mod session;

pub use builder::SchedulerBuilder;
pub use io::TryOp;
pub use reactor::{Poller, Reactor};
pub use scheduler::{LoopError, RunReport, Scheduler};
pub use session::{
    Inbound, Interest, Resource, Session, SessionError, SessionId, Step, WaitRequest,
};
