//! Readiness-multiplexing reactor.
//!
//! This module wraps the OS readiness facility behind a minimal contract.
//! It includes:
//! - [`core`]: The epoll-backed reactor implementation
//! - [`event`]: epoll event wrappers
//!
//! The scheduler only depends on the [`Poller`] trait, so the choice of
//! multiplexing primitive (and level- vs. edge-triggered delivery) stays an
//! internal collaborator detail.

pub mod core;
pub mod event;

pub use self::core::Reactor;

use crate::session::{Interest, Resource};

use std::io;

/// Contract between the scheduler and the readiness facility.
///
/// The registered set managed through `register`/`deregister` must match the
/// live wait-registry entries at every loop step; the scheduler maintains
/// that pairing itself and never polls with an empty set.
pub trait Poller {
    /// Starts monitoring `resource` for `interest`.
    fn register(&mut self, resource: Resource, interest: Interest) -> io::Result<()>;

    /// Stops monitoring `resource`.
    fn deregister(&mut self, resource: Resource) -> io::Result<()>;

    /// Blocks until at least one registered resource is ready (returning
    /// immediately if one already is), appending every ready resource with
    /// the interest that fired. A single call may report multiple resources.
    fn poll(&mut self, ready: &mut Vec<(Resource, Interest)>) -> io::Result<()>;
}
