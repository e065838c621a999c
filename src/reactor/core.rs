use crate::reactor::Poller;
use crate::reactor::event::Event;
use crate::session::{Interest, Resource};

use libc::{EINTR, EPOLL_CLOEXEC, close, epoll_create1};
use std::io;
use std::os::unix::io::RawFd;

/// Default size of the per-poll event batch. Ready resources beyond this are
/// delivered by the next poll (level-triggered delivery keeps them pending).
pub(crate) const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Epoll-backed readiness reactor.
///
/// Owns the epoll instance and a reusable event batch. Registration is
/// level-triggered: a resource that stays ready keeps firing on every poll
/// until it is deregistered, which the scheduler does immediately after
/// resolving the waiter.
pub struct Reactor {
    queue: RawFd,
    events: Vec<Event>,
}

impl Reactor {
    /// Creates a reactor with the default event batch size.
    pub fn new() -> io::Result<Self> {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Creates a reactor whose poll calls report at most `capacity` ready
    /// resources per batch.
    pub fn with_capacity(capacity: usize) -> io::Result<Self> {
        let queue = unsafe { epoll_create1(EPOLL_CLOEXEC) };
        if queue < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(Self {
            queue,
            events: vec![Event::EMPTY; capacity.max(1)],
        })
    }
}

impl Poller for Reactor {
    fn register(&mut self, resource: Resource, interest: Interest) -> io::Result<()> {
        Event::new(resource.0, interest).add(self.queue)
    }

    fn deregister(&mut self, resource: Resource) -> io::Result<()> {
        Event::delete(self.queue, resource.0)
    }

    fn poll(&mut self, ready: &mut Vec<(Resource, Interest)>) -> io::Result<()> {
        let fired = loop {
            let res = Event::wait(self.queue, &mut self.events);

            if res >= 0 {
                break res as usize;
            }

            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(EINTR) {
                continue;
            }

            return Err(err);
        };

        for event in self.events.iter().take(fired) {
            if let Some(interest) = event.fired_interest() {
                ready.push((Resource(event.file_descriptor()), interest));
            }
        }

        Ok(())
    }
}

impl Drop for Reactor {
    fn drop(&mut self) {
        unsafe { close(self.queue) };
    }
}
