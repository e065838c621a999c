use crate::session::Interest;

use libc::{
    EPOLL_CTL_ADD, EPOLL_CTL_DEL, EPOLLERR, EPOLLHUP, EPOLLIN, EPOLLOUT, epoll_ctl, epoll_event,
    epoll_wait,
};
use std::io;
use std::os::unix::io::RawFd;
use std::ptr;

#[derive(Clone, Copy)]
pub(crate) struct Event(epoll_event);

impl Event {
    pub(crate) const EMPTY: Self = Self(epoll_event { events: 0, u64: 0 });

    pub(crate) fn new(file_descriptor: RawFd, interest: Interest) -> Self {
        Self(epoll_event {
            events: interest_mask(interest),
            u64: file_descriptor as u64,
        })
    }

    pub(crate) fn file_descriptor(&self) -> RawFd {
        self.0.u64 as RawFd
    }

    /// Maps the fired event mask back onto an interest. Error and hang-up
    /// conditions count as both, so whichever side is being awaited resumes
    /// and observes the failure through its own non-blocking operation.
    pub(crate) fn fired_interest(&self) -> Option<Interest> {
        let mask = self.0.events;

        if mask & (EPOLLERR | EPOLLHUP) as u32 != 0 {
            return Some(Interest::Both);
        }

        let readable = mask & EPOLLIN as u32 != 0;
        let writable = mask & EPOLLOUT as u32 != 0;

        match (readable, writable) {
            (true, true) => Some(Interest::Both),
            (true, false) => Some(Interest::Readable),
            (false, true) => Some(Interest::Writable),
            (false, false) => None,
        }
    }

    pub(crate) fn add(mut self, queue: RawFd) -> io::Result<()> {
        let fd = self.file_descriptor();
        let res = unsafe { epoll_ctl(queue, EPOLL_CTL_ADD, fd, &mut self.0) };

        if res < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(())
    }

    pub(crate) fn delete(queue: RawFd, file_descriptor: RawFd) -> io::Result<()> {
        let res = unsafe { epoll_ctl(queue, EPOLL_CTL_DEL, file_descriptor, ptr::null_mut()) };

        if res < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(())
    }

    /// Blocks until at least one event is available, filling `events` from
    /// the front. Returns the raw syscall result; the caller handles EINTR.
    pub(crate) fn wait(queue: RawFd, events: &mut [Event]) -> i32 {
        unsafe {
            epoll_wait(
                queue,
                events.as_mut_ptr() as *mut epoll_event,
                events.len() as i32,
                -1,
            )
        }
    }
}

fn interest_mask(interest: Interest) -> u32 {
    match interest {
        Interest::Readable => EPOLLIN as u32,
        Interest::Writable => EPOLLOUT as u32,
        Interest::Both => (EPOLLIN | EPOLLOUT) as u32,
    }
}
