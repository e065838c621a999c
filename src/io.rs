//! Non-blocking I/O primitives for session logic.
//!
//! Sessions never block: every operation they attempt either completes,
//! genuinely fails, or signals that it would block. The tri-state [`TryOp`]
//! keeps "would block" out of the error path, since it is the normal trigger
//! for a suspend rather than a failure.

use crate::session::Resource;

use libc::{EAGAIN, EWOULDBLOCK, F_GETFL, F_SETFL, O_NONBLOCK, fcntl, read, write};
use std::io;

/// Outcome of attempting a non-blocking operation.
#[derive(Debug)]
pub enum TryOp<T> {
    /// The operation finished with a result.
    Completed(T),
    /// The operation cannot make progress yet; suspend on the resource.
    WouldBlock,
    /// The operation failed for real.
    Failed(io::Error),
}

/// Attempts a single non-blocking read. `Completed(0)` means end of stream.
pub fn try_read(resource: Resource, buf: &mut [u8]) -> TryOp<usize> {
    let res = unsafe { read(resource.0, buf.as_mut_ptr() as *mut _, buf.len()) };
    classify(res)
}

/// Attempts a single non-blocking write, returning how many bytes were
/// accepted. Short writes are normal; callers track their own progress.
pub fn try_write(resource: Resource, buf: &[u8]) -> TryOp<usize> {
    let res = unsafe { write(resource.0, buf.as_ptr() as *const _, buf.len()) };
    classify(res)
}

fn classify(res: isize) -> TryOp<usize> {
    if res >= 0 {
        return TryOp::Completed(res as usize);
    }

    let err = io::Error::last_os_error();
    match err.raw_os_error() {
        Some(code) if code == EAGAIN || code == EWOULDBLOCK => TryOp::WouldBlock,
        _ => TryOp::Failed(err),
    }
}

/// Puts a resource into non-blocking mode. Sessions must do this for every
/// resource they intend to suspend on.
pub fn set_nonblocking(resource: Resource) -> io::Result<()> {
    let flags = unsafe { fcntl(resource.0, F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }

    let res = unsafe { fcntl(resource.0, F_SETFL, flags | O_NONBLOCK) };
    if res < 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

/// Best-effort close, for use in release sweeps where the session is already
/// terminating and has nowhere to report a close failure.
pub fn close(resource: Resource) {
    unsafe { libc::close(resource.0) };
}
