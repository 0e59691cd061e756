//! Self-pipe wakeup channel.
//!
//! Any thread may [`signal`](WakeupChannel::signal); only the session loop
//! polls [`read_fd`](WakeupChannel::read_fd) and calls
//! [`drain`](WakeupChannel::drain). Both ends are non-blocking, so signals
//! coalesce once the pipe buffer is full: a wakeup is delivered at least
//! once, never exactly once.

use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};

use crate::error::SessionError;

/// Non-blocking, close-on-exec pipe pair.
///
/// Both descriptors close when the channel is dropped. The session keeps the
/// channel behind an `Arc` shared with every driver handle, so a late
/// `signal()` never writes to a closed descriptor.
#[derive(Debug)]
pub struct WakeupChannel {
    read: OwnedFd,
    write: OwnedFd,
}

impl WakeupChannel {
    pub fn new() -> Result<Self, SessionError> {
        let mut fds = [-1 as RawFd; 2];
        // SAFETY: `fds` is a valid two-element array for pipe2 to fill.
        let rc = unsafe { libc::pipe2(fds.as_mut_ptr(), libc::O_NONBLOCK | libc::O_CLOEXEC) };
        if rc != 0 {
            let err = io::Error::last_os_error();
            log::error!("Failed to create wakeup pipe: {}", err);
            return Err(SessionError::WakeupPipe(err));
        }
        // SAFETY: pipe2 succeeded, so both descriptors are open and owned by us.
        let (read, write) = unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) };
        log::debug!("Wakeup pipe created (read={}, write={})", fds[0], fds[1]);
        Ok(Self { read, write })
    }

    /// Descriptor the event loop polls for readability.
    pub fn read_fd(&self) -> RawFd {
        self.read.as_raw_fd()
    }

    /// Request a wakeup. Never blocks.
    ///
    /// A full pipe already guarantees a pending wakeup and is not an error.
    ///
    /// # Panics
    ///
    /// Panics on any write failure other than `EAGAIN`/`EINTR`; the loop
    /// has no way to recover from a broken wakeup pipe.
    pub fn signal(&self) {
        let byte = [1u8];
        loop {
            // SAFETY: writes one byte from a live stack buffer to an fd we own.
            let n = unsafe {
                libc::write(
                    self.write.as_raw_fd(),
                    byte.as_ptr() as *const libc::c_void,
                    1,
                )
            };
            if n >= 0 {
                crate::debug_trace!("WAKEUP", "signalled");
                return;
            }
            let err = io::Error::last_os_error();
            match err.raw_os_error() {
                Some(libc::EAGAIN) => return,
                Some(libc::EINTR) => continue,
                _ => {
                    log::error!("Wakeup pipe write failed: {}", err);
                    panic!("wakeup pipe write failed: {err}");
                }
            }
        }
    }

    /// Consume every pending wakeup byte without blocking.
    ///
    /// `buf` is scratch space reused across calls; its contents are
    /// meaningless afterwards. Returns `true` if at least one byte was read.
    /// An empty `buf` reads nothing. Loop thread only.
    ///
    /// # Panics
    ///
    /// Panics on any read failure other than `EAGAIN`/`EINTR`.
    pub fn drain(&self, buf: &mut [u8]) -> bool {
        if buf.is_empty() {
            return false;
        }
        let mut drained = false;
        loop {
            // SAFETY: reads into a live buffer of the given length.
            let n = unsafe {
                libc::read(
                    self.read.as_raw_fd(),
                    buf.as_mut_ptr() as *mut libc::c_void,
                    buf.len(),
                )
            };
            if n > 0 {
                drained = true;
                continue;
            }
            if n == 0 {
                // Write end closed; cannot happen while we hold it.
                return drained;
            }
            let err = io::Error::last_os_error();
            match err.raw_os_error() {
                Some(libc::EAGAIN) => return drained,
                Some(libc::EINTR) => continue,
                _ => {
                    log::error!("Wakeup pipe read failed: {}", err);
                    panic!("wakeup pipe read failed: {err}");
                }
            }
        }
    }
}
