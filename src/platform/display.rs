use std::os::fd::RawFd;

use x11_session_config::SessionConfig;
use x11_session_input::{Atom, InputMethod, RawEvent, Size};

use crate::error::SessionError;

/// An open display connection with one mapped window.
///
/// Owned by the loop thread from the moment the session starts.
pub trait Display: InputMethod + Send + 'static {
    /// Descriptor of the server connection, polled for readability.
    fn connection_fd(&self) -> RawFd;

    /// Number of events available without blocking, after reading whatever
    /// the connection already has buffered (`XPending`).
    fn pending(&mut self) -> usize;

    /// Dequeue the next event. Only called after `pending` reported at
    /// least one.
    fn next_event(&mut self) -> RawEvent;

    /// Destroy the input context, window and connection.
    fn close(&mut self);
}

/// Everything a backend hands over once the window exists.
#[derive(Debug)]
pub struct Provisioned<D> {
    pub display: D,
    /// The `WM_DELETE_WINDOW` atom registered for the window.
    pub delete_window: Atom,
    /// Initial window size in pixels.
    pub size: Size,
    /// Detected pixels per device-independent pixel.
    pub scale: f32,
}

/// Sets up a display connection and window for a new session.
pub trait Provisioner {
    type Display: Display;

    /// Process-wide thread-safety initialisation (`XInitThreads`).
    ///
    /// Called at most once per process through
    /// [`init_threads_process`](super::init_threads_process).
    fn init_threads(&self) -> bool;

    /// Connect, create the window and input context.
    fn provision(
        &mut self,
        config: &SessionConfig,
    ) -> Result<Provisioned<Self::Display>, SessionError>;
}
