//! Typed setup errors for a window session.
//!
//! Only failures that happen before the loop thread starts are typed. Once
//! the loop runs, the sole observable outcome is the Destroy event.

use thiserror::Error;
use x11_session_config::ConfigError;

/// Errors returned synchronously by [`crate::spawn`].
#[derive(Debug, Error)]
pub enum SessionError {
    // -----------------------------------------------------------------------
    // Local resources
    // -----------------------------------------------------------------------
    /// The self-pipe used for redraw wakeups could not be created.
    #[error("Wakeup pipe creation failed: {0}")]
    WakeupPipe(#[source] std::io::Error),

    /// The loop thread could not be started.
    #[error("Failed to spawn session thread: {0}")]
    Spawn(#[source] std::io::Error),

    // -----------------------------------------------------------------------
    // Platform
    // -----------------------------------------------------------------------
    /// Process-wide thread-safety initialisation of the display library
    /// failed. Remembered for the rest of the process.
    #[error("Display library thread initialisation failed")]
    ThreadInit,

    /// The display server connection or window could not be set up.
    #[error("Display connection failed: {0}")]
    Connect(String),

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------
    #[error(transparent)]
    Config(#[from] ConfigError),
}
