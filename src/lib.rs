// Library exports for x11-session
//
// # Threading
//
// Each session runs on one dedicated loop thread that owns the display
// connection and is the only caller of `Callbacks`. `Driver` is the only
// cross-thread entry point; it touches a `parking_lot::Mutex` around the
// animating/frame-ready pair and the wakeup pipe, nothing else.

#[macro_use]
pub mod debug;

pub mod callbacks;
pub mod driver;
pub mod error;
pub mod platform;
pub mod session;
pub mod stage;
pub mod wakeup;

pub use callbacks::Callbacks;
pub use driver::Driver;
pub use error::SessionError;
pub use session::spawn;
pub use stage::StageTracker;
pub use wakeup::WakeupChannel;

// Re-export the sub-crates so backends and applications need one dependency.
pub use x11_session_config as config;
pub use x11_session_input as input;
pub use x11_session_config::{ConfigError, LogLevel, SessionConfig};
pub use x11_session_input::{Event, Stage};
