use x11_session_input::Event;

use crate::driver::Driver;

/// Delivery target for one session's events.
///
/// Both methods are called only from the session's loop thread, never
/// concurrently. `set_driver` is called exactly once, before the Running
/// stage event.
pub trait Callbacks: Send + 'static {
    fn set_driver(&mut self, driver: Driver);
    fn event(&mut self, event: Event);
}
