//! Platform provisioning contract.
//!
//! The session core never talks to Xlib directly. A backend supplies:
//!
//! | Trait | Provides |
//! |---|---|
//! | [`Provisioner`] | One-time thread initialisation, connection and window setup |
//! | [`Display`] | The connection fd, the local event queue, teardown |
//! | [`InputMethod`](x11_session_input::InputMethod) | Event filtering and locale-aware key lookup (a supertrait of `Display`) |
//!
//! Everything here runs on the caller's thread during [`crate::spawn`],
//! except the `Display` methods, which run on the loop thread.

mod display;
mod threads;

pub use display::{Display, Provisioned, Provisioner};
pub use threads::{init_threads_once, init_threads_process};
