//! Input translation for the x11-session window driver.
//!
//! This crate turns raw X11 event records into the abstract event vocabulary
//! delivered to applications:
//!
//! - [`xproto`]: plain-data mirrors of the X11 event records the driver reads
//! - [`keysym`]: the special-key table (escape, arrows, editing keys)
//! - [`modifiers`]: mapping of X11 modifier state bits
//! - [`event`]: the abstract events (key, text edit, pointer, focus, frame)
//! - [`translator`]: the per-record decoder, including the input-method
//!   lookup protocol

pub mod event;
pub mod keysym;
pub mod modifiers;
pub mod translator;
pub mod xproto;

pub use event::{
    DestroyEvent, EditEvent, Event, FrameConfig, FrameEvent, Key, KeyEvent, Modifiers, NamedKey,
    Point, PointerEvent, PointerKind, PointerSource, Size, Stage,
};
pub use translator::{Dispatch, InputMethod, Lookup, LookupStatus, Translator};
pub use xproto::{Atom, RawEvent};
