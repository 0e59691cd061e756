//! X11 modifier state helpers.
//!
//! X11 reports modifiers as a bit set on every key and button record. The
//! session only distinguishes two abstract modifiers:
//!
//! | X11 bit | Abstract modifier |
//! |---|---|
//! | `ControlMask` | `command` |
//! | `ShiftMask` | `shift` |
//!
//! Lock, Mod1-Mod5 and button bits are ignored.

use crate::event::Modifiers;
use crate::xproto::{CONTROL_MASK, SHIFT_MASK};

/// Map a key/button `state` field onto the abstract modifier set.
pub fn modifiers_from_state(state: u32) -> Modifiers {
    Modifiers {
        command: state & CONTROL_MASK != 0,
        shift: state & SHIFT_MASK != 0,
    }
}

/// The state to hand to the input method for a key carrying `mods`.
///
/// Command combinations have Control and Shift cleared so the locale-aware
/// lookup reports the unmodified character; the modifiers themselves are
/// still carried on the emitted key event.
pub fn lookup_state(state: u32, mods: Modifiers) -> u32 {
    if mods.command {
        state & !(CONTROL_MASK | SHIFT_MASK)
    } else {
        state
    }
}
