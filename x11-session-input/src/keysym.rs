//! Special-key keysym table.
//!
//! Only keys without a printable character identity are listed here; every
//! other key is named after the character the input method produces.

use crate::event::NamedKey;
use crate::xproto::Keysym;

pub const XK_BACKSPACE: Keysym = 0xff08;
pub const XK_RETURN: Keysym = 0xff0d;
pub const XK_ESCAPE: Keysym = 0xff1b;
pub const XK_HOME: Keysym = 0xff50;
pub const XK_LEFT: Keysym = 0xff51;
pub const XK_UP: Keysym = 0xff52;
pub const XK_RIGHT: Keysym = 0xff53;
pub const XK_DOWN: Keysym = 0xff54;
pub const XK_PAGE_UP: Keysym = 0xff55;
pub const XK_PAGE_DOWN: Keysym = 0xff56;
pub const XK_END: Keysym = 0xff57;
pub const XK_KP_ENTER: Keysym = 0xff8d;
pub const XK_KP_HOME: Keysym = 0xff95;
pub const XK_KP_LEFT: Keysym = 0xff96;
pub const XK_KP_UP: Keysym = 0xff97;
pub const XK_KP_RIGHT: Keysym = 0xff98;
pub const XK_KP_DOWN: Keysym = 0xff99;
pub const XK_KP_PRIOR: Keysym = 0xff9a;
pub const XK_KP_NEXT: Keysym = 0xff9b;
pub const XK_KP_END: Keysym = 0xff9c;
pub const XK_KP_DELETE: Keysym = 0xff9f;
pub const XK_DELETE: Keysym = 0xffff;

/// Map a keysym to its special key name, if it has one.
///
/// Keypad variants share the name of their main-block counterpart, except
/// `KP_Enter` which stays distinct from `Return`.
pub fn special_key(sym: Keysym) -> Option<NamedKey> {
    let name = match sym {
        XK_ESCAPE => NamedKey::Escape,
        XK_LEFT | XK_KP_LEFT => NamedKey::LeftArrow,
        XK_RIGHT | XK_KP_RIGHT => NamedKey::RightArrow,
        XK_RETURN => NamedKey::Return,
        XK_KP_ENTER => NamedKey::Enter,
        XK_UP | XK_KP_UP => NamedKey::UpArrow,
        XK_DOWN | XK_KP_DOWN => NamedKey::DownArrow,
        XK_HOME | XK_KP_HOME => NamedKey::Home,
        XK_END | XK_KP_END => NamedKey::End,
        XK_BACKSPACE => NamedKey::DeleteBackward,
        XK_DELETE | XK_KP_DELETE => NamedKey::DeleteForward,
        XK_PAGE_UP | XK_KP_PRIOR => NamedKey::PageUp,
        XK_PAGE_DOWN | XK_KP_NEXT => NamedKey::PageDown,
        _ => return None,
    };
    Some(name)
}
