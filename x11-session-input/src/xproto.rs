//! Plain-data mirrors of the X11 event records read by the session.
//!
//! Backends copy the fields the driver needs out of their native `XEvent`
//! union into these records, so the translator never touches FFI memory.

/// An X11 atom identifier.
pub type Atom = u64;

/// An X11 keysym value.
pub type Keysym = u64;

/// `ShiftMask` bit of the key/button state field.
pub const SHIFT_MASK: u32 = 1 << 0;
/// `LockMask` bit of the key/button state field.
pub const LOCK_MASK: u32 = 1 << 1;
/// `ControlMask` bit of the key/button state field.
pub const CONTROL_MASK: u32 = 1 << 2;

/// Primary (left) pointer button.
pub const BUTTON1: u32 = 1;
/// Middle pointer button.
pub const BUTTON2: u32 = 2;
/// Secondary (right) pointer button.
pub const BUTTON3: u32 = 3;
/// Wheel up.
pub const BUTTON4: u32 = 4;
/// Wheel down.
pub const BUTTON5: u32 = 5;

/// Key press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyRecord {
    /// Modifier and button state bits at the time of the event.
    pub state: u32,
    /// Hardware keycode.
    pub keycode: u32,
    /// Server timestamp in milliseconds.
    pub time: u64,
}

/// Pointer button press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonRecord {
    pub button: u32,
    pub x: i32,
    pub y: i32,
    /// Server timestamp in milliseconds.
    pub time: u64,
}

/// Pointer motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionRecord {
    pub x: i32,
    pub y: i32,
    /// Server timestamp in milliseconds.
    pub time: u64,
}

/// Exposure of part of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExposeRecord {
    /// Number of Expose events still following this one.
    pub count: u32,
}

/// Window configuration change (StructureNotify).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigureRecord {
    pub width: i32,
    pub height: i32,
}

/// Client message, used here for `WM_PROTOCOLS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientMessageRecord {
    /// The `l` view of the message data.
    pub data: [i64; 5],
}

impl ClientMessageRecord {
    /// Build a `WM_PROTOCOLS` message carrying `atom` in its first word.
    pub fn protocol(atom: Atom) -> Self {
        let mut data = [0; 5];
        data[0] = atom as i64;
        Self { data }
    }
}

/// One event record taken off the display queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEvent {
    KeyPress(KeyRecord),
    KeyRelease(KeyRecord),
    ButtonPress(ButtonRecord),
    ButtonRelease(ButtonRecord),
    Motion(MotionRecord),
    Expose(ExposeRecord),
    FocusIn,
    FocusOut,
    Configure(ConfigureRecord),
    ClientMessage(ClientMessageRecord),
    /// Any other event type, identified by its X11 type code.
    Other(i32),
}
