//! Abstract event vocabulary delivered to the application.
//!
//! Every event a session produces is one of the [`Event`] variants. Events
//! are emitted in the order of the platform records that caused them; frame
//! events are synthesized by the session loop and follow the input events
//! drained in the same iteration.

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Set of active abstract modifiers for a key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// The command modifier (Control on X11).
    pub command: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        command: false,
        shift: false,
    };
    pub const COMMAND: Modifiers = Modifiers {
        command: true,
        shift: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        command: false,
        shift: true,
    };

    /// Whether every modifier set in `other` is also set in `self`.
    pub fn contains(self, other: Modifiers) -> bool {
        (!other.command || self.command) && (!other.shift || self.shift)
    }

    pub fn is_empty(self) -> bool {
        !self.command && !self.shift
    }
}

/// Keys without a printable character identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Escape,
    LeftArrow,
    RightArrow,
    UpArrow,
    DownArrow,
    /// Main-block Return.
    Return,
    /// Keypad Enter.
    Enter,
    Home,
    End,
    DeleteBackward,
    DeleteForward,
    PageUp,
    PageDown,
}

/// The identity of a pressed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A special key from the keysym table.
    Named(NamedKey),
    /// A character key, always uppercased (e.g. `'C'` for the `c` key).
    Character(char),
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub name: Key,
    pub modifiers: Modifiers,
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if self.modifiers.command {
            parts.push("Command".to_string());
        }
        if self.modifiers.shift {
            parts.push("Shift".to_string());
        }

        match &self.name {
            Key::Character(c) => parts.push(c.to_string()),
            Key::Named(n) => parts.push(format!("{:?}", n)),
        }

        write!(f, "{}", parts.join("+"))
    }
}

/// Text produced by the keyboard or an input method composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditEvent {
    pub text: String,
}

/// A position or delta in window pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Window size in device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Press,
    Release,
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
}

/// Pointer press, release, motion or wheel scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub source: PointerSource,
    pub position: Point,
    /// Scroll delta; zero except for wheel buttons.
    pub scroll: Point,
    /// Server timestamp.
    pub time: Duration,
}

/// Display metrics and the capture time of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameConfig {
    pub now: Instant,
    /// Pixels per device-independent pixel.
    pub px_per_dp: f32,
    /// Pixels per scaled (font) pixel.
    pub px_per_sp: f32,
}

impl FrameConfig {
    pub fn new(px_per_dp: f32, px_per_sp: f32) -> Self {
        Self {
            now: Instant::now(),
            px_per_dp,
            px_per_sp,
        }
    }

    /// Convert device-independent pixels to whole pixels, rounding to nearest.
    pub fn px(&self, dp: f32) -> i32 {
        (self.px_per_dp * dp).round() as i32
    }

    /// Convert scaled pixels to whole pixels, rounding to nearest.
    pub fn sp(&self, sp: f32) -> i32 {
        (self.px_per_sp * sp).round() as i32
    }
}

/// Request to produce and present a new frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameEvent {
    pub size: Size,
    pub config: FrameConfig,
    /// True when the redraw was caused by the platform (expose) rather than
    /// by animation or an external wakeup.
    pub sync: bool,
}

/// Coarse lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Stage {
    Running,
}

/// Terminal event of a session. No event follows it.
#[derive(Debug, Clone, Default)]
pub struct DestroyEvent {
    pub err: Option<Arc<dyn Error + Send + Sync>>,
}

#[derive(Debug, Clone)]
pub enum Event {
    Stage(Stage),
    Frame(FrameEvent),
    Key(KeyEvent),
    Edit(EditEvent),
    Pointer(PointerEvent),
    Focus(bool),
    Destroy(DestroyEvent),
}
