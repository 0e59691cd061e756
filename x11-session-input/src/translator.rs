//! Per-record translation of raw X11 events into abstract events.
//!
//! [`Translator::translate`] decodes one [`RawEvent`], pushes zero or more
//! [`Event`]s into the caller's sink in record order, and reports through
//! [`Dispatch`] what the session loop must do as a consequence (redraw,
//! resize, stop).
//!
//! Key presses go through the input method: the record is first offered to
//! [`InputMethod::filter`] (composition in progress swallows it), then
//! [`InputMethod::lookup`] yields composed text, a keysym and a status that
//! decide which events are produced.

use std::time::Duration;

use x11_session_config::SessionConfig;

use crate::event::{
    EditEvent, Event, Key, KeyEvent, Modifiers, Point, PointerEvent, PointerKind, PointerSource,
    Size,
};
use crate::keysym::special_key;
use crate::modifiers::{lookup_state, modifiers_from_state};
use crate::xproto::{
    Atom, BUTTON1, BUTTON4, BUTTON5, ButtonRecord, KeyRecord, Keysym, MotionRecord, RawEvent,
};

/// Initial size of the reusable lookup buffer. Grown on demand.
const INITIAL_TEXT_CAPACITY: usize = 4;

/// Outcome of an input method lookup (`Xutf8LookupString` status).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStatus {
    /// The buffer was too small; `Lookup::len` holds the required size.
    BufferOverflow,
    /// No text and no keysym.
    Nothing,
    /// Only the keysym is valid.
    KeySym,
    /// Only the text is valid (synthetic composition result).
    Chars,
    /// Both text and keysym are valid.
    Both,
}

/// Result of one [`InputMethod::lookup`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    /// Bytes written, or bytes required on overflow.
    pub len: usize,
    pub keysym: Keysym,
    pub status: LookupStatus,
}

/// The platform's input method context.
pub trait InputMethod {
    /// Offer an event to the input method. Returns `true` when the input
    /// method consumed it and the event must not be translated.
    fn filter(&mut self, event: &RawEvent) -> bool;

    /// Locale-aware lookup of the text and keysym for a key press, writing
    /// UTF-8 into `buf`.
    fn lookup(&mut self, key: &KeyRecord, buf: &mut [u8]) -> Lookup;
}

/// What the session loop must do after one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing beyond the emitted events.
    Handled,
    /// The input method consumed the record.
    Filtered,
    /// An expose notification; `last` is true for the final one of a batch.
    Expose { last: bool },
    /// The window geometry changed. Redraw waits for the following expose.
    Resize(Size),
    /// The window manager asked to close the window. Stop draining.
    Close,
}

/// Stateful decoder for one session's records.
///
/// Holds the lookup buffer so key presses do not allocate once the buffer
/// has grown to fit the longest composition seen.
#[derive(Debug)]
pub struct Translator {
    delete_window: Atom,
    scroll_step: f32,
    text: Vec<u8>,
}

impl Translator {
    /// Create a translator recognising `delete_window` as the close protocol
    /// atom and producing wheel deltas of `scroll_step`.
    pub fn new(delete_window: Atom, scroll_step: f32) -> Self {
        Self {
            delete_window,
            scroll_step,
            text: vec![0; INITIAL_TEXT_CAPACITY],
        }
    }

    /// Create a translator using the scroll step from `config`.
    pub fn from_config(config: &SessionConfig, delete_window: Atom) -> Self {
        Self::new(delete_window, config.scroll_step)
    }

    /// Translate one record, pushing abstract events into `emit`.
    pub fn translate<I, F>(&mut self, event: RawEvent, im: &mut I, emit: &mut F) -> Dispatch
    where
        I: InputMethod + ?Sized,
        F: FnMut(Event),
    {
        if im.filter(&event) {
            log::trace!("Input method consumed {:?}", event);
            return Dispatch::Filtered;
        }

        match event {
            RawEvent::KeyPress(key) => {
                self.key_press(&key, im, emit);
                Dispatch::Handled
            }
            // Press and composition carry everything; releases are dropped.
            RawEvent::KeyRelease(_) => Dispatch::Handled,
            RawEvent::ButtonPress(button) => {
                self.button(&button, PointerKind::Press, emit);
                Dispatch::Handled
            }
            RawEvent::ButtonRelease(button) => {
                self.button(&button, PointerKind::Release, emit);
                Dispatch::Handled
            }
            RawEvent::Motion(motion) => {
                emit(Event::Pointer(motion_event(&motion)));
                Dispatch::Handled
            }
            RawEvent::Expose(expose) => Dispatch::Expose {
                last: expose.count == 0,
            },
            RawEvent::FocusIn => {
                emit(Event::Focus(true));
                Dispatch::Handled
            }
            RawEvent::FocusOut => {
                emit(Event::Focus(false));
                Dispatch::Handled
            }
            RawEvent::Configure(cfg) => Dispatch::Resize(Size::new(cfg.width, cfg.height)),
            RawEvent::ClientMessage(msg) => {
                if msg.data[0] == self.delete_window as i64 {
                    log::debug!("Received WM_DELETE_WINDOW");
                    Dispatch::Close
                } else {
                    Dispatch::Handled
                }
            }
            RawEvent::Other(kind) => {
                log::trace!("Ignoring X11 event type {}", kind);
                Dispatch::Handled
            }
        }
    }

    fn key_press<I, F>(&mut self, key: &KeyRecord, im: &mut I, emit: &mut F)
    where
        I: InputMethod + ?Sized,
        F: FnMut(Event),
    {
        let mods = modifiers_from_state(key.state);
        let lookup_key = KeyRecord {
            state: lookup_state(key.state, mods),
            ..*key
        };

        let lookup = loop {
            let lookup = im.lookup(&lookup_key, &mut self.text);
            if lookup.status != LookupStatus::BufferOverflow {
                break lookup;
            }
            // Always grow, even if the input method under-reports.
            let needed = lookup.len.max(self.text.len() + 1);
            log::trace!("Lookup buffer overflow, growing to {} bytes", needed);
            self.text.resize(needed, 0);
        };
        let len = lookup.len.min(self.text.len());
        let text = &self.text[..len];

        match lookup.status {
            LookupStatus::Chars => {
                emit(Event::Edit(EditEvent {
                    text: String::from_utf8_lossy(text).into_owned(),
                }));
            }
            LookupStatus::KeySym => {
                if let Some(name) = special_key(lookup.keysym) {
                    emit(Event::Key(KeyEvent {
                        name: Key::Named(name),
                        modifiers: mods,
                    }));
                }
            }
            LookupStatus::Both => {
                if let Some(name) = special_key(lookup.keysym) {
                    emit(Event::Key(KeyEvent {
                        name: Key::Named(name),
                        modifiers: mods,
                    }));
                } else {
                    if let Some(c) = first_char(text) {
                        emit(Event::Key(KeyEvent {
                            name: Key::Character(upper(c)),
                            modifiers: mods,
                        }));
                    }
                    // Control combinations must not also insert text.
                    if !mods.contains(Modifiers::COMMAND) {
                        emit(Event::Edit(EditEvent {
                            text: String::from_utf8_lossy(text).into_owned(),
                        }));
                    }
                }
            }
            LookupStatus::Nothing | LookupStatus::BufferOverflow => {}
        }
    }

    fn button<F>(&self, button: &ButtonRecord, kind: PointerKind, emit: &mut F)
    where
        F: FnMut(Event),
    {
        let mut ev = PointerEvent {
            kind,
            source: PointerSource::Mouse,
            position: Point::new(button.x as f32, button.y as f32),
            scroll: Point::default(),
            time: Duration::from_millis(button.time),
        };
        match button.button {
            BUTTON1 => {}
            BUTTON4 => {
                ev.kind = PointerKind::Move;
                ev.scroll.y = -self.scroll_step;
            }
            BUTTON5 => {
                ev.kind = PointerKind::Move;
                ev.scroll.y = self.scroll_step;
            }
            other => {
                log::trace!("Ignoring pointer button {}", other);
                return;
            }
        }
        emit(Event::Pointer(ev));
    }
}

fn motion_event(motion: &MotionRecord) -> PointerEvent {
    PointerEvent {
        kind: PointerKind::Move,
        source: PointerSource::Mouse,
        position: Point::new(motion.x as f32, motion.y as f32),
        scroll: Point::default(),
        time: Duration::from_millis(motion.time),
    }
}

/// Decode the first UTF-8 character of `bytes`, ignoring any invalid tail.
fn first_char(bytes: &[u8]) -> Option<char> {
    let valid = match std::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => std::str::from_utf8(&bytes[..e.valid_up_to()]).ok()?,
    };
    valid.chars().next()
}

/// Uppercase `c` when it has a single-character uppercase form.
fn upper(c: char) -> char {
    let mut up = c.to_uppercase();
    match (up.next(), up.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}
