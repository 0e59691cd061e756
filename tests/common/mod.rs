//! Shared integration test helpers for x11-session.
//!
//! Provides a scripted in-process display server so the session loop can be
//! driven without an X server:
//!
//! - [`FakeDisplay`]: the loop-side end. Its connection fd is one half of a
//!   `UnixStream` pair, so `poll(2)` behaves like on a real connection.
//! - [`FakeServer`]: the test-side end. Queues records and makes the
//!   connection readable; dropping it hangs the connection up.
//! - [`Recorder`]: `Callbacks` implementation forwarding everything to a
//!   channel the test reads with timeouts.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::{start_session, QUIET};
//! ```
//!
//! The `#![allow(dead_code)]` attribute suppresses warnings when only a
//! subset of helpers are used per file.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io::{ErrorKind, Read, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::net::UnixStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::Mutex;
use x11_session::input::translator::{InputMethod, Lookup, LookupStatus};
use x11_session::input::xproto::{Atom, ClientMessageRecord, KeyRecord, Keysym, RawEvent};
use x11_session::input::{Event, Size};
use x11_session::platform::{Display, Provisioned, Provisioner};
use x11_session::{Callbacks, Driver, SessionConfig, SessionError};

/// Atom the fake server registers for `WM_DELETE_WINDOW`.
pub const DELETE_WINDOW: Atom = 314;

/// How long to wait for an expected delivery.
pub const WAIT: Duration = Duration::from_secs(5);

/// How long to wait before concluding nothing more is coming.
pub const QUIET: Duration = Duration::from_millis(200);

/// Number of times any fake provisioner ran thread initialisation in this
/// test binary.
pub static INIT_CALLS: AtomicUsize = AtomicUsize::new(0);

/// Scripted reply for a keycode: lookup status, keysym and composed text.
pub type KeyScript = (LookupStatus, Keysym, &'static str);

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

pub struct FakeDisplay {
    conn: UnixStream,
    queue: Arc<Mutex<VecDeque<RawEvent>>>,
    keys: HashMap<u32, KeyScript>,
    filtered_keycodes: Vec<u32>,
    closed: Arc<AtomicBool>,
}

impl InputMethod for FakeDisplay {
    fn filter(&mut self, event: &RawEvent) -> bool {
        match event {
            RawEvent::KeyPress(key) | RawEvent::KeyRelease(key) => {
                self.filtered_keycodes.contains(&key.keycode)
            }
            _ => false,
        }
    }

    fn lookup(&mut self, key: &KeyRecord, buf: &mut [u8]) -> Lookup {
        let Some(&(status, keysym, text)) = self.keys.get(&key.keycode) else {
            return Lookup {
                len: 0,
                keysym: 0,
                status: LookupStatus::Nothing,
            };
        };
        let bytes = text.as_bytes();
        if bytes.len() > buf.len() {
            return Lookup {
                len: bytes.len(),
                keysym: 0,
                status: LookupStatus::BufferOverflow,
            };
        }
        buf[..bytes.len()].copy_from_slice(bytes);
        Lookup {
            len: bytes.len(),
            keysym,
            status,
        }
    }
}

impl Display for FakeDisplay {
    fn connection_fd(&self) -> RawFd {
        self.conn.as_raw_fd()
    }

    fn pending(&mut self) -> usize {
        // Consume the "flush" bytes so the fd is only readable for new data.
        let mut buf = [0u8; 64];
        loop {
            match self.conn.read(&mut buf) {
                Ok(0) => break,
                Ok(_) => continue,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        self.queue.lock().len()
    }

    fn next_event(&mut self) -> RawEvent {
        self.queue
            .lock()
            .pop_front()
            .expect("next_event called with an empty queue")
    }

    fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Server side
// ---------------------------------------------------------------------------

pub struct FakeServer {
    conn: UnixStream,
    queue: Arc<Mutex<VecDeque<RawEvent>>>,
}

impl FakeServer {
    /// Queue `events` atomically and make the connection readable.
    pub fn push(&mut self, events: &[RawEvent]) {
        self.queue.lock().extend(events.iter().copied());
        self.conn
            .write_all(&[1])
            .expect("failed to signal fake connection");
    }
}

/// The client message a window manager sends to close the window.
pub fn close_request() -> RawEvent {
    RawEvent::ClientMessage(ClientMessageRecord::protocol(DELETE_WINDOW))
}

/// Build a connected display/server pair with `preload` already queued.
pub fn fake_connection(preload: &[RawEvent]) -> (FakeDisplay, FakeServer, Arc<AtomicBool>) {
    let (client, server) = UnixStream::pair().expect("failed to create socket pair");
    client
        .set_nonblocking(true)
        .expect("failed to make client socket non-blocking");
    let queue = Arc::new(Mutex::new(preload.iter().copied().collect::<VecDeque<_>>()));
    let closed = Arc::new(AtomicBool::new(false));
    let display = FakeDisplay {
        conn: client,
        queue: queue.clone(),
        keys: HashMap::new(),
        filtered_keycodes: Vec::new(),
        closed: closed.clone(),
    };
    (display, FakeServer { conn: server, queue }, closed)
}

// ---------------------------------------------------------------------------
// Provisioners
// ---------------------------------------------------------------------------

pub struct FakeProvisioner {
    display: Option<FakeDisplay>,
    pub size: Size,
    pub scale: f32,
}

impl FakeProvisioner {
    pub fn new(display: FakeDisplay) -> Self {
        Self {
            display: Some(display),
            size: Size::new(800, 600),
            scale: 1.0,
        }
    }
}

impl Provisioner for FakeProvisioner {
    type Display = FakeDisplay;

    fn init_threads(&self) -> bool {
        INIT_CALLS.fetch_add(1, Ordering::SeqCst);
        true
    }

    fn provision(
        &mut self,
        _config: &SessionConfig,
    ) -> Result<Provisioned<FakeDisplay>, SessionError> {
        let display = self
            .display
            .take()
            .ok_or_else(|| SessionError::Connect("display already provisioned".to_string()))?;
        Ok(Provisioned {
            display,
            delete_window: DELETE_WINDOW,
            size: self.size,
            scale: self.scale,
        })
    }
}

/// Provisioner whose connection attempt always fails.
pub struct UnreachableServer;

impl Provisioner for UnreachableServer {
    type Display = FakeDisplay;

    fn init_threads(&self) -> bool {
        INIT_CALLS.fetch_add(1, Ordering::SeqCst);
        true
    }

    fn provision(
        &mut self,
        _config: &SessionConfig,
    ) -> Result<Provisioned<FakeDisplay>, SessionError> {
        Err(SessionError::Connect("cannot open display :99".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Callbacks
// ---------------------------------------------------------------------------

/// Everything the session hands to its callbacks, in delivery order.
pub enum Delivery {
    Driver(Driver),
    Event(Event),
}

pub struct Recorder {
    tx: Sender<Delivery>,
    /// Set when the recorder turns animation on from inside the loop.
    driver: Option<Driver>,
    animate_on_focus: bool,
}

impl Recorder {
    pub fn new() -> (Self, Receiver<Delivery>) {
        let (tx, rx) = mpsc::channel();
        let recorder = Self {
            tx,
            driver: None,
            animate_on_focus: false,
        };
        (recorder, rx)
    }

    /// A recorder that calls `set_animating(true)` from the loop thread when
    /// it receives a focus-in event, so the wakeup lands while the rest of
    /// that drain pass is still being translated.
    pub fn animating_on_focus() -> (Self, Receiver<Delivery>) {
        let (mut recorder, rx) = Self::new();
        recorder.animate_on_focus = true;
        (recorder, rx)
    }
}

impl Callbacks for Recorder {
    fn set_driver(&mut self, driver: Driver) {
        if self.animate_on_focus {
            self.driver = Some(driver.clone());
        }
        let _ = self.tx.send(Delivery::Driver(driver));
    }

    fn event(&mut self, event: Event) {
        let focus_in = matches!(event, Event::Focus(true));
        let _ = self.tx.send(Delivery::Event(event));
        if focus_in && let Some(driver) = &self.driver {
            driver.set_animating(true);
        }
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// A running session plus the test's handles on it.
pub struct Harness {
    server: Option<FakeServer>,
    pub driver: Driver,
    pub closed: Arc<AtomicBool>,
    rx: Receiver<Delivery>,
    handle: Option<JoinHandle<()>>,
}

impl Harness {
    /// Queue platform records on the connection.
    pub fn push(&mut self, events: &[RawEvent]) {
        self.server
            .as_mut()
            .expect("connection already hung up")
            .push(events);
    }

    /// Send the window manager's delete-window request.
    pub fn close_window(&mut self) {
        self.push(&[close_request()]);
    }

    /// Drop the server end so the connection reports a hangup.
    pub fn hangup(&mut self) {
        self.server = None;
    }

    /// Next event, failing the test if none arrives within [`WAIT`].
    pub fn next_event(&self) -> Event {
        match self.rx.recv_timeout(WAIT) {
            Ok(Delivery::Event(event)) => event,
            Ok(Delivery::Driver(_)) => panic!("unexpected second set_driver call"),
            Err(e) => panic!("no event delivered: {e:?}"),
        }
    }

    /// Assert nothing is delivered within [`QUIET`].
    pub fn assert_quiet(&self) {
        match self.rx.recv_timeout(QUIET) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(Delivery::Event(event)) => panic!("unexpected event: {event:?}"),
            Ok(Delivery::Driver(_)) => panic!("unexpected set_driver call"),
            Err(RecvTimeoutError::Disconnected) => panic!("session ended unexpectedly"),
        }
    }

    /// Expect Destroy next, then the loop thread to finish without
    /// delivering anything else.
    pub fn expect_destroy(mut self) {
        match self.next_event() {
            Event::Destroy(destroy) => assert!(destroy.err.is_none()),
            other => panic!("expected Destroy, got {other:?}"),
        }
        if let Some(handle) = self.handle.take() {
            handle.join().expect("session thread panicked");
        }
        assert!(
            matches!(
                self.rx.recv_timeout(QUIET),
                Err(RecvTimeoutError::Disconnected)
            ),
            "events delivered after Destroy"
        );
        assert!(self.closed.load(Ordering::SeqCst), "display not closed");
    }

    /// Close the window and check the session ends cleanly.
    pub fn shutdown(mut self) {
        self.close_window();
        self.expect_destroy();
    }
}

/// Start a session over `display` and consume the `set_driver` call and the
/// Running stage event.
pub fn start_with(
    provisioner: FakeProvisioner,
    server: FakeServer,
    closed: Arc<AtomicBool>,
    config: SessionConfig,
) -> Harness {
    start_recording(provisioner, server, closed, config, Recorder::new())
}

/// [`start_with`] using a caller-built recorder.
pub fn start_recording(
    provisioner: FakeProvisioner,
    server: FakeServer,
    closed: Arc<AtomicBool>,
    config: SessionConfig,
    (recorder, rx): (Recorder, Receiver<Delivery>),
) -> Harness {
    let handle = x11_session::spawn(provisioner, recorder, config).expect("spawn failed");

    let driver = match rx.recv_timeout(WAIT) {
        Ok(Delivery::Driver(driver)) => driver,
        Ok(Delivery::Event(event)) => panic!("event before set_driver: {event:?}"),
        Err(e) => panic!("set_driver not called: {e:?}"),
    };
    match rx.recv_timeout(WAIT) {
        Ok(Delivery::Event(Event::Stage(x11_session::Stage::Running))) => {}
        Ok(Delivery::Event(event)) => panic!("expected Running stage, got {event:?}"),
        Ok(Delivery::Driver(_)) => panic!("set_driver called twice"),
        Err(e) => panic!("Running stage not delivered: {e:?}"),
    }

    Harness {
        server: Some(server),
        driver,
        closed,
        rx,
        handle: Some(handle),
    }
}

/// Start a session with default configuration and `preload` queued before
/// the loop starts.
pub fn start_session(preload: &[RawEvent]) -> Harness {
    let (display, server, closed) = fake_connection(preload);
    start_with(
        FakeProvisioner::new(display),
        server,
        closed,
        SessionConfig::default(),
    )
}

/// Start a session whose input method answers lookups from `keys` and
/// swallows key records with the `filtered` keycodes.
pub fn start_with_keys(keys: &[(u32, KeyScript)], filtered: &[u32]) -> Harness {
    let (mut display, server, closed) = fake_connection(&[]);
    display.keys = keys.iter().copied().collect();
    display.filtered_keycodes = filtered.to_vec();
    start_with(
        FakeProvisioner::new(display),
        server,
        closed,
        SessionConfig::default(),
    )
}
