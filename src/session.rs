//! The per-window session event loop.
//!
//! One dedicated thread owns the [`Display`] and is the only caller of
//! [`Callbacks`]. Each iteration:
//!
//! 1. Drains events already queued on the connection.
//! 2. If nothing was queued, snapshots the frame-ready flag and blocks in
//!    `poll(2)` on the connection and the wakeup pipe, then drains the
//!    connection if it became readable. Error or hangup on the connection
//!    ends the loop.
//! 3. Drains the wakeup pipe; any byte forces a redraw and consumes the
//!    frame-ready mark it answers.
//! 4. Emits one frame if a redraw is due or an expose batch completed.
//!
//! A delete-window request ends the loop immediately. Destroy is always the
//! last event delivered.

use std::io;
use std::os::fd::RawFd;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use x11_session_config::SessionConfig;
use x11_session_input::{
    DestroyEvent, Dispatch, Event, FrameConfig, FrameEvent, Size, Stage, Translator,
};

use crate::callbacks::Callbacks;
use crate::driver::{Driver, Shared};
use crate::error::SessionError;
use crate::platform::{Display, Provisioned, Provisioner, init_threads_process};
use crate::stage::StageTracker;
use crate::wakeup::WakeupChannel;

/// Outcome of one drain of the display queue.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Pass {
    /// Records taken off the queue.
    queued: usize,
    /// Whether the last expose seen completed its batch.
    syn: bool,
}

/// State owned by the loop thread.
pub(crate) struct Session<D: Display, C: Callbacks> {
    display: D,
    callbacks: C,
    translator: Translator,
    stage: StageTracker,
    shared: Arc<Shared>,
    /// Scratch space for draining the wakeup pipe, allocated once.
    wakeup_buf: Vec<u8>,
    size: Size,
    px_per_dp: f32,
    px_per_sp: f32,
    alive: bool,
}

impl<D: Display, C: Callbacks> Session<D, C> {
    pub(crate) fn new(
        provisioned: Provisioned<D>,
        wakeup: WakeupChannel,
        callbacks: C,
        config: &SessionConfig,
    ) -> Self {
        let (px_per_dp, px_per_sp) = config.resolve_scale(provisioned.scale);
        Self {
            display: provisioned.display,
            callbacks,
            translator: Translator::from_config(config, provisioned.delete_window),
            stage: StageTracker::new(),
            shared: Arc::new(Shared::new(wakeup)),
            wakeup_buf: vec![0; config.wakeup_buffer_size.max(1)],
            size: provisioned.size,
            px_per_dp,
            px_per_sp,
            alive: true,
        }
    }

    /// Bind the callbacks, announce Running, loop until the window closes
    /// or the connection fails, then deliver Destroy and tear down.
    pub fn run(mut self) {
        self.callbacks.set_driver(Driver::new(self.shared.clone()));
        if self.stage.transition(Stage::Running) {
            self.callbacks.event(Event::Stage(Stage::Running));
        }
        log::info!(
            "Session running ({}x{}, scale {})",
            self.size.width,
            self.size.height,
            self.px_per_dp
        );

        self.event_loop();

        log::info!("Session loop exited, destroying window");
        self.callbacks.event(Event::Destroy(DestroyEvent::default()));
        self.display.close();
    }

    fn event_loop(&mut self) {
        let xfd = self.display.connection_fd();
        let wakeup_fd = self.shared.wakeup.read_fd();

        while self.alive {
            let pass = self.handle_events();
            if !self.alive {
                break;
            }
            let mut syn = pass.syn;
            let mut redraw = false;

            if pass.queued == 0 {
                redraw = self.shared.take_redraw();
                let revents = wait(xfd, wakeup_fd);
                if revents & libc::POLLIN != 0 {
                    syn = self.handle_events().syn;
                    if !self.alive {
                        break;
                    }
                }
                if revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
                    log::info!("Display connection closed (revents={:#x})", revents);
                    break;
                }
            }

            if self.shared.wakeup.drain(&mut self.wakeup_buf) {
                self.shared.consume_frame_ready();
                redraw = true;
            }

            if redraw || syn {
                crate::debug_trace!("LOOP", "frame redraw={} sync={}", redraw, syn);
                let frame = FrameEvent {
                    size: self.size,
                    config: FrameConfig {
                        now: Instant::now(),
                        px_per_dp: self.px_per_dp,
                        px_per_sp: self.px_per_sp,
                    },
                    sync: syn,
                };
                self.callbacks.event(Event::Frame(frame));
            }
        }
    }

    /// Translate every event already queued on the connection, stopping
    /// early on a close request.
    fn handle_events(&mut self) -> Pass {
        let mut pass = Pass::default();
        while self.display.pending() > 0 {
            let raw = self.display.next_event();
            pass.queued += 1;
            crate::debug_trace!("LOOP", "record {:?}", raw);

            let callbacks = &mut self.callbacks;
            let dispatch =
                self.translator
                    .translate(raw, &mut self.display, &mut |ev| callbacks.event(ev));
            match dispatch {
                Dispatch::Handled | Dispatch::Filtered => {}
                Dispatch::Expose { last } => pass.syn = last,
                Dispatch::Resize(size) => {
                    crate::debug_log!("LOOP", "resize {}x{}", size.width, size.height);
                    self.size = size;
                }
                Dispatch::Close => {
                    self.alive = false;
                    break;
                }
            }
        }
        pass
    }
}

/// Block until the connection or the wakeup pipe has something to report.
///
/// Returns the connection's `revents`; zero after an interrupted wait.
///
/// # Panics
///
/// Panics if `poll(2)` fails with anything but `EINTR`.
fn wait(xfd: RawFd, wakeup_fd: RawFd) -> libc::c_short {
    let mut fds = [
        libc::pollfd {
            fd: xfd,
            events: libc::POLLIN | libc::POLLERR,
            revents: 0,
        },
        libc::pollfd {
            fd: wakeup_fd,
            events: libc::POLLIN | libc::POLLERR,
            revents: 0,
        },
    ];
    // SAFETY: `fds` is a live array of two initialised pollfd entries.
    let rc = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, -1) };
    if rc < 0 {
        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::EINTR) {
            return 0;
        }
        log::error!("Session loop poll failed: {}", err);
        panic!("session loop: poll failed: {err}");
    }
    fds[0].revents
}

/// Start a session on its own thread.
///
/// Setup runs on the calling thread in this order: configuration check,
/// wakeup pipe, process-wide thread initialisation, provisioning. Any
/// failure is returned before a thread starts. The returned handle joins
/// after the Destroy event has been delivered.
pub fn spawn<P, C>(
    mut provisioner: P,
    callbacks: C,
    config: SessionConfig,
) -> Result<JoinHandle<()>, SessionError>
where
    P: Provisioner,
    C: Callbacks,
{
    config.validate()?;
    crate::debug::apply_config_log_level(config.log_level.to_level_filter());

    let wakeup = WakeupChannel::new()?;
    init_threads_process(|| provisioner.init_threads())?;
    let provisioned = provisioner.provision(&config)?;
    log::debug!(
        "Provisioned window {}x{} (delete atom {})",
        provisioned.size.width,
        provisioned.size.height,
        provisioned.delete_window
    );

    let session = Session::new(provisioned, wakeup, callbacks, &config);
    thread::Builder::new()
        .name(config.thread_name.clone())
        .spawn(move || session.run())
        .map_err(SessionError::Spawn)
}
