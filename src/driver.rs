//! Cross-thread driver handle.
//!
//! The application and its renderer talk back to the session through a
//! [`Driver`]: toggling animation and reporting finished frames. Both calls
//! may come from any thread and only touch the shared flag pair and the
//! wakeup channel.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::wakeup::WakeupChannel;

/// The animating / frame-ready pair, always accessed under one lock.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameFlags {
    pub animating: bool,
    pub frame_ready: bool,
}

/// State shared between the loop thread and every [`Driver`] clone.
#[derive(Debug)]
pub(crate) struct Shared {
    pub wakeup: WakeupChannel,
    pub flags: Mutex<FrameFlags>,
}

impl Shared {
    pub fn new(wakeup: WakeupChannel) -> Self {
        Self {
            wakeup,
            flags: Mutex::new(FrameFlags::default()),
        }
    }

    /// Snapshot the redraw decision and consume the frame-ready mark.
    ///
    /// Returns `animating && frame_ready`. The animating flag is left alone;
    /// only the driver changes it.
    pub fn take_redraw(&self) -> bool {
        let mut flags = self.flags.lock();
        let redraw = flags.animating && flags.frame_ready;
        flags.frame_ready = false;
        redraw
    }

    /// Drop a pending frame-ready mark once a wakeup has already decided
    /// this iteration's frame, so the notification is not answered twice.
    pub fn consume_frame_ready(&self) {
        self.flags.lock().frame_ready = false;
    }
}

/// Handle given to the application through `Callbacks::set_driver`.
#[derive(Debug, Clone)]
pub struct Driver {
    shared: Arc<Shared>,
}

impl Driver {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Turn continuous redraw on or off. Turning it on wakes the loop so
    /// the first animated frame is not delayed until the next input.
    pub fn set_animating(&self, animating: bool) {
        self.shared.flags.lock().animating = animating;
        if animating {
            self.shared.wakeup.signal();
        }
        crate::debug_log!("DRIVER", "animating={}", animating);
    }

    /// Report that the renderer finished presenting a frame.
    ///
    /// Ignored unless animating; otherwise the next loop iteration emits
    /// exactly one frame for this notification.
    pub fn notify_frame_complete(&self) {
        let animating = {
            let mut flags = self.shared.flags.lock();
            if flags.animating {
                flags.frame_ready = true;
            }
            flags.animating
        };
        if animating {
            self.shared.wakeup.signal();
        }
    }

    pub fn is_animating(&self) -> bool {
        self.shared.flags.lock().animating
    }
}
