//! Lifecycle stage tracking.
//!
//! A session starts with no stage, moves to [`Stage::Running`] once the
//! application has its driver handle, and never stores a terminal stage:
//! destruction is reported by the Destroy event after the loop exits.

use x11_session_input::Stage;

/// Remembers the last announced stage so each change is emitted once.
#[derive(Debug, Default)]
pub struct StageTracker {
    current: Option<Stage>,
}

impl StageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last stage announced, if any.
    pub fn current(&self) -> Option<Stage> {
        self.current
    }

    /// Move to `stage`. Returns `true` if this is a change, in which case
    /// the caller must emit a stage event.
    pub fn transition(&mut self, stage: Stage) -> bool {
        if self.current == Some(stage) {
            return false;
        }
        crate::debug_info!("STAGE", "{:?} -> {:?}", self.current, stage);
        self.current = Some(stage);
        true
    }
}
