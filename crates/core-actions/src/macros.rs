//! Keyboard macro recording.

use tracing::debug;

use crate::Action;

/// Records dispatched actions between two `MacroRecord` toggles.
#[derive(Debug, Default)]
pub struct MacroRecorder {
    recording: bool,
    buffer: Vec<Action>,
    last: Vec<Action>,
}

impl MacroRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Start a fresh recording, or finish the current one.
    pub fn toggle(&mut self) {
        if self.recording {
            self.last = std::mem::take(&mut self.buffer);
            debug!(target: "actions.dispatch", actions = self.last.len(), "macro_recorded");
        } else {
            self.buffer.clear();
            debug!(target: "actions.dispatch", "macro_recording");
        }
        self.recording = !self.recording;
    }

    /// Note one dispatched action. Macro control actions are never recorded.
    pub fn record(&mut self, action: &Action) {
        if self.recording && !matches!(action, Action::MacroRecord | Action::MacroPlay) {
            self.buffer.push(*action);
        }
    }

    /// Actions of the last finished recording. Empty while recording, so a
    /// macro cannot replay itself.
    pub fn playback(&self) -> Vec<Action> {
        if self.recording {
            return Vec::new();
        }
        self.last.clone()
    }
}
