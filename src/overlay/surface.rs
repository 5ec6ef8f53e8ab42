//! Render targets for the overlay

use super::{OverlayFrame, OverlayState};

/// Something that can display overlay frames
pub trait OverlaySurface {
    fn render(&mut self, frame: &OverlayFrame);
}

/// Keeps every frame it is given
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    pub frames: Vec<OverlayFrame>,
}

impl RecordingSurface {
    /// Text of the last populated frame
    pub fn final_text(&self) -> Option<&str> {
        self.frames
            .iter()
            .rev()
            .find(|f| f.state >= OverlayState::Populated)
            .map(|f| f.text.as_str())
    }

    pub fn last_state(&self) -> Option<OverlayState> {
        self.frames.last().map(|f| f.state)
    }

    pub fn is_removed(&self) -> bool {
        self.last_state() == Some(OverlayState::Removed)
    }
}

impl OverlaySurface for RecordingSurface {
    fn render(&mut self, frame: &OverlayFrame) {
        self.frames.push(frame.clone());
    }
}
