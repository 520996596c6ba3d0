use log::trace;

use crate::OutputDriver;
use crate::canvas::FrameBuffer;

/// Driver that keeps the last written frame
#[derive(Debug, Default)]
pub struct MemoryDriver {
    last_frame: Option<FrameBuffer>,
    frames_written: u64,
    cleared: bool,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<&FrameBuffer> {
        self.last_frame.as_ref()
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Whether the panel was blanked after the last written frame
    pub fn is_cleared(&self) -> bool {
        self.cleared
    }
}

impl OutputDriver for MemoryDriver {
    fn write(&mut self, frame: &FrameBuffer) {
        self.last_frame = Some(frame.clone());
        self.frames_written += 1;
        self.cleared = false;
        trace!("frame {} written", self.frames_written);
    }

    fn clear(&mut self) {
        if let Some(last) = &mut self.last_frame {
            last.clear_black();
        }
        self.cleared = true;
    }
}
