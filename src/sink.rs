use image::RgbaImage;

use crate::error::PhotoreelResult;

/// Sink contract for consuming rendered frames.
///
/// Ordering contract: `add_frame` is called in strict emission order; the
/// sink is assumed to buffer or encode frames in the order received. Each
/// frame is an owned snapshot, so the sink may keep or drop it freely.
pub trait FrameSink {
    /// Accept the next frame. A failure is non-fatal to the render pass, but
    /// the driver abandons the remaining frames of the current photo.
    fn add_frame(&mut self, frame: RgbaImage) -> PhotoreelResult<()>;
}

/// Advisory progress reporting; implementations must never block the pipeline.
pub trait ProgressSink {
    fn set_progress(&mut self, percent: u32, message: &str);
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    frames: Vec<RgbaImage>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the captured frames in emission order.
    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<RgbaImage> {
        self.frames
    }
}

impl FrameSink for InMemorySink {
    fn add_frame(&mut self, frame: RgbaImage) -> PhotoreelResult<()> {
        self.frames.push(frame);
        Ok(())
    }
}

/// Discards progress reports.
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn set_progress(&mut self, _percent: u32, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn in_memory_sink_keeps_emission_order() {
        let mut sink = InMemorySink::new();
        for v in [1u8, 2, 3] {
            sink.add_frame(RgbaImage::from_pixel(1, 1, Rgba([v, 0, 0, 255])))
                .unwrap();
        }
        let frames = sink.into_frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].get_pixel(0, 0)[0], 1);
        assert_eq!(frames[2].get_pixel(0, 0)[0], 3);
    }
}
