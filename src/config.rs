use crate::error::{PhotoreelError, PhotoreelResult};

/// Read-only timing configuration for a render pass.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderConfig {
    /// Total on-screen time per photo, in milliseconds.
    pub photo_display_millis: u64,
    /// Output frames per second. Must be finite and > 0.
    pub frames_per_second: f64,
}

impl RenderConfig {
    pub fn validate(&self) -> PhotoreelResult<()> {
        if !self.frames_per_second.is_finite() || self.frames_per_second <= 0.0 {
            return Err(PhotoreelError::validation(
                "frames_per_second must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Frame budget for one photo: `round(photo_display_millis * fps / 1000)`.
    pub fn total_frames(&self) -> u64 {
        (self.photo_display_millis as f64 * self.frames_per_second / 1_000.0).round() as u64
    }
}
