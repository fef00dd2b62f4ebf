use image::{RgbaImage, imageops};

use crate::config::RenderConfig;

/// Display durations below this render without a fade.
pub const MIN_FADE_DISPLAY_MILLIS: u64 = 3_000;

/// Starting overlay draw size (square) for the fade ramp, in pixels.
pub const RAMP_START_SIZE: u32 = 10;

/// Frame budget for one photo's on-screen animation.
///
/// Derived per render pass and discarded once the frames are emitted. On the
/// fade path the emitted total is `2 * ramp_frames + hold_frames`, which is
/// deliberately not reconciled with `total_frames` (a quirk of the timing
/// model that is preserved, not corrected).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationPlan {
    /// `round(photo_display_millis * fps / 1000)`.
    pub total_frames: u64,
    /// Fade ramp length: `floor(fps / 2)`. Zero on the no-fade path.
    pub ramp_frames: u64,
    /// Steady full-size segment: `total_frames - trunc(fps)`, clamped at zero.
    pub hold_frames: u64,
    /// Whether the fade path applies (`photo_display_millis >= 3000`).
    pub fade: bool,
}

impl AnimationPlan {
    pub fn from_config(cfg: &RenderConfig) -> Self {
        let fps = cfg.frames_per_second;
        let total_frames = cfg.total_frames();
        let fade = cfg.photo_display_millis >= MIN_FADE_DISPLAY_MILLIS;

        let (ramp_frames, hold_frames) = if fade {
            let ramp = (fps / 2.0).floor() as u64;
            // hold may compute negative for boundary configurations; clamp,
            // never underflow
            let hold = (total_frames as i64 - fps.trunc() as i64).max(0) as u64;
            (ramp, hold)
        } else {
            (0, 0)
        };

        Self {
            total_frames,
            ramp_frames,
            hold_frames,
            fade,
        }
    }

    /// Number of frames [`sequence`] will emit for this plan.
    pub fn emitted_frames(&self) -> u64 {
        if self.fade {
            2 * self.ramp_frames + self.hold_frames
        } else {
            self.total_frames
        }
    }
}

/// Expand one composited overlay into the ordered animation frame sequence.
///
/// Every returned frame is an owned snapshot of the working buffer at the
/// moment of compositing; later steps never alter frames already produced.
///
/// No-fade path: the overlay is drawn once, centered, and the composite is
/// emitted `total_frames` times (zero frames when the budget is zero).
///
/// Fade path: the overlay grows from [`RAMP_START_SIZE`] square at the
/// full-size overlay's centered anchor, stepping by an accumulated integer
/// increment per ramp frame. Fade-out re-emits the stored fade-in snapshots
/// in reverse, guaranteeing the two halves are visually symmetric.
pub fn sequence(base: &RgbaImage, overlay: &RgbaImage, plan: &AnimationPlan) -> Vec<RgbaImage> {
    let (base_w, base_h) = base.dimensions();
    let (overlay_w, overlay_h) = overlay.dimensions();
    let pos_x = (i64::from(base_w) - i64::from(overlay_w)) / 2;
    let pos_y = (i64::from(base_h) - i64::from(overlay_h)) / 2;

    let mut frames = Vec::with_capacity(plan.emitted_frames() as usize);

    if !plan.fade {
        if plan.total_frames == 0 {
            return frames;
        }
        let mut composited = base.clone();
        imageops::overlay(&mut composited, overlay, pos_x, pos_y);
        for _ in 0..plan.total_frames {
            frames.push(composited.clone());
        }
        return frames;
    }

    let mut working = base.clone();

    let mut ramp: Vec<RgbaImage> = Vec::with_capacity(plan.ramp_frames as usize);
    if plan.ramp_frames > 0 {
        let step_x = (i64::from(overlay_w) - i64::from(RAMP_START_SIZE)) / plan.ramp_frames as i64;
        let step_y = (i64::from(overlay_h) - i64::from(RAMP_START_SIZE)) / plan.ramp_frames as i64;
        let mut acc_x = i64::from(RAMP_START_SIZE);
        let mut acc_y = i64::from(RAMP_START_SIZE);

        for _ in 0..plan.ramp_frames {
            let w = acc_x.clamp(1, i64::from(overlay_w)) as u32;
            let h = acc_y.clamp(1, i64::from(overlay_h)) as u32;
            let partial = imageops::resize(overlay, w, h, imageops::FilterType::Nearest);
            imageops::overlay(&mut working, &partial, pos_x, pos_y);
            ramp.push(working.clone());
            acc_x += step_x;
            acc_y += step_y;
        }
    }

    // fade in
    frames.extend(ramp.iter().cloned());

    // hold at full size
    imageops::overlay(&mut working, overlay, pos_x, pos_y);
    for _ in 0..plan.hold_frames {
        frames.push(working.clone());
    }

    // fade out: the same ramp, largest first
    frames.extend(ramp.into_iter().rev());

    frames
}
