use image::RgbaImage;

use crate::{
    compose::load_overlay,
    config::RenderConfig,
    index::{Photo, PhotoIndex, TimeBucket},
    report::ErrorSink,
    sequence::{AnimationPlan, sequence},
    sink::{FrameSink, ProgressSink},
};

/// Bucket key for a video timestamp in epoch milliseconds.
pub fn bucket_of(timestamp_millis: i64) -> TimeBucket {
    timestamp_millis.div_euclid(1_000)
}

/// Render every photo that has arrived by `timestamp_millis` onto copies of
/// `base`, pushing the resulting animation frames to `frames` in order.
///
/// Due buckets are taken from the index up front, before any rendering, so a
/// bucket is never revisited even when one of its photos fails. Per photo:
/// a progress report naming the source file, overlay composition (decode
/// failure is reported and the photo skipped), then the fade sequence. A sink
/// write failure abandons the remaining frames of that photo only.
///
/// Callers are expected to advance `timestamp_millis` monotonically; the
/// consumed buckets cannot come back regardless.
#[allow(clippy::too_many_arguments)]
pub fn render_due(
    index: &mut PhotoIndex,
    timestamp_millis: i64,
    cfg: &RenderConfig,
    base: &RgbaImage,
    frames: &mut dyn FrameSink,
    progress: &mut dyn ProgressSink,
    errors: &mut dyn ErrorSink,
    percent: u32,
) {
    let due = index.due_buckets(bucket_of(timestamp_millis));
    if due.is_empty() {
        return;
    }

    // consume all due buckets before rendering anything
    let photos: Vec<Photo> = due.iter().flat_map(|b| index.take(*b)).collect();
    tracing::debug!(
        buckets = due.len(),
        photos = photos.len(),
        timestamp_millis,
        "rendering due photos"
    );

    let plan = AnimationPlan::from_config(cfg);

    for photo in photos {
        let name = photo
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| photo.source.display().to_string());
        progress.set_progress(percent, &format!("rendering photo {name}"));

        let overlay = match load_overlay(&photo.source, base.width(), base.height()) {
            Ok(overlay) => overlay,
            Err(err) => {
                errors.report(err);
                continue;
            }
        };

        for frame in sequence(base, &overlay, &plan) {
            if let Err(err) = frames.add_frame(frame) {
                errors.report(err);
                break;
            }
        }
    }
}
