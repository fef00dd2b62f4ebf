//! Photoreel renders timestamped photo overlays into a frame-by-frame video stream.
//!
//! Given a directory of photographs and a monotonically advancing video timestamp,
//! photoreel decides which photos have "arrived", composites each one into a bordered
//! overlay, and emits a fade-in / hold / fade-out animation onto copies of the base
//! frame. Every photo is consumed exactly once.
//!
//! # Pipeline overview
//!
//! 1. **Index**: group photos by capture second ([`PhotoIndex`])
//! 2. **Compose**: scale and border a photo into an overlay ([`compose_overlay`])
//! 3. **Sequence**: expand an overlay into animation frames ([`sequence`])
//! 4. **Render**: consume due buckets and push frames to a [`FrameSink`] ([`render_due`])
//! 5. **Encode** (optional): stream frames to the system `ffmpeg` binary for MP4 output
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single-threaded**: each render call runs to completion; the index is a
//!   single-writer owned map with destructive [`PhotoIndex::take`].
//! - **Owned snapshots**: every emitted frame is an owned buffer taken at composite
//!   time; sinks may keep, drop, or mutate frames freely.
//! - **No fatal errors during a render pass**: a bad photo is reported to the
//!   [`ErrorSink`] side-channel and skipped, never aborting the remaining photos.
#![forbid(unsafe_code)]

pub mod compose;
pub mod config;
pub mod encode;
pub mod error;
pub mod index;
pub mod render;
pub mod report;
pub mod sequence;
pub mod sink;
pub mod timestamp;

pub use compose::{compose_overlay, load_overlay};
pub use config::RenderConfig;
pub use encode::{EncodeConfig, FfmpegEncoder, ensure_parent_dir, is_ffmpeg_on_path};
pub use error::{PhotoreelError, PhotoreelResult};
pub use index::{PHOTO_EXTENSIONS, Photo, PhotoIndex, TimeBucket, list_photo_files};
pub use render::{bucket_of, render_due};
pub use report::{ErrorSink, InMemoryErrorSink, LogErrorSink};
pub use sequence::{AnimationPlan, MIN_FADE_DISPLAY_MILLIS, RAMP_START_SIZE, sequence};
pub use sink::{FrameSink, InMemorySink, NullProgress, ProgressSink};
pub use timestamp::{ExifResolver, TimestampResolver};
