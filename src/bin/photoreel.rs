use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::Parser;
use image::{Rgba, RgbaImage};
use photoreel::{
    EncodeConfig, ExifResolver, FfmpegEncoder, LogErrorSink, PhotoIndex, ProgressSink,
    RenderConfig, render_due,
};

/// Render a directory of timestamped photos into an MP4 slideshow
/// (requires `ffmpeg` on PATH).
#[derive(Parser, Debug)]
#[command(name = "photoreel", version)]
struct Cli {
    /// Directory containing photos (.jpg, .jpeg, .png) with EXIF capture times.
    #[arg(long)]
    photos: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Output width in pixels (must be even).
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Output height in pixels (must be even).
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Output frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// On-screen time per photo in milliseconds.
    #[arg(long = "photo-time", default_value_t = 5_000)]
    photo_time_millis: u64,

    /// Timing configuration JSON (overrides --fps and --photo-time).
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Prints progress reports to stderr.
#[derive(Debug, Default)]
struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn set_progress(&mut self, percent: u32, message: &str) {
        eprintln!("[{percent:3}%] {message}");
    }
}

fn read_config_json(path: &Path) -> anyhow::Result<RenderConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let r = BufReader::new(f);
    let cfg: RenderConfig = serde_json::from_reader(r).context("parse config JSON")?;
    Ok(cfg)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => read_config_json(path)?,
        None => RenderConfig {
            photo_display_millis: cli.photo_time_millis,
            frames_per_second: f64::from(cli.fps),
        },
    };
    cfg.validate()?;

    let resolver = ExifResolver::with_system_offset();
    let mut errors = LogErrorSink::new();
    let mut index = PhotoIndex::from_directory(Some(&cli.photos), &resolver, &mut errors);
    if index.is_empty() {
        anyhow::bail!(
            "no photos with a resolvable capture time in '{}'",
            cli.photos.display()
        );
    }

    let base = RgbaImage::from_pixel(cli.width, cli.height, Rgba([18, 20, 28, 255]));

    let fps = cfg.frames_per_second.round().max(1.0) as u32;
    let enc_cfg = EncodeConfig::mp4(&cli.out, cli.width, cli.height, fps);
    let mut sink = FfmpegEncoder::new(enc_cfg)?;
    let mut progress = StderrProgress;

    let buckets = index.buckets();
    let total = buckets.len();
    for (i, bucket) in buckets.into_iter().enumerate() {
        let percent = ((i + 1) * 100 / total) as u32;
        render_due(
            &mut index,
            bucket * 1_000,
            &cfg,
            &base,
            &mut sink,
            &mut progress,
            &mut errors,
            percent,
        );
    }

    sink.finish()?;
    eprintln!("wrote {}", cli.out.display());
    Ok(())
}
