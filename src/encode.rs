use std::{
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use image::RgbaImage;

use crate::{
    error::{PhotoreelError, PhotoreelResult},
    sink::FrameSink,
};

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl EncodeConfig {
    /// MP4 output config with overwrite enabled.
    pub fn mp4(out_path: impl Into<PathBuf>, width: u32, height: u32, fps: u32) -> Self {
        Self {
            width,
            height,
            fps,
            out_path: out_path.into(),
            overwrite: true,
        }
    }

    pub fn validate(&self) -> PhotoreelResult<()> {
        if self.fps == 0 {
            return Err(PhotoreelError::validation("encoder fps must be at least 1"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(PhotoreelError::validation(format!(
                "encoder frame size {}x{} has a zero dimension",
                self.width, self.height
            )));
        }
        // yuv420p subsamples chroma 2x2, so both dimensions must be even
        if self.width % 2 != 0 || self.height % 2 != 0 {
            return Err(PhotoreelError::validation(format!(
                "encoder frame size {}x{} must have even dimensions for yuv420p output",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> PhotoreelResult<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    std::fs::create_dir_all(parent).map_err(|e| {
        PhotoreelError::sink(format!(
            "cannot create output directory '{}': {e}",
            parent.display()
        ))
    })?;
    Ok(())
}

/// Streams frames to the system `ffmpeg` binary as rawvideo RGBA over stdin,
/// encoding to H.264/yuv420p MP4.
///
/// Implements [`FrameSink`], so it can sit directly behind the render driver.
/// Call [`FfmpegEncoder::finish`] after the last frame to flush the encoder
/// and surface its exit status.
#[derive(Debug)]
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    child: Child,
    stdin: Option<ChildStdin>,
}

impl FfmpegEncoder {
    pub fn new(cfg: EncodeConfig) -> PhotoreelResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(PhotoreelError::sink(format!(
                "refusing to overwrite existing output '{}'",
                cfg.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(PhotoreelError::sink(
                "MP4 output needs the ffmpeg binary on PATH",
            ));
        }

        let mut child = spawn_ffmpeg(&cfg)?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| PhotoreelError::sink("ffmpeg did not expose a stdin pipe"))?;

        Ok(Self {
            cfg,
            child,
            stdin: Some(stdin),
        })
    }

    pub fn finish(mut self) -> PhotoreelResult<()> {
        // closing stdin tells ffmpeg the stream is complete
        drop(self.stdin.take());

        let output = self
            .child
            .wait_with_output()
            .map_err(|e| PhotoreelError::sink(format!("waiting on ffmpeg failed: {e}")))?;

        if !output.status.success() {
            return Err(PhotoreelError::sink(format!(
                "ffmpeg finished '{}' with {}: {}",
                self.cfg.out_path.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

impl FrameSink for FfmpegEncoder {
    fn add_frame(&mut self, frame: RgbaImage) -> PhotoreelResult<()> {
        if frame.dimensions() != (self.cfg.width, self.cfg.height) {
            return Err(PhotoreelError::validation(format!(
                "frame is {}x{} but the encoder was opened for {}x{}",
                frame.width(),
                frame.height(),
                self.cfg.width,
                self.cfg.height
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(PhotoreelError::sink("ffmpeg encoder is already finalized"));
        };

        use std::io::Write as _;
        stdin
            .write_all(frame.as_raw())
            .map_err(|e| PhotoreelError::sink(format!("pushing frame to ffmpeg failed: {e}")))?;

        Ok(())
    }
}

// Pipes rawvideo through the ffmpeg CLI instead of linking the FFmpeg
// libraries, so building photoreel needs no native dev headers.
fn spawn_ffmpeg(cfg: &EncodeConfig) -> PhotoreelResult<Child> {
    let mut cmd = Command::new("ffmpeg");
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .arg(if cfg.overwrite { "-y" } else { "-n" })
        .args(["-loglevel", "error"])
        .args(["-f", "rawvideo", "-pix_fmt", "rgba"])
        .args(["-s", &format!("{}x{}", cfg.width, cfg.height)])
        .args(["-r", &cfg.fps.to_string()])
        .args(["-i", "pipe:0"])
        .args(["-an", "-c:v", "libx264", "-pix_fmt", "yuv420p"])
        .args(["-movflags", "+faststart"])
        .arg(&cfg.out_path);

    cmd.spawn()
        .map_err(|e| PhotoreelError::sink(format!("could not start ffmpeg: {e}")))
}
