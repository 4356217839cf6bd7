use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::foundation::{
    core::Fps,
    error::{LanimError, LanimResult},
};

/// Options for [`encode_png_sequence`].
#[derive(Clone, Debug)]
pub struct EncodeOpts {
    /// Directory holding `frame_<index>.png` files, numbered from 0.
    pub frames_dir: PathBuf,
    /// Frame rate of the sequence.
    pub fps: Fps,
    /// Output video path. The container is picked by `ffmpeg` from the extension.
    pub out_path: PathBuf,
    /// Overwrite `out_path` if it already exists.
    pub overwrite: bool,
}

impl EncodeOpts {
    /// Encode `frames_dir` into `out_path`, overwriting it.
    pub fn new(frames_dir: impl Into<PathBuf>, fps: Fps, out_path: impl Into<PathBuf>) -> Self {
        Self {
            frames_dir: frames_dir.into(),
            fps,
            out_path: out_path.into(),
            overwrite: true,
        }
    }

    /// Validate paths and flags before spawning anything.
    pub fn validate(&self) -> LanimResult<()> {
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(LanimError::validation("fps must be non-zero"));
        }
        if !self.frames_dir.is_dir() {
            return Err(LanimError::validation(format!(
                "frames directory '{}' does not exist",
                self.frames_dir.display()
            )));
        }
        if !self.overwrite && self.out_path.exists() {
            return Err(LanimError::validation(format!(
                "output file '{}' already exists",
                self.out_path.display()
            )));
        }
        Ok(())
    }

    /// Arguments passed to `ffmpeg`, without the program name.
    pub fn ffmpeg_args(&self) -> Vec<String> {
        let pattern = self.frames_dir.join("frame_%d.png");
        vec![
            if self.overwrite { "-y" } else { "-n" }.to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-framerate".to_string(),
            format!("{}/{}", self.fps.num, self.fps.den),
            "-start_number".to_string(),
            "0".to_string(),
            "-i".to_string(),
            pattern.display().to_string(),
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
            self.out_path.display().to_string(),
        ]
    }
}

/// Stitch a persisted PNG sequence into a video with the system `ffmpeg`.
#[tracing::instrument(skip(opts), fields(out = %opts.out_path.display()))]
pub fn encode_png_sequence(opts: &EncodeOpts) -> LanimResult<()> {
    opts.validate()?;
    if !is_ffmpeg_on_path() {
        return Err(anyhow::anyhow!(
            "ffmpeg is required for video encoding, but was not found on PATH"
        )
        .into());
    }
    ensure_parent_dir(&opts.out_path)?;

    let output = Command::new("ffmpeg")
        .args(opts.ffmpeg_args())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .context("failed to spawn ffmpeg (is it installed and on PATH?)")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow::anyhow!(
            "ffmpeg exited with status {}: {}",
            output.status,
            stderr.trim()
        )
        .into());
    }
    tracing::info!("encoded video");
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> LanimResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
