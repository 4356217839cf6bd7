use std::path::{Path, PathBuf};

use anyhow::Context as _;
use parking_lot::Mutex;

use crate::{
    foundation::{core::FrameIndex, error::LanimResult},
    render::surface::FrameRGBA,
};

/// Persistence capability for rendered frames.
///
/// Render workers share one sink and call `persist` concurrently, in no particular order. Each
/// call carries the frame's global index, which is the only thing tying an artifact to its
/// position in the output.
pub trait FrameSink: Sync {
    /// Store `frame` under `idx`.
    fn persist(&self, idx: FrameIndex, frame: &FrameRGBA) -> LanimResult<()>;
}

/// Writes each frame to `<dir>/frame_<index>.png`.
#[derive(Clone, Debug)]
pub struct PngDirSink {
    dir: PathBuf,
}

impl PngDirSink {
    /// Create the sink, creating `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> LanimResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create frame directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Directory frames are written into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Artifact path for `idx`.
    pub fn path_for(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("frame_{idx}.png"))
    }
}

impl FrameSink for PngDirSink {
    fn persist(&self, idx: FrameIndex, frame: &FrameRGBA) -> LanimResult<()> {
        let path = self.path_for(idx);
        let straight;
        let data = if frame.premultiplied {
            straight = unpremultiply_rgba8(&frame.data);
            &straight
        } else {
            &frame.data
        };
        image::save_buffer_with_format(
            &path,
            data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        tracing::trace!(frame = idx.0, path = %path.display(), "persisted frame");
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    frames: Mutex<Vec<(FrameIndex, FrameRGBA)>>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured frames sorted by index.
    pub fn frames(&self) -> Vec<(FrameIndex, FrameRGBA)> {
        let mut frames = self.frames.lock().clone();
        frames.sort_by_key(|(idx, _)| *idx);
        frames
    }

    /// Indices in the order they were persisted.
    pub fn arrival_order(&self) -> Vec<FrameIndex> {
        self.frames.lock().iter().map(|(idx, _)| *idx).collect()
    }

    /// Number of captured frames.
    pub fn len(&self) -> usize {
        self.frames.lock().len()
    }

    /// Return `true` when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.frames.lock().is_empty()
    }
}

impl FrameSink for InMemorySink {
    fn persist(&self, idx: FrameIndex, frame: &FrameRGBA) -> LanimResult<()> {
        self.frames.lock().push((idx, frame.clone()));
        Ok(())
    }
}

fn unpremultiply_rgba8(premul: &[u8]) -> Vec<u8> {
    let mut out = premul.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
