use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::{
    cache::single_flight::SingleFlight,
    foundation::error::{LanimError, LanimResult},
    render::surface::{Bitmap, FrameBuffer, Paint},
    scene::{Align, Alignable, Morphable, Movable, Scalable, lerp},
};

/// Bitmaps below this on-screen scale are skipped.
const MIN_VISIBLE_SCALE: f64 = 0.025;

/// Decoded bitmaps keyed by source path, shared by every sprite and render worker.
pub type BitmapCache = SingleFlight<PathBuf, Bitmap>;

/// Cache that reads and decodes image files on first use.
pub fn bitmap_cache() -> Arc<BitmapCache> {
    Arc::new(SingleFlight::new(|path: &PathBuf| {
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        Ok(Bitmap::decode(&bytes)?)
    }))
}

/// Image file drawn at a position, decoded once through a shared [`BitmapCache`].
///
/// `scale` is relative to a 1920px wide frame, so a sprite covers the same share of the frame
/// at any output resolution.
#[derive(Clone, Debug)]
pub struct Sprite {
    /// Anchor x.
    pub x: f64,
    /// Anchor y.
    pub y: f64,
    /// Scale relative to the 1920px reference width.
    pub scale: f64,
    /// How the bitmap sits relative to its anchor.
    pub align: Align,
    source: PathBuf,
    cache: Arc<BitmapCache>,
}

impl Sprite {
    /// Sprite of `source` centered at `(x, y)`.
    pub fn new(source: impl Into<PathBuf>, x: f64, y: f64, cache: Arc<BitmapCache>) -> Self {
        Self {
            x,
            y,
            scale: 1.0,
            align: Align::CC,
            source: source.into(),
            cache,
        }
    }

    /// Image file this sprite draws.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Decoded bitmap, loading it if no one has yet.
    pub fn bitmap(&self) -> LanimResult<Arc<Bitmap>> {
        self.cache.get(&self.source)
    }

    /// Same sprite at scale `scale`.
    pub fn with_scale(self, scale: f64) -> Self {
        Self { scale, ..self }
    }
}

impl Movable for Sprite {
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    fn moved(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }
}

impl Scalable for Sprite {
    fn scaled(&self, factor: f64) -> Self {
        Self {
            scale: self.scale * factor,
            ..self.clone()
        }
    }

    fn scaled_about(&self, factor: f64, cx: f64, cy: f64) -> Self {
        Self {
            x: cx + (self.x - cx) * factor,
            y: cy + (self.y - cy) * factor,
            scale: self.scale * factor,
            ..self.clone()
        }
    }
}

impl Morphable for Sprite {
    fn check_morph(&self, other: &Self) -> LanimResult<()> {
        if self.source != other.source {
            return Err(LanimError::shape(format!(
                "cannot morph sprite '{}' into '{}'",
                self.source.display(),
                other.source.display()
            )));
        }
        Ok(())
    }

    fn morphed(&self, other: &Self, t: f64) -> Self {
        Self {
            x: lerp(self.x, other.x, t),
            y: lerp(self.y, other.y, t),
            scale: lerp(self.scale, other.scale, t),
            align: self.align.blend(other.align, t),
            ..self.clone()
        }
    }
}

impl Alignable for Sprite {
    fn aligned(&self, align: Align) -> Self {
        Self {
            align,
            ..self.clone()
        }
    }
}

impl Paint for Sprite {
    fn paint(&self, fb: &mut FrameBuffer) -> LanimResult<()> {
        let scale = self.scale * fb.viewport().reference_scale();
        if scale <= MIN_VISIBLE_SCALE {
            return Ok(());
        }
        let bitmap = self.bitmap()?;
        let (cx, cy) = fb.viewport().to_pixels(self.x, self.y);
        let (x, y) = self.align.apply(
            cx,
            cy,
            f64::from(bitmap.width) * scale,
            f64::from(bitmap.height) * scale,
        );
        fb.draw_bitmap(&bitmap, x.round(), y.round(), scale);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/sprite.rs"]
mod tests;
