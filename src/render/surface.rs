use std::sync::Arc;

use vello_cpu::kurbo::{Affine, BezPath, Point, Rect};

use crate::foundation::{
    core::{Rgba8, Viewport},
    error::{LanimError, LanimResult},
};

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**. The scheduler clears every frame to an opaque
/// background, so persisted frames are effectively straight alpha as well.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA bytes of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(i..i + 4).map(|px| [px[0], px[1], px[2], px[3]])
    }
}

/// Premultiplied raster image ready to be blitted into a [`FrameBuffer`].
#[derive(Clone, Debug)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl Bitmap {
    /// Build from tightly packed premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(bytes: &[u8], width: u32, height: u32) -> LanimResult<Self> {
        let w = to_u16(width, "bitmap width")?;
        let h = to_u16(height, "bitmap height")?;
        if bytes.len()
            != (width as usize)
                .saturating_mul(height as usize)
                .saturating_mul(4)
        {
            return Err(LanimError::validation("bitmap byte len mismatch"));
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| {
                vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
            })
            .collect::<Vec<_>>();
        Ok(Self {
            width,
            height,
            pixmap: Arc::new(vello_cpu::Pixmap::from_parts_with_opacity(
                pixels, w, h, true,
            )),
        })
    }

    /// Decode an encoded image (PNG, JPEG, ...) and premultiply it.
    pub fn decode(bytes: &[u8]) -> LanimResult<Self> {
        use anyhow::Context as _;

        let rgba = image::load_from_memory(bytes)
            .context("decode image from memory")?
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut data = rgba.into_raw();
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul_rgba8(&data, width, height)
    }

    fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::clone(&self.pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

/// Paint surface owned by exactly one render worker.
///
/// Drawing calls take scene coordinates (see [`Viewport`]) unless they say otherwise. Commands
/// are recorded into a `vello_cpu` context and rasterized by [`FrameBuffer::finish`].
pub struct FrameBuffer {
    viewport: Viewport,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
}

impl FrameBuffer {
    /// Allocate a surface for `viewport`.
    pub fn new(viewport: Viewport) -> LanimResult<Self> {
        viewport.validate()?;
        let w = to_u16(viewport.width, "viewport width")?;
        let h = to_u16(viewport.height, "viewport height")?;
        Ok(Self {
            viewport,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Frame geometry.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Drop all recorded commands and start from a solid background.
    pub fn clear(&mut self, background: Rgba8) {
        self.ctx.reset();
        self.ctx.set_transform(Affine::IDENTITY);
        self.ctx.set_paint_transform(Affine::IDENTITY);
        self.ctx.set_paint(background.to_cpu());
        self.ctx.fill_rect(&Rect::new(
            0.0,
            0.0,
            f64::from(self.viewport.width),
            f64::from(self.viewport.height),
        ));
    }

    /// Fill the axis-aligned rectangle spanned by two scene-space corners.
    pub fn fill_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba8) {
        let (px0, py0) = self.viewport.to_pixels(x0, y0);
        let (px1, py1) = self.viewport.to_pixels(x1, y1);
        self.ctx.set_transform(Affine::IDENTITY);
        self.ctx.set_paint(color.to_cpu());
        self.ctx.fill_rect(&Rect::new(px0, py0, px1, py1));
    }

    /// Outline a rectangle centered at `(cx, cy)` with a pixel-space line width.
    pub fn outline_rect(
        &mut self,
        cx: f64,
        cy: f64,
        width: f64,
        height: f64,
        line_px: f64,
        color: Rgba8,
    ) {
        let (px0, py0) = self.viewport.to_pixels(cx - width / 2.0, cy - height / 2.0);
        let (px1, py1) = self.viewport.to_pixels(cx + width / 2.0, cy + height / 2.0);
        let lw = line_px.max(1.0);
        self.ctx.set_transform(Affine::IDENTITY);
        self.ctx.set_paint(color.to_cpu());
        // Four bars instead of a stroke keep edges pixel-aligned at small sizes.
        for bar in [
            Rect::new(px0, py0, px1, py0 + lw),
            Rect::new(px0, py1 - lw, px1, py1),
            Rect::new(px0, py0, px0 + lw, py1),
            Rect::new(px1 - lw, py0, px1, py1),
        ] {
            self.ctx.fill_rect(&bar);
        }
    }

    /// Fill a closed polygon given in scene coordinates.
    pub fn fill_polygon(&mut self, points: &[(f64, f64)], color: Rgba8) {
        let Some(((x0, y0), rest)) = points.split_first() else {
            return;
        };
        let mut path = BezPath::new();
        let (px, py) = self.viewport.to_pixels(*x0, *y0);
        path.move_to(Point::new(px, py));
        for (x, y) in rest {
            let (px, py) = self.viewport.to_pixels(*x, *y);
            path.line_to(Point::new(px, py));
        }
        path.close_path();
        self.ctx.set_transform(Affine::IDENTITY);
        self.ctx.set_paint(color.to_cpu());
        self.ctx.fill_path(&path);
    }

    /// Blit `bitmap` with its top-left corner at pixel `(x, y)`, scaled by `scale`.
    pub fn draw_bitmap(&mut self, bitmap: &Bitmap, x: f64, y: f64, scale: f64) {
        self.ctx
            .set_transform(Affine::translate((x, y)) * Affine::scale(scale));
        self.ctx.set_paint_transform(Affine::IDENTITY);
        self.ctx.set_paint(bitmap.paint());
        self.ctx.fill_rect(&Rect::new(
            0.0,
            0.0,
            f64::from(bitmap.width),
            f64::from(bitmap.height),
        ));
        self.ctx.set_transform(Affine::IDENTITY);
    }

    /// Composite everything drawn until the matching [`FrameBuffer::pop_layer`] at `opacity`.
    pub fn push_opacity(&mut self, opacity: f32) {
        self.ctx.push_opacity_layer(opacity.clamp(0.0, 1.0));
    }

    /// Close the innermost layer opened by [`FrameBuffer::push_opacity`].
    pub fn pop_layer(&mut self) {
        self.ctx.pop_layer();
    }

    /// Rasterize the recorded commands and copy the pixels out.
    pub fn finish(&mut self) -> FrameRGBA {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        FrameRGBA {
            width: self.viewport.width,
            height: self.viewport.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

/// A value that can draw itself onto a [`FrameBuffer`].
///
/// Called once per frame on a freshly cleared buffer, from whichever worker owns that frame.
pub trait Paint {
    /// Draw `self` into `fb`.
    fn paint(&self, fb: &mut FrameBuffer) -> LanimResult<()>;
}

impl<T: Paint + ?Sized> Paint for &T {
    fn paint(&self, fb: &mut FrameBuffer) -> LanimResult<()> {
        (**self).paint(fb)
    }
}

impl<T: Paint + ?Sized> Paint for Box<T> {
    fn paint(&self, fb: &mut FrameBuffer) -> LanimResult<()> {
        (**self).paint(fb)
    }
}

impl<T: Paint + ?Sized> Paint for Arc<T> {
    fn paint(&self, fb: &mut FrameBuffer) -> LanimResult<()> {
        (**self).paint(fb)
    }
}

impl<T: Paint> Paint for Option<T> {
    fn paint(&self, fb: &mut FrameBuffer) -> LanimResult<()> {
        match self {
            Some(inner) => inner.paint(fb),
            None => Ok(()),
        }
    }
}

// Parallel combinators produce tuples; paint left under right.
impl<A: Paint, B: Paint> Paint for (A, B) {
    fn paint(&self, fb: &mut FrameBuffer) -> LanimResult<()> {
        self.0.paint(fb)?;
        self.1.paint(fb)
    }
}

fn to_u16(v: u32, what: &str) -> LanimResult<u16> {
    v.try_into()
        .map_err(|_| LanimError::validation(format!("{what} exceeds u16: {v}")))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        for c in &mut px[..3] {
            *c = (((u16::from(*c) * a) + 127) / 255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
