use crate::{
    foundation::{core::Rgba8, error::LanimResult},
    render::surface::{FrameBuffer, Paint},
    scene::{Align, Alignable, Morphable, Movable, Scalable, lerp},
};

/// Outline width in pixels for a stroke of `line_width` at 1920px wide.
fn stroke_px(fb: &FrameBuffer, line_width: f64) -> f64 {
    (line_width * 4.0 * fb.viewport().reference_scale())
        .round()
        .max(1.0)
}

/// Axis-aligned rectangle outline centered at `(x, y)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Width in scene units.
    pub width: f64,
    /// Height in scene units.
    pub height: f64,
    /// Relative stroke width.
    pub line_width: f64,
    /// Stroke color.
    pub color: Rgba8,
}

impl Rect {
    /// White outline with the default stroke width.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            line_width: 1.0,
            color: Rgba8::WHITE,
        }
    }

    /// Same rectangle with a different stroke color.
    pub fn with_color(self, color: Rgba8) -> Self {
        Self { color, ..self }
    }
}

impl Movable for Rect {
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    fn moved(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

impl Scalable for Rect {
    fn scaled(&self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
            ..*self
        }
    }

    fn scaled_about(&self, factor: f64, cx: f64, cy: f64) -> Self {
        Self {
            x: cx + (self.x - cx) * factor,
            y: cy + (self.y - cy) * factor,
            width: self.width * factor,
            height: self.height * factor,
            ..*self
        }
    }
}

impl Morphable for Rect {
    fn morphed(&self, other: &Self, t: f64) -> Self {
        Self {
            x: lerp(self.x, other.x, t),
            y: lerp(self.y, other.y, t),
            width: lerp(self.width, other.width, t),
            height: lerp(self.height, other.height, t),
            line_width: lerp(self.line_width, other.line_width, t),
            color: if t < 1.0 { self.color } else { other.color },
        }
    }
}

impl Paint for Rect {
    fn paint(&self, fb: &mut FrameBuffer) -> LanimResult<()> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Ok(());
        }
        let line = stroke_px(fb, self.line_width);
        fb.outline_rect(self.x, self.y, self.width, self.height, line, self.color);
        Ok(())
    }
}

/// Filled triangle given by its center and each corner's offset from it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Triangle {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Corner offsets from the center.
    pub corners: [(f64, f64); 3],
    /// Fill color.
    pub color: Rgba8,
}

impl Triangle {
    /// White triangle at `(x, y)`.
    pub fn new(x: f64, y: f64, corners: [(f64, f64); 3]) -> Self {
        Self {
            x,
            y,
            corners,
            color: Rgba8::WHITE,
        }
    }
}

impl Movable for Triangle {
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    fn moved(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

impl Scalable for Triangle {
    fn scaled(&self, factor: f64) -> Self {
        Self {
            corners: self.corners.map(|(dx, dy)| (dx * factor, dy * factor)),
            ..*self
        }
    }

    fn scaled_about(&self, factor: f64, cx: f64, cy: f64) -> Self {
        let scaled = self.scaled(factor);
        Self {
            x: cx + (self.x - cx) * factor,
            y: cy + (self.y - cy) * factor,
            ..scaled
        }
    }
}

impl Morphable for Triangle {
    fn morphed(&self, other: &Self, t: f64) -> Self {
        let mut corners = self.corners;
        for (c, o) in corners.iter_mut().zip(other.corners) {
            *c = (lerp(c.0, o.0, t), lerp(c.1, o.1, t));
        }
        Self {
            x: lerp(self.x, other.x, t),
            y: lerp(self.y, other.y, t),
            corners,
            color: if t < 1.0 { self.color } else { other.color },
        }
    }
}

impl Paint for Triangle {
    fn paint(&self, fb: &mut FrameBuffer) -> LanimResult<()> {
        let points = self.corners.map(|(dx, dy)| (self.x + dx, self.y + dy));
        fb.fill_polygon(&points, self.color);
        Ok(())
    }
}

/// Invisible placeholder with only a position.
///
/// Useful as one side of a [`Sum`](crate::scene::composite::Sum) or to keep a group's shape
/// stable while an item is absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Nil {
    /// Position x.
    pub x: f64,
    /// Position y.
    pub y: f64,
}

impl Nil {
    /// Placeholder at `(x, y)`.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Movable for Nil {
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    fn moved(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Scalable for Nil {
    fn scaled(&self, _factor: f64) -> Self {
        *self
    }

    fn scaled_about(&self, factor: f64, cx: f64, cy: f64) -> Self {
        Self::new(cx + (self.x - cx) * factor, cy + (self.y - cy) * factor)
    }
}

impl Morphable for Nil {
    fn morphed(&self, other: &Self, t: f64) -> Self {
        Self::new(lerp(self.x, other.x, t), lerp(self.y, other.y, t))
    }
}

impl Alignable for Nil {
    fn aligned(&self, _align: Align) -> Self {
        *self
    }
}

impl Paint for Nil {
    fn paint(&self, _fb: &mut FrameBuffer) -> LanimResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/shapes.rs"]
mod tests;
