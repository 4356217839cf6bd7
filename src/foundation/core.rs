use crate::foundation::error::{LanimError, LanimResult};

/// Absolute 0-based frame index in render output space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl std::fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> LanimResult<Self> {
        if den == 0 {
            return Err(LanimError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(LanimError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Number of frame steps covering `secs`, rounded to nearest.
    ///
    /// Fails when `steps + 1` frames could not be counted in a `usize`.
    pub fn steps_for(self, secs: f64) -> LanimResult<u64> {
        let steps = (secs * self.as_f64()).round().max(0.0);
        // `usize::MAX as f64` rounds up, so `<` leaves room for the final frame.
        if !steps.is_finite() || steps >= usize::MAX as f64 || steps >= u64::MAX as f64 {
            return Err(LanimError::validation(format!(
                "{secs}s at {}/{} fps needs more frames than can be counted",
                self.num, self.den
            )));
        }
        Ok(steps as u64)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// Output frame geometry plus the scene coordinate system.
///
/// Scene coordinates are measured in `unit` pixels relative to `(center_x, center_y)`, so a
/// 16-unit-wide scene fills a frame of any resolution.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel x of scene origin.
    pub center_x: f64,
    /// Pixel y of scene origin.
    pub center_y: f64,
    /// Pixels per scene unit.
    pub unit: f64,
}

impl Viewport {
    /// Viewport with origin at the frame center and 16 units across.
    pub fn centered(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            center_x: f64::from(width) / 2.0,
            center_y: f64::from(height) / 2.0,
            unit: f64::from(width) / 16.0,
        }
    }

    /// Validate pixel dimensions against the raster backend limits.
    pub fn validate(&self) -> LanimResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(LanimError::validation("viewport width/height must be > 0"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(LanimError::validation(
                "viewport width/height must fit in u16",
            ));
        }
        if !self.unit.is_finite() || self.unit <= 0.0 {
            return Err(LanimError::validation("viewport unit must be finite and > 0"));
        }
        Ok(())
    }

    /// Map scene coordinates to pixel coordinates.
    pub fn to_pixels(&self, x: f64, y: f64) -> (f64, f64) {
        (self.center_x + self.unit * x, self.center_y + self.unit * y)
    }

    /// Ratio of this viewport's width to the 1920px reference width.
    pub fn reference_scale(&self) -> f64 {
        f64::from(self.width) / 1920.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::centered(1280, 720)
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from RGB components.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    pub(crate) fn to_cpu(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
