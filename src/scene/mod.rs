//! Drawable values and the capabilities animations are built from.
//!
//! Each capability is its own trait, so composites only ask for what they use: a
//! [`composite::Group`] of rectangles can be moved, scaled and morphed, while a group of
//! sprites can additionally be aligned.

/// Composite values: groups, pairs, either-or sums and opacity wrappers.
pub mod composite;
/// Geometric primitives.
pub mod shapes;
/// Cached bitmap primitive.
pub mod sprite;
/// Paths between two points and the moves that follow them.
pub mod trajectory;

use crate::{
    animation::{anim::Animation, ease::Ease},
    foundation::error::{LanimError, LanimResult},
};

/// A value with a position in scene units.
pub trait Movable: Sized {
    /// Center of the value.
    fn position(&self) -> (f64, f64);
    /// Copy of the value translated by `(dx, dy)`.
    fn moved(&self, dx: f64, dy: f64) -> Self;
}

/// A value that can grow or shrink.
pub trait Scalable: Movable {
    /// Copy scaled by `factor` about its own center.
    fn scaled(&self, factor: f64) -> Self;
    /// Copy scaled by `factor` about the point `(cx, cy)`.
    fn scaled_about(&self, factor: f64, cx: f64, cy: f64) -> Self;
}

/// A value that can be blended into another value of the same type.
pub trait Morphable: Sized {
    /// Fail if `self` and `other` are structurally incompatible.
    ///
    /// [`morph`] runs this once when the animation is built, so [`Morphable::morphed`] never
    /// has to report an error from inside a projector.
    fn check_morph(&self, _other: &Self) -> LanimResult<()> {
        Ok(())
    }

    /// Blend at `t`: `0` gives `self`, `1` gives `other`.
    fn morphed(&self, other: &Self, t: f64) -> Self;
}

/// A value whose anchor point can be changed.
pub trait Alignable: Sized {
    /// Copy of the value anchored with `align`.
    fn aligned(&self, align: Align) -> Self;
}

/// Horizontal and vertical anchoring of a box, as offsets in box sizes.
///
/// `dx`/`dy` move a top-left anchored box right/down by that fraction of its size, so
/// [`Align::CC`] centers it on its position.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Align {
    /// Horizontal offset in widths.
    pub dx: f64,
    /// Vertical offset in heights.
    pub dy: f64,
}

#[allow(missing_docs)]
impl Align {
    pub const CC: Self = Self::new(-0.5, -0.5);
    pub const LC: Self = Self::new(0.0, -0.5);
    pub const RC: Self = Self::new(-1.0, -0.5);
    pub const CU: Self = Self::new(-0.5, 0.0);
    pub const LU: Self = Self::new(0.0, 0.0);
    pub const RU: Self = Self::new(-1.0, 0.0);
    pub const CD: Self = Self::new(-0.5, -1.0);
    pub const LD: Self = Self::new(0.0, -1.0);
    pub const RD: Self = Self::new(-1.0, -1.0);

    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Linear blend toward `other`.
    pub fn blend(self, other: Self, t: f64) -> Self {
        Self::new(lerp(self.dx, other.dx, t), lerp(self.dy, other.dy, t))
    }

    /// Top-left corner of a `width x height` box anchored at `(x, y)`.
    pub fn apply(self, x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
        (x + self.dx * width, y + self.dy * height)
    }
}

impl Default for Align {
    fn default() -> Self {
        Self::CC
    }
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// One-second animation blending `from` into `to`.
pub fn morph<P>(from: P, to: P) -> LanimResult<Animation<P>>
where
    P: Morphable + Send + Sync + 'static,
{
    from.check_morph(&to)?;
    Animation::new(1.0, move |t| from.morphed(&to, t))
}

/// Translate `value` by `(dx, dy)` over one second.
pub fn move_by<P>(value: P, dx: f64, dy: f64) -> LanimResult<Animation<P>>
where
    P: Movable + Morphable + Send + Sync + 'static,
{
    let target = value.moved(dx, dy);
    morph(value, target)
}

/// Move `value` so its center ends at `(x, y)`.
pub fn move_to<P>(value: P, x: f64, y: f64) -> LanimResult<Animation<P>>
where
    P: Movable + Morphable + Send + Sync + 'static,
{
    let (px, py) = value.position();
    move_by(value, x - px, y - py)
}

/// Scale `value` by `factor` about its own center.
pub fn scale<P>(value: P, factor: f64) -> LanimResult<Animation<P>>
where
    P: Scalable + Morphable + Send + Sync + 'static,
{
    let target = value.scaled(factor);
    morph(value, target)
}

/// Scale `value` by `factor` about `(cx, cy)`.
pub fn scale_about<P>(value: P, factor: f64, cx: f64, cy: f64) -> LanimResult<Animation<P>>
where
    P: Scalable + Morphable + Send + Sync + 'static,
{
    let target = value.scaled_about(factor, cx, cy);
    morph(value, target)
}

/// Grow `value` from nothing at its own center.
pub fn appear<P>(value: P) -> LanimResult<Animation<P>>
where
    P: Scalable + Morphable + Send + Sync + 'static,
{
    morph(value.scaled(0.0), value)
}

/// Grow `value` out of the point `(x, y)`.
pub fn appear_from<P>(value: P, x: f64, y: f64) -> LanimResult<Animation<P>>
where
    P: Scalable + Morphable + Send + Sync + 'static,
{
    morph(value.scaled_about(0.0, x, y), value)
}

/// Shrink `value` into its own center; the reverse of [`appear`].
pub fn disappear<P>(value: P) -> LanimResult<Animation<P>>
where
    P: Scalable + Morphable + Send + Sync + 'static,
{
    Ok(appear(value)?.ease(Ease::Invert))
}

/// Shrink `value` into the point `(x, y)`; the reverse of [`appear_from`].
pub fn disappear_from<P>(value: P, x: f64, y: f64) -> LanimResult<Animation<P>>
where
    P: Scalable + Morphable + Send + Sync + 'static,
{
    Ok(appear_from(value, x, y)?.ease(Ease::Invert))
}

/// Slide `value` from its current anchor to `anchor` over one second.
pub fn align<P>(value: P, anchor: Align) -> LanimResult<Animation<P>>
where
    P: Alignable + Morphable + Send + Sync + 'static,
{
    let target = value.aligned(anchor);
    morph(value, target)
}

/// Run all `animations` side by side, holding each one's last frame until the longest ends.
pub fn parallel<P>(
    animations: impl IntoIterator<Item = Animation<P>>,
) -> LanimResult<Animation<composite::Group<P>>>
where
    P: 'static,
{
    let animations: Vec<_> = animations.into_iter().collect();
    if animations.is_empty() {
        return Err(LanimError::construction("parallel of no animations"));
    }
    let duration = animations
        .iter()
        .map(Animation::duration)
        .fold(0.0, f64::max);
    Animation::new(duration, move |t| {
        composite::Group::new(
            animations
                .iter()
                .map(|a| {
                    let local = if a.duration() == 0.0 {
                        1.0
                    } else {
                        (t * duration / a.duration()).min(1.0)
                    };
                    a.sample(local)
                })
                .collect(),
        )
    })
}

#[cfg(test)]
#[path = "../../tests/unit/scene/mod.rs"]
mod tests;
