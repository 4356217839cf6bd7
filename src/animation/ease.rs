use std::sync::Arc;

/// Named easing presets used to map normalized animation progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
    /// Go to 1 at the midpoint, then come back to 0.
    BackAndForth,
    /// Run progress backwards (`1 - t`).
    Invert,
    /// Slow start with a steep finish: `log2(1 + t)^π`.
    Sled,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::BackAndForth => 1.0 - 2.0 * (0.5 - t).abs(),
            Self::Invert => 1.0 - t,
            Self::Sled => (1.0 + t).log2().powf(std::f64::consts::PI),
        }
    }
}

/// An arbitrary `[0, 1] -> [0, 1]` reparameterization.
///
/// Combinators assume `e(0) = 0` and `e(1) = 1` but never check it.
#[derive(Clone)]
pub struct Easing(Arc<dyn Fn(f64) -> f64 + Send + Sync>);

impl Easing {
    /// Wrap a closure as an easing.
    pub fn new(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Evaluate at progress `t`.
    pub fn apply(&self, t: f64) -> f64 {
        (self.0)(t)
    }

    /// Apply `self` first, then `next`.
    pub fn then(self, next: impl Into<Easing>) -> Self {
        let next = next.into();
        Self::new(move |t| next.apply(self.apply(t)))
    }

    /// Run this easing backwards: `t ↦ 1 - e(t)`.
    pub fn inverted(self) -> Self {
        Self::new(move |t| 1.0 - self.apply(t))
    }

    /// Pointwise mean of two easings.
    pub fn average(self, other: impl Into<Easing>) -> Self {
        let other = other.into();
        Self::new(move |t| (self.apply(t) + other.apply(t)) / 2.0)
    }

    /// Pointwise product of two easings.
    pub fn product(self, other: impl Into<Easing>) -> Self {
        let other = other.into();
        Self::new(move |t| self.apply(t) * other.apply(t))
    }
}

impl From<Ease> for Easing {
    fn from(ease: Ease) -> Self {
        Self::new(move |t| ease.apply(t))
    }
}

impl std::fmt::Debug for Easing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Easing(..)")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
