use std::sync::Arc;

use crate::{
    animation::{anim::Animation, ease::Easing},
    foundation::error::LanimResult,
    scene::{Movable, lerp},
};

/// Point on the way from `from` to `to` at progress `t`.
///
/// Every trajectory starts at `from` for `t = 0` and ends at `to` for `t = 1`.
pub type Trajectory = Arc<dyn Fn((f64, f64), (f64, f64), f64) -> (f64, f64) + Send + Sync>;

/// Straight line at constant speed.
pub fn linear_traj() -> Trajectory {
    Arc::new(|(x1, y1), (x2, y2), t| (lerp(x1, x2, t), lerp(y1, y2, t)))
}

/// Curve bulging off the straight line.
///
/// At progress `t` the point sits `bulge(t)` half-distances away from the line, along its
/// normal. `bulge` should vanish at both ends.
pub fn arc_traj(bulge: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Trajectory {
    Arc::new(move |(x1, y1), (x2, y2), t| {
        let phi = (y2 - y1).atan2(x2 - x1) + std::f64::consts::FRAC_PI_2;
        let (nx, ny) = (phi.cos(), phi.sin());
        let arm = bulge(t) * (x2 - x1).hypot(y2 - y1) / 2.0;
        (lerp(x1, x2, t) + arm * nx, lerp(y1, y2, t) + arm * ny)
    })
}

/// Half circle over the segment.
pub fn half_circle_traj() -> Trajectory {
    arc_traj(|t| (1.0 - (2.0 * t - 1.0).powi(2)).max(0.0).sqrt())
}

/// Shallow parabola, half a radius high at the midpoint.
pub fn low_arc_traj() -> Trajectory {
    arc_traj(|t| t * (1.0 - t) * 2.0)
}

/// Rise by `height`, travel across, then drop onto the target.
///
/// The first and last quarters are vertical; the middle half is horizontal.
pub fn lift_traj(height: f64) -> Trajectory {
    Arc::new(move |(x1, y1), (x2, y2), t| {
        if t < 0.25 {
            (x1, y1 - height * t * 4.0)
        } else if t < 0.75 {
            (lerp(x1, x2, 2.0 * (t - 0.25)), y1 - height)
        } else {
            (x2, lerp(y1 - height, y2, 4.0 * (t - 0.75)))
        }
    })
}

/// Reparameterize `traj` with `easing`.
pub fn ease_traj(traj: Trajectory, easing: impl Into<Easing>) -> Trajectory {
    let easing = easing.into();
    Arc::new(move |from, to, t| traj(from, to, easing.apply(t)))
}

/// One-second move of `value` to `(x, y)` along `traj`.
pub fn move_along<P>(value: P, x: f64, y: f64, traj: Trajectory) -> LanimResult<Animation<P>>
where
    P: Movable + Send + Sync + 'static,
{
    let from = value.position();
    Animation::new(1.0, move |t| {
        let (px, py) = traj(from, (x, y), t);
        value.moved(px - from.0, py - from.1)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/scene/trajectory.rs"]
mod tests;
