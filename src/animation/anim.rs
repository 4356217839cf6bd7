use std::sync::Arc;

use crate::{
    animation::ease::Easing,
    foundation::error::{LanimError, LanimResult},
};

/// Strategy turning a progress value in `[0, 1]` into a still frame.
pub type Projector<A> = Arc<dyn Fn(f64) -> A + Send + Sync>;

/// Scale applied to segment durations when laying out sequence windows.
const WINDOW_SCALE: f64 = 512.0;

/// A duration paired with a projector from progress to frames.
///
/// `duration` is metadata: it weights sub-animations inside [`sequence`] and the parallel
/// combinators, and decides how many frames [`frames`](crate::frames) samples. Projectors
/// always see progress in `[0, 1]` regardless of duration.
///
/// Animations are immutable. Every combinator consumes its inputs and returns a new value;
/// cloning only bumps a reference count.
pub struct Animation<A> {
    duration: f64,
    projector: Projector<A>,
}

impl<A> Clone for Animation<A> {
    fn clone(&self) -> Self {
        Self {
            duration: self.duration,
            projector: Arc::clone(&self.projector),
        }
    }
}

impl<A> std::fmt::Debug for Animation<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animation")
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

fn check_non_negative(what: &str, value: f64) -> LanimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LanimError::construction(format!(
            "{what} must be finite and >= 0, got {value}"
        )))
    }
}

impl<A: 'static> Animation<A> {
    /// Build an animation from a duration in seconds and a projector.
    pub fn new(
        duration: f64,
        projector: impl Fn(f64) -> A + Send + Sync + 'static,
    ) -> LanimResult<Self> {
        check_non_negative("animation duration", duration)?;
        Ok(Self::from_parts(duration, Arc::new(projector)))
    }

    // Callers guarantee `duration` is finite and non-negative.
    fn from_parts(duration: f64, projector: Projector<A>) -> Self {
        Self {
            duration,
            projector,
        }
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Shared handle to the projector.
    pub fn projector(&self) -> Projector<A> {
        Arc::clone(&self.projector)
    }

    /// Project the frame at progress `t`.
    pub fn sample(&self, t: f64) -> A {
        (self.projector)(t)
    }

    /// Apply `f` to every frame.
    pub fn map<B: 'static>(self, f: impl Fn(A) -> B + Send + Sync + 'static) -> Animation<B> {
        let inner = self.projector;
        Animation::from_parts(self.duration, Arc::new(move |t| f(inner(t))))
    }

    /// Like [`Animation::map`], but `f` also receives the progress.
    pub fn progress_map<B: 'static>(
        self,
        f: impl Fn(A, f64) -> B + Send + Sync + 'static,
    ) -> Animation<B> {
        let inner = self.projector;
        Animation::from_parts(self.duration, Arc::new(move |t| f(inner(t), t)))
    }

    /// Reparameterize progress through `easing` before projecting.
    ///
    /// Endpoint frames only stay put if the easing maps `0 -> 0` and `1 -> 1`.
    pub fn ease(self, easing: impl Into<Easing>) -> Self {
        let easing = easing.into();
        let inner = self.projector;
        Self::from_parts(self.duration, Arc::new(move |t| inner(easing.apply(t))))
    }

    /// Multiply the duration by `factor`. Only the sampling density changes.
    pub fn stretch(self, factor: f64) -> LanimResult<Self> {
        check_non_negative("stretch factor", factor)?;
        Ok(Self::from_parts(self.duration * factor, self.projector))
    }

    /// Keep only the `[start, finish]` slice of progress, with `0 <= start < finish <= 1`.
    pub fn crop(self, start: f64, finish: f64) -> LanimResult<Self> {
        if !(0.0 <= start && start < finish && finish <= 1.0) {
            return Err(LanimError::construction(format!(
                "invalid crop range ({start}, {finish}), expected 0 <= start < finish <= 1"
            )));
        }
        let span = finish - start;
        let inner = self.projector;
        Ok(Self::from_parts(
            self.duration * span,
            Arc::new(move |t| inner(start + t * span)),
        ))
    }

    /// Crop to the percentage range `[start_pct, finish_pct]`, both inclusive.
    ///
    /// `finish_pct` names the last percent bucket kept, so `(0, 99)` keeps everything.
    pub fn crop_percent(self, start_pct: u32, finish_pct: u32) -> LanimResult<Self> {
        let start = f64::from(start_pct) / 100.0;
        let finish = (f64::from(finish_pct) + 1.0) / 100.0;
        self.crop(start, finish)
    }

    /// Play `next` after `self`.
    pub fn then(self, next: Animation<A>) -> Self {
        sequence_of(vec![self, next])
    }

    /// Run `self` and `other` side by side for the longer of the two durations.
    ///
    /// The shorter animation holds its final frame once it has finished.
    pub fn par_longest<B: 'static>(self, other: Animation<B>) -> Animation<(A, B)> {
        let total = self.duration.max(other.duration);
        let local = move |t: f64, part: f64| {
            if part > 0.0 {
                (t * total / part).min(1.0)
            } else {
                1.0
            }
        };
        let (da, pa) = (self.duration, self.projector);
        let (db, pb) = (other.duration, other.projector);
        Animation::from_parts(
            total,
            Arc::new(move |t| (pa(local(t, da)), pb(local(t, db)))),
        )
    }

    /// Run `self` and `other` side by side for the shorter of the two durations.
    ///
    /// The tail of the longer animation is never sampled.
    pub fn par_shortest<B: 'static>(self, other: Animation<B>) -> Animation<(A, B)> {
        let total = self.duration.min(other.duration);
        let local = move |t: f64, part: f64| if part > 0.0 { t * total / part } else { t };
        let (da, pa) = (self.duration, self.projector);
        let (db, pb) = (other.duration, other.projector);
        Animation::from_parts(
            total,
            Arc::new(move |t| (pa(local(t, da)), pb(local(t, db)))),
        )
    }
}

impl<A: Clone + Send + Sync + 'static> Animation<A> {
    /// One-second animation of a single still frame.
    pub fn constant(value: A) -> Self {
        Self::from_parts(1.0, Arc::new(move |_| value.clone()))
    }

    /// Hold the first frame for `extra` seconds before playing.
    ///
    /// The held frame is projected once, here, and cloned for every sample in the pause.
    pub fn pause_before(self, extra: f64) -> LanimResult<Self> {
        check_non_negative("pause duration", extra)?;
        let total = extra + self.duration;
        let first = self.sample(0.0);
        let split = if total > 0.0 { extra / total } else { 0.0 };
        let inner = self.projector;
        Ok(Self::from_parts(
            total,
            Arc::new(move |t| {
                if t > split {
                    inner((t - split) / (1.0 - split))
                } else {
                    first.clone()
                }
            }),
        ))
    }

    /// Hold the last frame for `extra` seconds after playing.
    ///
    /// The held frame is projected once, here, and cloned for every sample in the pause.
    pub fn pause_after(self, extra: f64) -> LanimResult<Self> {
        check_non_negative("pause duration", extra)?;
        let total = extra + self.duration;
        let last = self.sample(1.0);
        let split = if total > 0.0 {
            self.duration / total
        } else {
            1.0
        };
        let inner = self.projector;
        Ok(Self::from_parts(
            total,
            Arc::new(move |t| {
                if t < split {
                    inner(t / split)
                } else {
                    last.clone()
                }
            }),
        ))
    }
}

impl<A: 'static> std::ops::Add for Animation<A> {
    type Output = Animation<A>;

    fn add(self, rhs: Animation<A>) -> Self::Output {
        self.then(rhs)
    }
}

struct Window<A> {
    begin: f64,
    end: f64,
    anim: Animation<A>,
}

/// Put animations one after another.
///
/// Each input owns a window of the output timeline proportional to its duration. Windows
/// share their boundary points; a sample exactly on a boundary plays the *later* segment at
/// local progress 0. Local progress is clamped into `[0, 1]` to absorb floating-point drift.
pub fn sequence<A: 'static>(
    animations: impl IntoIterator<Item = Animation<A>>,
) -> LanimResult<Animation<A>> {
    let animations: Vec<_> = animations.into_iter().collect();
    if animations.is_empty() {
        return Err(LanimError::construction("sequence needs at least one animation"));
    }
    Ok(sequence_of(animations))
}

// Callers guarantee `animations` is non-empty.
fn sequence_of<A: 'static>(animations: Vec<Animation<A>>) -> Animation<A> {
    let duration: f64 = animations.iter().map(|a| a.duration).sum();

    let mut cursor = 0.0;
    let windows: Vec<Window<A>> = animations
        .into_iter()
        .map(|anim| {
            let begin = cursor;
            cursor += anim.duration * WINDOW_SCALE;
            Window {
                begin,
                end: cursor,
                anim,
            }
        })
        .collect();
    let total = cursor;

    Animation::from_parts(
        duration,
        Arc::new(move |t| {
            let x = t * total;
            let idx = windows
                .iter()
                .rposition(|w| w.begin <= x && x <= w.end)
                .unwrap_or(if x < 0.0 { 0 } else { windows.len() - 1 });
            let w = &windows[idx];
            let width = w.end - w.begin;
            // A zero-width window is only chosen when nothing follows it: it has finished.
            let local = if width > 0.0 {
                ((x - w.begin) / width).clamp(0.0, 1.0)
            } else {
                1.0
            };
            w.anim.sample(local)
        }),
    )
}

/// Map each item to a list of animations and sequence everything produced, in order.
pub fn flat_map<T, A, I>(
    items: impl IntoIterator<Item = T>,
    f: impl FnMut(T) -> I,
) -> LanimResult<Animation<A>>
where
    A: 'static,
    I: IntoIterator<Item = Animation<A>>,
{
    sequence(items.into_iter().flat_map(f))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/anim.rs"]
mod tests;
