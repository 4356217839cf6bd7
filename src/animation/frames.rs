use crate::{
    animation::anim::Animation,
    foundation::{
        core::{Fps, FrameIndex},
        error::LanimResult,
    },
};

/// One sampled still frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<A> {
    /// Position in the output sequence.
    pub index: FrameIndex,
    /// Progress the animation was sampled at.
    pub progress: f64,
    /// Projected value.
    pub value: A,
}

/// Sample `animation` at `fps` into discrete frames.
///
/// Produces `round(fps * duration) + 1` frames at evenly spaced progress values, so the first
/// frame is the projection at 0 and the last at 1. A zero-step animation yields a single frame
/// at progress 0.
///
/// The iterator is lazy: each frame is projected when it is pulled. Calling `frames` again
/// re-derives the same sequence. Fails with [`LanimError::Validation`] when the frame count
/// does not fit in a `usize`.
///
/// [`LanimError::Validation`]: crate::LanimError::Validation
pub fn frames<A: 'static>(animation: &Animation<A>, fps: Fps) -> LanimResult<Frames<A>> {
    Ok(Frames {
        animation: animation.clone(),
        steps: fps.steps_for(animation.duration())?,
        next: 0,
    })
}

/// Iterator returned by [`frames`].
#[derive(Debug)]
pub struct Frames<A> {
    animation: Animation<A>,
    steps: u64,
    next: u64,
}

impl<A> Clone for Frames<A> {
    fn clone(&self) -> Self {
        Self {
            animation: self.animation.clone(),
            steps: self.steps,
            next: self.next,
        }
    }
}

impl<A: 'static> Frames<A> {
    /// Number of frames the full sequence contains.
    pub fn total(&self) -> u64 {
        self.steps + 1
    }

    fn progress_at(&self, k: u64) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            k as f64 / self.steps as f64
        }
    }
}

impl<A: 'static> Iterator for Frames<A> {
    type Item = Frame<A>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.steps {
            return None;
        }
        let k = self.next;
        self.next += 1;
        let progress = self.progress_at(k);
        Some(Frame {
            index: FrameIndex(k),
            progress,
            value: self.animation.sample(progress),
        })
    }

    // Skipped frames are never projected, so `skip`/`step_by` shards stay cheap.
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.next = self.next.saturating_add(n as u64);
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // `steps_for` guarantees `steps + 1` fits in both `u64` and `usize`.
        let left = (self.steps + 1).saturating_sub(self.next) as usize;
        (left, Some(left))
    }
}

impl<A: 'static> ExactSizeIterator for Frames<A> {}

#[cfg(test)]
#[path = "../../tests/unit/animation/frames.rs"]
mod tests;
