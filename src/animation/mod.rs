//! Time-parameterized values and the combinators that compose them.

/// The [`Animation`](anim::Animation) value and its combinators.
pub mod anim;
/// Easing presets and composable easing functions.
pub mod ease;
/// Frame sampling at a fixed rate.
pub mod frames;
