//! lanim builds animations as pure values and renders them to frames in parallel.
//!
//! - Describe motion with [`Animation`] and its combinators ([`sequence`], `par_longest`,
//!   `pause_after`, `ease`, ...)
//! - Sample it into [`frames`] at a fixed [`Fps`]
//! - Fan the frames out over a worker pool with [`render_animation`], persisting each one
//!   through a [`FrameSink`]
//!
//! Expensive per-key work shared by workers (decoded bitmaps, typeset glyphs) goes through a
//! [`SingleFlight`] cache so each key is computed once.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Animation values, easing and frame sampling.
pub mod animation;
/// Single-flight memoization.
pub mod cache;
/// Frame sinks and video encoding.
pub mod encode;
/// Frame buffers and the render scheduler.
pub mod render;
/// Drawable values and their capabilities.
pub mod scene;

pub use crate::foundation::core::{Fps, FrameIndex, Rgba8, Viewport};
pub use crate::foundation::error::{LanimError, LanimResult};

pub use crate::animation::anim::{Animation, Projector, flat_map, sequence};
pub use crate::animation::ease::{Ease, Easing};
pub use crate::animation::frames::{Frame, Frames, frames};
pub use crate::cache::single_flight::SingleFlight;
pub use crate::encode::ffmpeg::{EncodeOpts, encode_png_sequence, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, PngDirSink};
pub use crate::render::scheduler::{RenderOpts, RenderStats, render_animation, render_frames};
pub use crate::render::surface::{Bitmap, FrameBuffer, FrameRGBA, Paint};
