//! Frame persistence and video encoding.
//!
//! Render workers hand every finished frame to a [`FrameSink`](sink::FrameSink). Once a PNG
//! sequence is on disk, [`encode_png_sequence`](ffmpeg::encode_png_sequence) stitches it into a
//! video with the system `ffmpeg`.

/// `ffmpeg` invocation over a persisted PNG sequence.
pub mod ffmpeg;
/// Frame sink trait and built-in sinks.
pub mod sink;
