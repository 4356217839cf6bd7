/// Parallel render scheduler.
pub mod scheduler;
/// Per-worker paint surface and raster types.
pub mod surface;
