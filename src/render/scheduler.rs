use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::{
    animation::{
        anim::Animation,
        frames::{Frame, frames},
    },
    encode::sink::FrameSink,
    foundation::{
        core::{Fps, FrameIndex, Rgba8, Viewport},
        error::{LanimError, LanimResult},
    },
    render::surface::{FrameBuffer, Paint},
};

/// Render configuration shared by every worker.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderOpts {
    /// Number of render workers. Each worker owns one frame buffer.
    pub workers: usize,
    /// Sampling rate.
    pub fps: Fps,
    /// Output geometry.
    pub viewport: Viewport,
    /// Color every frame is cleared to before painting.
    pub background: Rgba8,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            fps: Fps::default(),
            viewport: Viewport::default(),
            background: Rgba8::BLACK,
        }
    }
}

impl RenderOpts {
    /// Reject configurations no render could run with.
    pub fn validate(&self) -> LanimResult<()> {
        if self.workers == 0 {
            return Err(LanimError::validation("render workers must be >= 1"));
        }
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(LanimError::validation("fps must be non-zero"));
        }
        self.viewport.validate()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Counters reported by a finished render.
pub struct RenderStats {
    /// Frames painted and persisted.
    pub frames_total: u64,
    /// Workers that received a non-empty shard.
    pub workers_spawned: usize,
}

/// Sample `animation` at `opts.fps` and render every frame into `sink`.
pub fn render_animation<P>(
    animation: &Animation<P>,
    opts: &RenderOpts,
    sink: &dyn FrameSink,
) -> LanimResult<RenderStats>
where
    P: Paint + 'static,
{
    opts.validate()?;
    render_frames(frames(animation, opts.fps)?, opts, sink)
}

/// Fan `frames` out over `opts.workers` workers and persist each one under its own index.
///
/// Frame `i` (by position) belongs to worker `i % workers`. Each worker walks its shard in
/// order on a dedicated thread, so frame values are produced, painted and persisted without
/// leaving that thread. Completion order across workers is unspecified.
///
/// The first failing frame (a paint or persist error, or a panic) stops every worker before
/// its next frame, and its fault is returned once all workers have drained.
#[tracing::instrument(skip(frames, sink), fields(workers = opts.workers))]
pub fn render_frames<I, P>(
    frames: I,
    opts: &RenderOpts,
    sink: &dyn FrameSink,
) -> LanimResult<RenderStats>
where
    I: ExactSizeIterator<Item = Frame<P>> + Clone + Send,
    P: Paint,
{
    opts.validate()?;
    let total = frames.len();
    let spawned = opts.workers.min(total);
    let pool = build_thread_pool(spawned.max(1))?;

    let abort = AtomicBool::new(false);
    let fault: Mutex<Option<LanimError>> = Mutex::new(None);

    let shards: Vec<_> = (0..spawned)
        .map(|worker| frames.clone().skip(worker).step_by(opts.workers))
        .collect();

    pool.scope(|scope| {
        for (worker, shard) in shards.into_iter().enumerate() {
            let (abort, fault) = (&abort, &fault);
            scope.spawn(move |_| {
                let job = WorkerJob {
                    worker,
                    stride: opts.workers,
                    opts,
                    sink,
                    abort,
                };
                if let Err(err) = job.run(shard) {
                    tracing::warn!(worker, error = %err, "render worker faulted");
                    abort.store(true, Ordering::SeqCst);
                    let mut first = fault.lock();
                    if first.is_none() {
                        *first = Some(err);
                    }
                }
            });
        }
    });

    if let Some(err) = fault.into_inner() {
        return Err(err);
    }
    tracing::info!(frames = total, workers = spawned, "render finished");
    Ok(RenderStats {
        frames_total: total as u64,
        workers_spawned: spawned,
    })
}

/// One worker's view of the render.
struct WorkerJob<'a> {
    worker: usize,
    stride: usize,
    opts: &'a RenderOpts,
    sink: &'a dyn FrameSink,
    abort: &'a AtomicBool,
}

impl WorkerJob<'_> {
    fn run<P: Paint>(&self, mut shard: impl Iterator<Item = Frame<P>>) -> LanimResult<()> {
        // Index blamed for a panic raised while the next frame is being projected.
        let mut expected = self.worker as u64;
        let mut fb = FrameBuffer::new(self.opts.viewport)
            .map_err(|e| LanimError::worker_fault(expected, format!("frame buffer: {e}")))?;
        let mut rendered = 0u64;

        while !self.abort.load(Ordering::SeqCst) {
            let mut pulled = None;
            let step = catch_unwind(AssertUnwindSafe(|| -> LanimResult<bool> {
                let Some(frame) = shard.next() else {
                    return Ok(false);
                };
                pulled = Some(frame.index.0);
                self.render_one(&mut fb, &frame)?;
                Ok(true)
            }));
            match step {
                Ok(Ok(true)) => {
                    rendered += 1;
                    if let Some(idx) = pulled {
                        expected = idx.saturating_add(self.stride as u64);
                    }
                }
                Ok(Ok(false)) => break,
                Ok(Err(err)) => return Err(err),
                Err(payload) => {
                    return Err(LanimError::worker_fault(
                        pulled.unwrap_or(expected),
                        format!("panicked: {}", panic_message(payload.as_ref())),
                    ));
                }
            }
        }
        tracing::debug!(worker = self.worker, rendered, "worker drained");
        Ok(())
    }

    fn render_one<P: Paint>(&self, fb: &mut FrameBuffer, frame: &Frame<P>) -> LanimResult<()> {
        let FrameIndex(idx) = frame.index;
        fb.clear(self.opts.background);
        frame
            .value
            .paint(fb)
            .map_err(|e| LanimError::worker_fault(idx, format!("paint failed: {e}")))?;
        let rgba = fb.finish();
        self.sink
            .persist(frame.index, &rgba)
            .map_err(|e| LanimError::worker_fault(idx, format!("persist failed: {e}")))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn build_thread_pool(threads: usize) -> LanimResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(LanimError::validation("render thread count must be >= 1"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("lanim-render-{i}"))
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build rayon thread pool: {e}").into())
}

#[cfg(test)]
#[path = "../../tests/unit/render/scheduler.rs"]
mod tests;
