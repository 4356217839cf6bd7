/// Crate-wide result alias.
pub type LanimResult<T> = Result<T, LanimError>;

#[derive(thiserror::Error, Debug)]
/// Errors raised while building, sampling, caching, or rendering animations.
pub enum LanimError {
    /// Invalid animation construction (negative duration, empty sequence, bad crop bounds).
    #[error("construction error: {0}")]
    Construction(String),

    /// Two composite values cannot be combined because their shapes differ.
    #[error("composition shape error: {0}")]
    CompositionShape(String),

    /// A cache producer failed for `key`. Never cached; the next caller retries.
    #[error("cache computation failed for {key}: {message}")]
    CacheComputation {
        /// Debug rendering of the failing key.
        key: String,
        /// Producer failure, rendered with its cause chain.
        message: String,
    },

    /// A render worker faulted while painting or persisting a frame.
    #[error("render worker fault at frame {frame}: {message}")]
    RenderWorkerFault {
        /// Global index of the frame being processed.
        frame: u64,
        /// Fault description.
        message: String,
    },

    /// Invalid configuration value.
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O failure outside the render workers (directory setup, encoder spawn).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// Any other wrapped failure.
    Other(#[from] anyhow::Error),
}

impl LanimError {
    /// Build a [`LanimError::Construction`].
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    /// Build a [`LanimError::CompositionShape`].
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::CompositionShape(msg.into())
    }

    /// Build a [`LanimError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LanimError::RenderWorkerFault`] for `frame`.
    pub fn worker_fault(frame: u64, msg: impl Into<String>) -> Self {
        Self::RenderWorkerFault {
            frame,
            message: msg.into(),
        }
    }
}
