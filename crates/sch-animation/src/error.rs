use sch_codec::CodecError;
use sch_core::CoreError;

/// Result alias for animation operations.
pub type AnimationResult<T> = Result<T, AnimationError>;

/// Errors raised while building or playing animations.
#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    /// A transition duration was negative.
    #[error("invalid timing: {field} must be non-negative, got {value}")]
    InvalidTiming {
        /// Which duration, e.g. `milliseconds-before`.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// A transition's effect failed.
    #[error("{kind} transition failed: {reason}")]
    TransitionFailed {
        /// Kind of the failing transition.
        kind: String,
        /// Host-provided description.
        reason: String,
    },

    /// A schematic applied by a transition failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A record could not be read or written.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The driver has no animation under this handle.
    #[error("no animation with handle {0}")]
    UnknownAnimation(usize),
}
