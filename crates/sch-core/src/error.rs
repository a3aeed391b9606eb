use crate::position::Coordinate;

/// Result alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result alias for [`crate::Modification::apply`].
pub type ModificationResult<T> = Result<T, ModificationError>;

/// Failure reported by a modification when it is applied.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModificationError {
    /// `apply` was invoked at a coordinate where the modification is not available.
    #[error("{kind} modification is not available at {at}")]
    Unavailable {
        /// Discriminant of the modification.
        kind: String,
        /// Where the modification was applied.
        at: Coordinate,
    },

    /// The host rejected the modification.
    #[error("{kind} modification failed at {at}: {reason}")]
    Failed {
        /// Discriminant of the modification.
        kind: String,
        /// Where the modification was applied.
        at: Coordinate,
        /// Host-provided description.
        reason: String,
    },
}

/// Errors raised by the core model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// A modification failed while a schematic was being applied.
    #[error("schematic apply stopped at modification {index}: {source}")]
    Apply {
        /// Position of the failing modification in the schematic.
        index: usize,
        /// The underlying failure.
        #[source]
        source: ModificationError,
    },

    /// A sampling step was zero, negative, or not finite.
    #[error("invalid step {0}: must be positive and finite")]
    InvalidStep(f64),

    /// Sampling would produce more points than allowed.
    #[error("sampling would produce {requested} points, more than the limit of {limit}")]
    TooManySamples {
        /// Points the request would produce.
        requested: f64,
        /// The enforced maximum.
        limit: usize,
    },
}
