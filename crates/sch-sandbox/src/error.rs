use crate::world::BlockPos;

/// Alias for `Result<T, SandboxError>`.
pub type SandboxResult<T> = Result<T, SandboxError>;

/// Errors raised by the sandbox world.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SandboxError {
    /// A write landed outside the sandbox bounds.
    #[error("block {0} is outside the sandbox bounds")]
    OutOfBounds(BlockPos),

    /// A material name is not recognised.
    #[error("unknown material: \"{0}\"")]
    UnknownMaterial(String),

    /// An entity type name is not recognised.
    #[error("unknown entity type: \"{0}\"")]
    UnknownEntityType(String),

    /// Another thread panicked while holding the sandbox lock.
    #[error("sandbox lock is poisoned")]
    Poisoned,
}
