//! An in-memory voxel world for playing schematics and animations.
//!
//! A [`Sandbox`] holds blocks keyed by integer position, spawned entities
//! and played sounds. [`BlockModification`], [`EntitySpawnModification`] and
//! [`SoundTransition`] act on a [`SharedSandbox`]; [`SandboxRegistries`]
//! builds the registries that read them back from records.

/// Blueprints and default registries for the sandbox kinds.
pub mod codec;
/// Error types for the sandbox crate.
pub mod error;
/// Block materials and entity types.
pub mod material;
/// Block-edit and entity-spawn modifications.
pub mod modification;
/// The sound transition.
pub mod sound;
/// The sandbox world.
pub mod world;

/// Re-exports of the sandbox blueprints and registries.
pub use codec::{
    SandboxRegistries, block_modification_blueprint, entity_spawn_blueprint,
    sandbox_modification_registry, sandbox_transition_registry, sound_transition_blueprint,
};
/// Re-exports of [`error::SandboxError`] and [`error::SandboxResult`].
pub use error::{SandboxError, SandboxResult};
/// Re-exports of [`material::EntityType`] and [`material::Material`].
pub use material::{EntityType, Material};
/// Re-exports of the sandbox modifications.
pub use modification::{BlockModification, EntitySpawnModification};
/// Re-export of [`sound::SoundTransition`].
pub use sound::SoundTransition;
/// Re-exports of the sandbox world types.
pub use world::{BlockPos, PlacedBlock, PlayedSound, Sandbox, SharedSandbox, SpawnedEntity};
