use std::any::Any;
use std::fmt;

use log::debug;
use sch_core::{Coordinate, Modification, ModificationError, ModificationResult};

use crate::error::SandboxError;
use crate::material::{EntityType, Material};
use crate::world::{SharedSandbox, lock};

fn failed(kind: &str, at: Coordinate, e: SandboxError) -> ModificationError {
    ModificationError::Failed {
        kind: kind.to_string(),
        at,
        reason: e.to_string(),
    }
}

/// Sets one block to a material.
///
/// Available when the target is inside the sandbox bounds and does not
/// already hold the material, so applying twice changes nothing the
/// second time.
#[derive(Clone)]
pub struct BlockModification {
    sandbox: SharedSandbox,
    material: Material,
}

impl BlockModification {
    /// Kind tag of block edits.
    pub const KIND: &'static str = "block-edit";

    /// Edit blocks of `sandbox` to `material`.
    pub fn new(sandbox: SharedSandbox, material: Material) -> Self {
        Self { sandbox, material }
    }

    /// The material written.
    pub fn material(&self) -> Material {
        self.material
    }
}

impl fmt::Debug for BlockModification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockModification")
            .field("material", &self.material)
            .finish_non_exhaustive()
    }
}

impl Modification for BlockModification {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn is_available(&self, at: Coordinate) -> bool {
        lock(&self.sandbox).is_ok_and(|s| s.in_bounds(at) && s.block_at(at) != self.material)
    }

    fn apply(&self, at: Coordinate) -> ModificationResult<()> {
        let mut sandbox = lock(&self.sandbox).map_err(|e| failed(Self::KIND, at, e))?;
        let previous = sandbox
            .set_block(at, self.material)
            .map_err(|e| failed(Self::KIND, at, e))?;
        debug!("block at {at}: {previous} -> {}", self.material);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Spawns one entity.
#[derive(Clone)]
pub struct EntitySpawnModification {
    sandbox: SharedSandbox,
    entity_type: EntityType,
}

impl EntitySpawnModification {
    /// Kind tag of entity spawns.
    pub const KIND: &'static str = "entity-spawn";

    /// Spawn `entity_type` into `sandbox`.
    pub fn new(sandbox: SharedSandbox, entity_type: EntityType) -> Self {
        Self {
            sandbox,
            entity_type,
        }
    }

    /// The entity type spawned.
    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }
}

impl fmt::Debug for EntitySpawnModification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySpawnModification")
            .field("entity_type", &self.entity_type)
            .finish_non_exhaustive()
    }
}

impl Modification for EntitySpawnModification {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn is_available(&self, at: Coordinate) -> bool {
        lock(&self.sandbox).is_ok_and(|s| s.in_bounds(at))
    }

    fn apply(&self, at: Coordinate) -> ModificationResult<()> {
        let mut sandbox = lock(&self.sandbox).map_err(|e| failed(Self::KIND, at, e))?;
        sandbox
            .spawn_entity(self.entity_type, at)
            .map_err(|e| failed(Self::KIND, at, e))?;
        debug!("spawned {} at {at}", self.entity_type);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
