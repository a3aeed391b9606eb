use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use log::trace;
use sch_core::{Coordinate, Cuboid};
use serde::Serialize;

use crate::error::{SandboxError, SandboxResult};
use crate::material::{EntityType, Material};

/// Integer block position: the floor of each coordinate component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BlockPos {
    /// East-west block index.
    pub x: i64,
    /// Vertical block index.
    pub y: i64,
    /// North-south block index.
    pub z: i64,
}

impl BlockPos {
    /// Create a position from integer components.
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// The block containing `at`.
    pub fn containing(at: Coordinate) -> Self {
        Self {
            x: at.x.floor() as i64,
            y: at.y.floor() as i64,
            z: at.z.floor() as i64,
        }
    }
}

impl From<Coordinate> for BlockPos {
    fn from(at: Coordinate) -> Self {
        Self::containing(at)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// A non-air block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlacedBlock {
    /// Where the block sits.
    pub pos: BlockPos,
    /// What it is made of.
    pub material: Material,
}

/// An entity spawned into the sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpawnedEntity {
    /// What was spawned.
    pub entity_type: EntityType,
    /// Exact spawn location.
    pub at: Coordinate,
}

/// A sound played in the sandbox.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayedSound {
    /// Sound name.
    pub sound: String,
    /// Where it was played.
    pub location: Coordinate,
    /// Playback volume, 1.0 is normal.
    pub volume: f32,
    /// Playback pitch, 1.0 is normal.
    pub pitch: f32,
}

/// An in-memory voxel world.
///
/// Positions never written hold [`Material::Air`]. When bounds are set,
/// writes outside them fail with [`SandboxError::OutOfBounds`].
#[derive(Debug, Clone, Default)]
pub struct Sandbox {
    blocks: BTreeMap<BlockPos, Material>,
    entities: Vec<SpawnedEntity>,
    sounds: Vec<PlayedSound>,
    bounds: Option<Cuboid>,
}

/// A sandbox shared between the modifications and transitions acting on it.
pub type SharedSandbox = Arc<Mutex<Sandbox>>;

impl Sandbox {
    /// An empty, unbounded sandbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit writes to `bounds`.
    pub fn with_bounds(mut self, bounds: Cuboid) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Wrap the sandbox for sharing.
    pub fn into_shared(self) -> SharedSandbox {
        Arc::new(Mutex::new(self))
    }

    /// The write bounds, if any.
    pub fn bounds(&self) -> Option<Cuboid> {
        self.bounds
    }

    /// Whether `at` may be written.
    pub fn in_bounds(&self, at: Coordinate) -> bool {
        self.bounds.is_none_or(|b| b.contains(at))
    }

    /// The material of the block containing `at`.
    pub fn block_at(&self, at: Coordinate) -> Material {
        self.blocks
            .get(&BlockPos::containing(at))
            .copied()
            .unwrap_or(Material::Air)
    }

    /// Set the block containing `at`, returning the previous material.
    pub fn set_block(&mut self, at: Coordinate, material: Material) -> SandboxResult<Material> {
        let pos = BlockPos::containing(at);
        if !self.in_bounds(at) {
            return Err(SandboxError::OutOfBounds(pos));
        }
        trace!("set {pos} to {material}");
        let previous = if material == Material::Air {
            self.blocks.remove(&pos)
        } else {
            self.blocks.insert(pos, material)
        };
        Ok(previous.unwrap_or(Material::Air))
    }

    /// Every non-air block, ordered by position.
    pub fn blocks(&self) -> Vec<PlacedBlock> {
        self.blocks
            .iter()
            .map(|(&pos, &material)| PlacedBlock { pos, material })
            .collect()
    }

    /// Number of non-air blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Spawn an entity at `at`. Returns its index.
    pub fn spawn_entity(
        &mut self,
        entity_type: EntityType,
        at: Coordinate,
    ) -> SandboxResult<usize> {
        if !self.in_bounds(at) {
            return Err(SandboxError::OutOfBounds(BlockPos::containing(at)));
        }
        trace!("spawn {entity_type} at {at}");
        self.entities.push(SpawnedEntity { entity_type, at });
        Ok(self.entities.len() - 1)
    }

    /// Spawned entities, oldest first.
    pub fn entities(&self) -> &[SpawnedEntity] {
        &self.entities
    }

    /// Record a played sound. Sounds are not bounded.
    pub fn play_sound(&mut self, sound: PlayedSound) {
        trace!("play {} at {}", sound.sound, sound.location);
        self.sounds.push(sound);
    }

    /// Played sounds, oldest first.
    pub fn sounds(&self) -> &[PlayedSound] {
        &self.sounds
    }

    /// Remove every block, entity and sound. Bounds are kept.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.entities.clear();
        self.sounds.clear();
    }
}

/// Lock a shared sandbox.
pub fn lock(sandbox: &SharedSandbox) -> SandboxResult<MutexGuard<'_, Sandbox>> {
    sandbox.lock().map_err(|_| SandboxError::Poisoned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded() -> Sandbox {
        Sandbox::new().with_bounds(Cuboid::new(
            Coordinate::new(0.0, 0.0, 0.0),
            Coordinate::new(10.0, 10.0, 10.0),
        ))
    }

    #[test]
    fn block_pos_floors_negative_coordinates() {
        let pos = BlockPos::containing(Coordinate::new(-0.5, 1.9, -3.0));
        assert_eq!(pos, BlockPos::new(-1, 1, -3));
        assert_eq!(pos.to_string(), "[-1, 1, -3]");
    }

    #[test]
    fn unwritten_blocks_are_air() {
        let sandbox = Sandbox::new();
        assert_eq!(sandbox.block_at(Coordinate::new(4.0, 4.0, 4.0)), Material::Air);
        assert_eq!(sandbox.block_count(), 0);
    }

    #[test]
    fn set_block_returns_previous() {
        let mut sandbox = Sandbox::new();
        let at = Coordinate::new(1.2, 2.0, 3.7);
        assert_eq!(sandbox.set_block(at, Material::Stone).unwrap(), Material::Air);
        let same_block = Coordinate::new(1.0, 2.0, 3.0);
        assert_eq!(
            sandbox.set_block(same_block, Material::Glass).unwrap(),
            Material::Stone
        );
        assert_eq!(sandbox.block_at(at), Material::Glass);
    }

    #[test]
    fn setting_air_clears() {
        let mut sandbox = Sandbox::new();
        let at = Coordinate::ORIGIN;
        sandbox.set_block(at, Material::Dirt).unwrap();
        sandbox.set_block(at, Material::Air).unwrap();
        assert_eq!(sandbox.block_count(), 0);
    }

    #[test]
    fn bounds_reject_outside_writes() {
        let mut sandbox = bounded();
        let err = sandbox
            .set_block(Coordinate::new(11.0, 0.0, 0.0), Material::Stone)
            .unwrap_err();
        assert_eq!(err, SandboxError::OutOfBounds(BlockPos::new(11, 0, 0)));
        assert!(sandbox.spawn_entity(EntityType::Pig, Coordinate::new(0.0, -1.0, 0.0)).is_err());
        assert!(sandbox.spawn_entity(EntityType::Pig, Coordinate::new(5.0, 5.0, 5.0)).is_ok());
    }

    #[test]
    fn blocks_are_ordered_by_position() {
        let mut sandbox = Sandbox::new();
        sandbox.set_block(Coordinate::new(2.0, 0.0, 0.0), Material::Sand).unwrap();
        sandbox.set_block(Coordinate::new(1.0, 0.0, 0.0), Material::Stone).unwrap();
        let positions: Vec<_> = sandbox.blocks().iter().map(|b| b.pos.x).collect();
        assert_eq!(positions, vec![1, 2]);
    }

    #[test]
    fn clear_keeps_bounds() {
        let mut sandbox = bounded();
        sandbox.set_block(Coordinate::ORIGIN, Material::Stone).unwrap();
        sandbox.play_sound(PlayedSound {
            sound: "bell".into(),
            location: Coordinate::ORIGIN,
            volume: 1.0,
            pitch: 1.0,
        });
        sandbox.clear();
        assert_eq!(sandbox.block_count(), 0);
        assert!(sandbox.sounds().is_empty());
        assert!(sandbox.bounds().is_some());
    }
}
