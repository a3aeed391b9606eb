use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SandboxError;

/// Normalise a user-supplied name: lowercase, `-` and spaces read as `_`.
fn normalise(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Block materials known to the sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    /// No block. Setting air clears a position.
    Air,
    /// Smooth stone.
    Stone,
    /// Cobblestone.
    Cobblestone,
    /// Dirt.
    Dirt,
    /// Grass-topped dirt.
    Grass,
    /// Sand.
    Sand,
    /// Gravel.
    Gravel,
    /// Clear glass.
    Glass,
    /// Oak log.
    OakLog,
    /// Oak planks.
    OakPlanks,
    /// Water source.
    Water,
    /// Lava source.
    Lava,
    /// Standing torch.
    Torch,
    /// Block of gold.
    GoldBlock,
}

impl Material {
    /// Every material, in declaration order.
    pub const ALL: [Material; 14] = [
        Self::Air,
        Self::Stone,
        Self::Cobblestone,
        Self::Dirt,
        Self::Grass,
        Self::Sand,
        Self::Gravel,
        Self::Glass,
        Self::OakLog,
        Self::OakPlanks,
        Self::Water,
        Self::Lava,
        Self::Torch,
        Self::GoldBlock,
    ];

    /// Canonical record name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Air => "air",
            Self::Stone => "stone",
            Self::Cobblestone => "cobblestone",
            Self::Dirt => "dirt",
            Self::Grass => "grass",
            Self::Sand => "sand",
            Self::Gravel => "gravel",
            Self::Glass => "glass",
            Self::OakLog => "oak_log",
            Self::OakPlanks => "oak_planks",
            Self::Water => "water",
            Self::Lava => "lava",
            Self::Torch => "torch",
            Self::GoldBlock => "gold_block",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Material {
    type Err = SandboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = normalise(s);
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == name)
            .ok_or_else(|| SandboxError::UnknownMaterial(s.to_string()))
    }
}

/// Entity types the sandbox can spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Pig.
    Pig,
    /// Cow.
    Cow,
    /// Sheep.
    Sheep,
    /// Chicken.
    Chicken,
    /// Villager.
    Villager,
    /// Zombie.
    Zombie,
    /// Skeleton.
    Skeleton,
    /// Creeper.
    Creeper,
    /// Armor stand.
    ArmorStand,
    /// Firework rocket.
    Firework,
}

impl EntityType {
    /// Every entity type, in declaration order.
    pub const ALL: [EntityType; 10] = [
        Self::Pig,
        Self::Cow,
        Self::Sheep,
        Self::Chicken,
        Self::Villager,
        Self::Zombie,
        Self::Skeleton,
        Self::Creeper,
        Self::ArmorStand,
        Self::Firework,
    ];

    /// Canonical record name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pig => "pig",
            Self::Cow => "cow",
            Self::Sheep => "sheep",
            Self::Chicken => "chicken",
            Self::Villager => "villager",
            Self::Zombie => "zombie",
            Self::Skeleton => "skeleton",
            Self::Creeper => "creeper",
            Self::ArmorStand => "armor_stand",
            Self::Firework => "firework",
        }
    }

    /// Whether the entity is hostile.
    pub fn is_hostile(self) -> bool {
        matches!(self, Self::Zombie | Self::Skeleton | Self::Creeper)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = SandboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = normalise(s);
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == name)
            .ok_or_else(|| SandboxError::UnknownEntityType(s.to_string()))
    }
}
