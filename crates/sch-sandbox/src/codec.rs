use std::str::FromStr;
use std::sync::Arc;

use sch_animation::codec::{has_timing, read_timing, transition_record};
use sch_animation::{
    AnimationDefinition, Transition, TransitionBlueprint, TransitionRegistry, animation_blueprint,
    builtin_transition_registry, transition_blueprint,
};
use sch_codec::coordinate::{has_xyz_object, read_coordinate};
use sch_codec::record::{self, Record};
use sch_codec::{
    Blueprint, CodecError, CodecResult, CoordinateCodec, Deserializer, ModificationBlueprint,
    ModificationRegistry, Serializer, modification_blueprint, schematic_blueprint,
};
use sch_core::Schematic;
use serde_json::Value;

use crate::error::SandboxError;
use crate::material::{EntityType, Material};
use crate::modification::{BlockModification, EntitySpawnModification};
use crate::sound::SoundTransition;
use crate::world::SharedSandbox;

/// Field holding a block edit's material.
pub const MATERIAL_FIELD: &str = "material";
/// Field holding an entity spawn's entity type.
pub const ENTITY_TYPE_FIELD: &str = "entity-type";
/// Field holding a sound transition's sound name.
pub const SOUND_FIELD: &str = "sound";
/// Field holding a sound transition's location.
pub const LOCATION_FIELD: &str = "location";
/// Field holding a sound transition's volume.
pub const VOLUME_FIELD: &str = "volume";
/// Field holding a sound transition's pitch.
pub const PITCH_FIELD: &str = "pitch";

/// Parse a closed-enum name. Unknown names fail the record.
fn parse_field<T>(r: &Record, field: &str) -> CodecResult<T>
where
    T: FromStr<Err = SandboxError>,
{
    record::require_str(r, field)?
        .parse()
        .map_err(|e: SandboxError| CodecError::malformed(field, e.to_string()))
}

/// Reads and writes `block-edit` records against one sandbox.
#[derive(Clone)]
pub struct BlockModificationCodec {
    sandbox: SharedSandbox,
}

impl BlockModificationCodec {
    /// Bind deserialized block edits to `sandbox`.
    pub fn new(sandbox: SharedSandbox) -> Self {
        Self { sandbox }
    }
}

impl Serializer<BlockModification> for BlockModificationCodec {
    fn serialize(&self, value: &BlockModification) -> CodecResult<Record> {
        let mut out = record::typed(BlockModification::KIND);
        out.insert(MATERIAL_FIELD.into(), Value::from(value.material().as_str()));
        Ok(out)
    }
}

impl Deserializer<BlockModification> for BlockModificationCodec {
    fn deserialize(&self, r: &Record) -> CodecResult<BlockModification> {
        let material: Material = parse_field(r, MATERIAL_FIELD)?;
        Ok(BlockModification::new(self.sandbox.clone(), material))
    }

    fn is_valid(&self, r: &Record) -> bool {
        record::has_str(r, MATERIAL_FIELD)
    }

    fn kind(&self) -> Option<&str> {
        Some(BlockModification::KIND)
    }
}

/// Reads and writes `entity-spawn` records against one sandbox.
#[derive(Clone)]
pub struct EntitySpawnCodec {
    sandbox: SharedSandbox,
}

impl EntitySpawnCodec {
    /// Bind deserialized spawns to `sandbox`.
    pub fn new(sandbox: SharedSandbox) -> Self {
        Self { sandbox }
    }
}

impl Serializer<EntitySpawnModification> for EntitySpawnCodec {
    fn serialize(&self, value: &EntitySpawnModification) -> CodecResult<Record> {
        let mut out = record::typed(EntitySpawnModification::KIND);
        out.insert(ENTITY_TYPE_FIELD.into(), Value::from(value.entity_type().as_str()));
        Ok(out)
    }
}

impl Deserializer<EntitySpawnModification> for EntitySpawnCodec {
    fn deserialize(&self, r: &Record) -> CodecResult<EntitySpawnModification> {
        let entity_type: EntityType = parse_field(r, ENTITY_TYPE_FIELD)?;
        Ok(EntitySpawnModification::new(self.sandbox.clone(), entity_type))
    }

    fn is_valid(&self, r: &Record) -> bool {
        record::has_str(r, ENTITY_TYPE_FIELD)
    }

    fn kind(&self) -> Option<&str> {
        Some(EntitySpawnModification::KIND)
    }
}

/// Reads and writes `sound` transition records against one sandbox.
#[derive(Clone)]
pub struct SoundTransitionCodec {
    sandbox: SharedSandbox,
}

impl SoundTransitionCodec {
    /// Bind deserialized sounds to `sandbox`.
    pub fn new(sandbox: SharedSandbox) -> Self {
        Self { sandbox }
    }
}

impl Serializer<SoundTransition> for SoundTransitionCodec {
    fn serialize(&self, value: &SoundTransition) -> CodecResult<Record> {
        let mut out = transition_record(SoundTransition::KIND, value.timing());
        out.insert(SOUND_FIELD.into(), Value::from(value.sound()));
        out.insert(
            LOCATION_FIELD.into(),
            Value::Object(CoordinateCodec.serialize(&value.location())?),
        );
        out.insert(VOLUME_FIELD.into(), Value::from(f64::from(value.volume())));
        out.insert(PITCH_FIELD.into(), Value::from(f64::from(value.pitch())));
        Ok(out)
    }
}

impl Deserializer<SoundTransition> for SoundTransitionCodec {
    fn deserialize(&self, r: &Record) -> CodecResult<SoundTransition> {
        let timing = read_timing(r)?;
        let sound = record::require_str(r, SOUND_FIELD)?;
        let location = read_coordinate(r, LOCATION_FIELD)?;
        let volume = record::require_f64(r, VOLUME_FIELD)? as f32;
        let pitch = record::require_f64(r, PITCH_FIELD)? as f32;
        Ok(
            SoundTransition::new(self.sandbox.clone(), sound, location, timing)
                .with_volume(volume)
                .with_pitch(pitch),
        )
    }

    fn is_valid(&self, r: &Record) -> bool {
        has_timing(r)
            && record::has_str(r, SOUND_FIELD)
            && has_xyz_object(r, LOCATION_FIELD)
            && record::has_number(r, VOLUME_FIELD)
            && record::has_number(r, PITCH_FIELD)
    }

    fn kind(&self) -> Option<&str> {
        Some(SoundTransition::KIND)
    }
}

/// Blueprint for block edits bound to `sandbox`.
pub fn block_modification_blueprint(sandbox: &SharedSandbox) -> ModificationBlueprint {
    modification_blueprint(Blueprint::<BlockModification>::from_codec(
        BlockModificationCodec::new(sandbox.clone()),
    ))
}

/// Blueprint for entity spawns bound to `sandbox`.
pub fn entity_spawn_blueprint(sandbox: &SharedSandbox) -> ModificationBlueprint {
    modification_blueprint(Blueprint::<EntitySpawnModification>::from_codec(
        EntitySpawnCodec::new(sandbox.clone()),
    ))
}

/// Blueprint for sound transitions bound to `sandbox`.
pub fn sound_transition_blueprint(sandbox: &SharedSandbox) -> TransitionBlueprint {
    transition_blueprint(Blueprint::<SoundTransition>::from_codec(
        SoundTransitionCodec::new(sandbox.clone()),
    ))
}

/// Modification registry holding every sandbox modification kind.
pub fn sandbox_modification_registry(sandbox: &SharedSandbox) -> ModificationRegistry {
    ModificationRegistry::new("modification")
        .with(block_modification_blueprint(sandbox))
        .with(entity_spawn_blueprint(sandbox))
}

/// Transition registry holding the built-in kinds plus `sound`.
pub fn sandbox_transition_registry(
    sandbox: &SharedSandbox,
    modifications: Arc<ModificationRegistry>,
) -> TransitionRegistry {
    builtin_transition_registry(modifications).with(sound_transition_blueprint(sandbox))
}

/// Both registries for one sandbox.
#[derive(Debug, Clone)]
pub struct SandboxRegistries {
    /// Every modification kind.
    pub modifications: Arc<ModificationRegistry>,
    /// Every transition kind.
    pub transitions: Arc<TransitionRegistry>,
}

impl SandboxRegistries {
    /// Build the default registries for `sandbox`.
    pub fn new(sandbox: &SharedSandbox) -> Self {
        let modifications = Arc::new(sandbox_modification_registry(sandbox));
        let transitions = Arc::new(sandbox_transition_registry(sandbox, modifications.clone()));
        Self {
            modifications,
            transitions,
        }
    }

    /// Blueprint for schematics using these registries.
    pub fn schematic_blueprint(&self) -> Blueprint<Schematic> {
        schematic_blueprint(self.modifications.clone())
    }

    /// Blueprint for animations using these registries.
    pub fn animation_blueprint(&self) -> Blueprint<AnimationDefinition> {
        animation_blueprint(self.transitions.clone())
    }
}
