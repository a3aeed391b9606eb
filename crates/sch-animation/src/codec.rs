use std::any::Any;
use std::sync::Arc;

use sch_codec::record::{self, Record};
use sch_codec::{
    Blueprint, BlueprintRegistry, CodecError, CodecResult, Deserializer, Identified,
    ModificationRegistry, Serializer, Tagged, schematic_blueprint,
};
use sch_core::Schematic;
use serde_json::Value;

use crate::animation::AnimationDefinition;
use crate::error::AnimationError;
use crate::timing::Timing;
use crate::transition::{EmptyTransition, SchematicTransition, SharedTransition, Transition};

/// Field holding the delay before a transition's effect.
pub const MILLISECONDS_BEFORE_FIELD: &str = "milliseconds-before";
/// Field holding the time a transition lingers after its effect.
pub const MILLISECONDS_AFTER_FIELD: &str = "milliseconds-after";
/// Field holding an animation's transition records.
pub const TRANSITIONS_FIELD: &str = "transitions";
/// Field holding the schematic of a schematic transition.
pub const SCHEMATIC_FIELD: &str = "schematic";
/// Field holding an animation's storage id.
pub const ID_FIELD: &str = "id";

/// Registry of every known transition kind.
pub type TransitionRegistry = BlueprintRegistry<dyn Transition>;

/// Blueprint for shared transition handles.
pub type TransitionBlueprint = Blueprint<SharedTransition>;

impl Tagged for dyn Transition {
    fn tag(&self) -> &str {
        self.kind()
    }

    fn concrete(&self) -> &dyn Any {
        self.as_any()
    }
}

fn share<T: Transition>(transition: T) -> SharedTransition {
    Arc::new(transition)
}

/// Lift a blueprint for one concrete transition into a registrable one.
pub fn transition_blueprint<T: Transition>(blueprint: Blueprint<T>) -> TransitionBlueprint {
    blueprint.erase(share::<T>)
}

/// A record tagged `kind` carrying `timing`.
pub fn transition_record(kind: &str, timing: Timing) -> Record {
    let mut out = record::typed(kind);
    out.insert(MILLISECONDS_BEFORE_FIELD.into(), Value::from(timing.before_ms()));
    out.insert(MILLISECONDS_AFTER_FIELD.into(), Value::from(timing.after_ms()));
    out
}

/// Read both duration fields.
pub fn read_timing(r: &Record) -> CodecResult<Timing> {
    Ok(Timing::from_millis(
        read_duration(r, MILLISECONDS_BEFORE_FIELD)?,
        read_duration(r, MILLISECONDS_AFTER_FIELD)?,
    ))
}

fn read_duration(r: &Record, field: &'static str) -> CodecResult<u64> {
    if let Some(ms) = r.get(field).and_then(Value::as_u64) {
        return Ok(ms);
    }
    let value = record::require_i64(r, field)?;
    let err = AnimationError::InvalidTiming { field, value };
    Err(CodecError::malformed(field, err.to_string()))
}

/// Whether both duration fields are non-negative integers.
pub fn has_timing(r: &Record) -> bool {
    [MILLISECONDS_BEFORE_FIELD, MILLISECONDS_AFTER_FIELD]
        .iter()
        .all(|field| r.get(*field).and_then(Value::as_u64).is_some())
}

/// Reads and writes `empty` transition records.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyTransitionCodec;

impl Serializer<EmptyTransition> for EmptyTransitionCodec {
    fn serialize(&self, value: &EmptyTransition) -> CodecResult<Record> {
        Ok(transition_record(EmptyTransition::KIND, value.timing()))
    }
}

impl Deserializer<EmptyTransition> for EmptyTransitionCodec {
    fn deserialize(&self, r: &Record) -> CodecResult<EmptyTransition> {
        Ok(EmptyTransition::new(read_timing(r)?))
    }

    fn is_valid(&self, r: &Record) -> bool {
        record::has_kind(r, EmptyTransition::KIND) && has_timing(r)
    }

    fn kind(&self) -> Option<&str> {
        Some(EmptyTransition::KIND)
    }
}

/// Blueprint for `empty` transitions.
pub fn empty_transition_blueprint() -> TransitionBlueprint {
    transition_blueprint(Blueprint::<EmptyTransition>::from_codec(EmptyTransitionCodec))
}

/// Reads and writes `schematic` transition records.
#[derive(Debug, Clone)]
pub struct SchematicTransitionCodec {
    schematic: Blueprint<Schematic>,
}

impl SchematicTransitionCodec {
    /// Read embedded schematics with `schematic`.
    pub fn new(schematic: Blueprint<Schematic>) -> Self {
        Self { schematic }
    }
}

impl Serializer<SchematicTransition> for SchematicTransitionCodec {
    fn serialize(&self, value: &SchematicTransition) -> CodecResult<Record> {
        let mut out = transition_record(SchematicTransition::KIND, value.timing());
        out.insert(
            SCHEMATIC_FIELD.into(),
            Value::Object(self.schematic.serialize(value.schematic())?),
        );
        Ok(out)
    }
}

impl Deserializer<SchematicTransition> for SchematicTransitionCodec {
    fn deserialize(&self, r: &Record) -> CodecResult<SchematicTransition> {
        let timing = read_timing(r)?;
        let schematic = self
            .schematic
            .deserialize(record::require_object(r, SCHEMATIC_FIELD)?)?;
        Ok(SchematicTransition::new(schematic, timing))
    }

    fn is_valid(&self, r: &Record) -> bool {
        has_timing(r)
            && r
                .get(SCHEMATIC_FIELD)
                .and_then(Value::as_object)
                .is_some_and(|s| self.schematic.is_valid(s))
    }

    fn kind(&self) -> Option<&str> {
        Some(SchematicTransition::KIND)
    }
}

/// Blueprint for `schematic` transitions whose modifications live in `modifications`.
pub fn schematic_transition_blueprint(
    modifications: Arc<ModificationRegistry>,
) -> TransitionBlueprint {
    transition_blueprint(Blueprint::<SchematicTransition>::from_codec(
        SchematicTransitionCodec::new(schematic_blueprint(modifications)),
    ))
}

/// A transition registry holding the `empty` and `schematic` kinds.
pub fn builtin_transition_registry(modifications: Arc<ModificationRegistry>) -> TransitionRegistry {
    TransitionRegistry::new("transition")
        .with(empty_transition_blueprint())
        .with(schematic_transition_blueprint(modifications))
}

/// Writes animation records.
#[derive(Debug, Clone)]
pub struct AnimationSerializer {
    transitions: Arc<TransitionRegistry>,
}

impl AnimationSerializer {
    /// Serialize transitions through `transitions`.
    pub fn new(transitions: Arc<TransitionRegistry>) -> Self {
        Self { transitions }
    }
}

impl Serializer<AnimationDefinition> for AnimationSerializer {
    fn serialize(&self, value: &AnimationDefinition) -> CodecResult<Record> {
        let mut out = Record::new();
        if let Some(id) = value.id() {
            out.insert(ID_FIELD.into(), Value::String(id.to_string()));
        }
        let transitions = value
            .transitions()
            .iter()
            .map(|t| self.transitions.serialize(t).map(Value::Object))
            .collect::<CodecResult<Vec<_>>>()?;
        out.insert(TRANSITIONS_FIELD.into(), Value::Array(transitions));
        Ok(out)
    }
}

/// Reads animation records. Any unreadable transition fails the animation.
#[derive(Debug, Clone)]
pub struct AnimationDeserializer {
    transitions: Arc<TransitionRegistry>,
}

impl AnimationDeserializer {
    /// Resolve transitions through `transitions`.
    pub fn new(transitions: Arc<TransitionRegistry>) -> Self {
        Self { transitions }
    }
}

impl Deserializer<AnimationDefinition> for AnimationDeserializer {
    fn deserialize(&self, r: &Record) -> CodecResult<AnimationDefinition> {
        let id = record::optional_str(r, ID_FIELD)?.map(str::to_owned);
        let entries = record::require_array(r, TRANSITIONS_FIELD)?;
        let transitions = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let entry = entry.as_object().ok_or_else(|| {
                    CodecError::malformed(
                        format!("{TRANSITIONS_FIELD}[{index}]"),
                        "must be an object",
                    )
                })?;
                self.transitions.deserialize(entry)
            })
            .collect::<CodecResult<Vec<_>>>()?;
        Ok(AnimationDefinition::new(id, transitions))
    }

    fn is_valid(&self, r: &Record) -> bool {
        record::optional_str(r, ID_FIELD).is_ok()
            && r
                .get(TRANSITIONS_FIELD)
                .and_then(Value::as_array)
                .is_some_and(|entries| {
                    entries
                        .iter()
                        .all(|entry| entry.as_object().is_some_and(|t| self.transitions.accepts(t)))
                })
    }
}

impl Identified for AnimationDefinition {
    const ARTIFACT: &'static str = "animation";

    fn id(&self) -> Option<&str> {
        AnimationDefinition::id(self)
    }
}

/// Blueprint for animations whose transition kinds live in `transitions`.
pub fn animation_blueprint(transitions: Arc<TransitionRegistry>) -> Blueprint<AnimationDefinition> {
    Blueprint::new(
        AnimationSerializer::new(transitions.clone()),
        AnimationDeserializer::new(transitions),
    )
}
