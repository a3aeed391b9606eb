use std::sync::Arc;

use log::warn;
use sch_core::Schematic;
use serde_json::Value;

use crate::blueprint::{Blueprint, Deserializer, Serializer};
use crate::coordinate::{self, CoordinateCodec};
use crate::error::{CodecError, CodecResult};
use crate::modification::{
    ModificationRegistry, RelativeModificationDeserializer, RelativeModificationSerializer,
};
use crate::record::{self, Record};
use crate::store::Identified;

/// Field holding the optional storage id.
pub const ID_FIELD: &str = "id";
/// Field holding the schematic's anchor.
pub const INITIAL_POSITION_FIELD: &str = "initial-position";
/// Field holding the relative modification records.
pub const MODIFICATIONS_FIELD: &str = "modifications";

/// What to do with a modification entry that cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordPolicy {
    /// Fail the whole schematic.
    #[default]
    Strict,
    /// Log a warning and drop the entry.
    SkipInvalid,
}

/// Writes schematic records.
#[derive(Debug, Clone)]
pub struct SchematicSerializer {
    relative: RelativeModificationSerializer,
}

impl SchematicSerializer {
    /// Serialize modifications through `registry`.
    pub fn new(registry: Arc<ModificationRegistry>) -> Self {
        Self {
            relative: RelativeModificationSerializer::new(registry),
        }
    }
}

impl Serializer<Schematic> for SchematicSerializer {
    fn serialize(&self, value: &Schematic) -> CodecResult<Record> {
        let mut out = Record::new();
        if let Some(id) = value.id() {
            out.insert(ID_FIELD.into(), Value::String(id.to_string()));
        }
        out.insert(
            INITIAL_POSITION_FIELD.into(),
            Value::Object(CoordinateCodec.serialize(&value.initial_position())?),
        );
        let modifications = value
            .modifications()
            .iter()
            .map(|m| self.relative.serialize(m).map(Value::Object))
            .collect::<CodecResult<Vec<_>>>()?;
        out.insert(MODIFICATIONS_FIELD.into(), Value::Array(modifications));
        Ok(out)
    }
}

/// Reads schematic records.
#[derive(Debug, Clone)]
pub struct SchematicDeserializer {
    relative: RelativeModificationDeserializer,
    policy: RecordPolicy,
}

impl SchematicDeserializer {
    /// Resolve modifications through `registry`, failing on any bad entry.
    pub fn new(registry: Arc<ModificationRegistry>) -> Self {
        Self {
            relative: RelativeModificationDeserializer::new(registry),
            policy: RecordPolicy::Strict,
        }
    }

    /// Set how unreadable modification entries are handled.
    pub fn with_policy(mut self, policy: RecordPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The active record policy.
    pub fn policy(&self) -> RecordPolicy {
        self.policy
    }

    /// Whether `deserialize` would keep or skip `entry` without failing.
    fn accepts_entry(&self, entry: &Value) -> bool {
        match self.policy {
            RecordPolicy::SkipInvalid => true,
            RecordPolicy::Strict => entry
                .as_object()
                .is_some_and(|entry| self.relative.is_valid(entry)),
        }
    }

    fn read_entry(
        &self,
        index: usize,
        entry: &Value,
    ) -> CodecResult<sch_core::RelativeModification> {
        let entry = entry.as_object().ok_or_else(|| {
            CodecError::malformed(
                format!("{MODIFICATIONS_FIELD}[{index}]"),
                "must be an object",
            )
        })?;
        self.relative.deserialize(entry)
    }
}

impl Deserializer<Schematic> for SchematicDeserializer {
    fn deserialize(&self, r: &Record) -> CodecResult<Schematic> {
        let id = record::optional_str(r, ID_FIELD)?;
        let initial_position = coordinate::read_coordinate(r, INITIAL_POSITION_FIELD)?;
        let entries = record::require_array(r, MODIFICATIONS_FIELD)?;

        let mut schematic = Schematic::new(initial_position);
        schematic.set_id(id.map(str::to_owned));
        for (index, entry) in entries.iter().enumerate() {
            match self.read_entry(index, entry) {
                Ok(modification) => schematic.push(modification),
                Err(e) if self.policy == RecordPolicy::SkipInvalid && e.is_record_error() => {
                    warn!(
                        "schematic {}: skipping modification {index}: {e}",
                        id.unwrap_or("<unnamed>")
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(schematic)
    }

    fn is_valid(&self, r: &Record) -> bool {
        coordinate::has_xyz_object(r, INITIAL_POSITION_FIELD)
            && record::optional_str(r, ID_FIELD).is_ok()
            && r
                .get(MODIFICATIONS_FIELD)
                .and_then(Value::as_array)
                .is_some_and(|entries| entries.iter().all(|entry| self.accepts_entry(entry)))
    }
}

impl Identified for Schematic {
    const ARTIFACT: &'static str = "schematic";

    fn id(&self) -> Option<&str> {
        Schematic::id(self)
    }
}

/// Blueprint for schematics whose modification kinds live in `registry`.
pub fn schematic_blueprint(registry: Arc<ModificationRegistry>) -> Blueprint<Schematic> {
    schematic_blueprint_with_policy(registry, RecordPolicy::Strict)
}

/// [`schematic_blueprint`] with an explicit [`RecordPolicy`].
pub fn schematic_blueprint_with_policy(
    registry: Arc<ModificationRegistry>,
    policy: RecordPolicy,
) -> Blueprint<Schematic> {
    Blueprint::new(
        SchematicSerializer::new(registry.clone()),
        SchematicDeserializer::new(registry).with_policy(policy),
    )
}
