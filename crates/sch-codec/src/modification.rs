use std::any::Any;
use std::sync::Arc;

use sch_core::{Modification, RelativeModification, SharedModification};
use serde_json::Value;

use crate::blueprint::{Blueprint, Deserializer, Serializer};
use crate::coordinate::{self, VectorCodec};
use crate::error::{CodecError, CodecResult};
use crate::record::{self, Record};
use crate::registry::{BlueprintRegistry, Tagged};

/// Field holding a relative modification's offset.
pub const VECTOR_FIELD: &str = "vector";
/// Field holding the wrapped modification record.
pub const ACTUAL_MODIFICATION_FIELD: &str = "actual-modification";

/// Registry of every known modification kind.
pub type ModificationRegistry = BlueprintRegistry<dyn Modification>;

/// Blueprint for shared modification handles.
pub type ModificationBlueprint = Blueprint<SharedModification>;

impl Tagged for dyn Modification {
    fn tag(&self) -> &str {
        self.kind()
    }

    fn concrete(&self) -> &dyn Any {
        self.as_any()
    }
}

fn share<M: Modification>(modification: M) -> SharedModification {
    Arc::new(modification)
}

/// Lift a blueprint for one concrete modification into a registrable one.
pub fn modification_blueprint<M: Modification>(blueprint: Blueprint<M>) -> ModificationBlueprint {
    blueprint.erase(share::<M>)
}

/// Whether `r` is itself a relative modification record.
fn is_relative_record(r: &Record) -> bool {
    r.contains_key(ACTUAL_MODIFICATION_FIELD)
        || record::kind_of(r) == Some(RelativeModification::<SharedModification>::KIND)
}

/// Writes `{ "vector", "actual-modification" }` records.
#[derive(Debug, Clone)]
pub struct RelativeModificationSerializer {
    registry: Arc<ModificationRegistry>,
}

impl RelativeModificationSerializer {
    /// Serialize wrapped modifications through `registry`.
    pub fn new(registry: Arc<ModificationRegistry>) -> Self {
        Self { registry }
    }
}

impl Serializer<RelativeModification> for RelativeModificationSerializer {
    fn serialize(&self, value: &RelativeModification) -> CodecResult<Record> {
        let mut out = Record::new();
        out.insert(
            VECTOR_FIELD.into(),
            Value::Object(VectorCodec.serialize(&value.vector())?),
        );
        out.insert(
            ACTUAL_MODIFICATION_FIELD.into(),
            Value::Object(self.registry.serialize(value.modification())?),
        );
        Ok(out)
    }
}

/// Reads `{ "vector", "actual-modification" }` records.
///
/// The wrapped record is resolved through the registry. A wrapped record
/// that is itself a relative modification fails with
/// [`CodecError::InvalidComposition`].
#[derive(Debug, Clone)]
pub struct RelativeModificationDeserializer {
    registry: Arc<ModificationRegistry>,
}

impl RelativeModificationDeserializer {
    /// Resolve wrapped modifications through `registry`.
    pub fn new(registry: Arc<ModificationRegistry>) -> Self {
        Self { registry }
    }
}

impl Deserializer<RelativeModification> for RelativeModificationDeserializer {
    fn deserialize(&self, r: &Record) -> CodecResult<RelativeModification> {
        let inner = record::require_object(r, ACTUAL_MODIFICATION_FIELD)?;
        if is_relative_record(inner) {
            return Err(CodecError::InvalidComposition(
                "a relative modification cannot wrap another relative modification".into(),
            ));
        }
        let vector = coordinate::read_vector(r, VECTOR_FIELD)?;
        let modification = self.registry.deserialize(inner)?;
        Ok(RelativeModification::new(modification, vector))
    }

    fn is_valid(&self, r: &Record) -> bool {
        if !coordinate::has_xyz_object(r, VECTOR_FIELD) {
            return false;
        }
        match r.get(ACTUAL_MODIFICATION_FIELD).and_then(Value::as_object) {
            Some(inner) => !is_relative_record(inner) && self.registry.accepts(inner),
            None => false,
        }
    }

    fn kind(&self) -> Option<&str> {
        Some(RelativeModification::<SharedModification>::KIND)
    }
}

/// Blueprint for relative modifications whose wrapped kinds live in `registry`.
pub fn relative_modification_blueprint(
    registry: Arc<ModificationRegistry>,
) -> Blueprint<RelativeModification> {
    Blueprint::new(
        RelativeModificationSerializer::new(registry.clone()),
        RelativeModificationDeserializer::new(registry),
    )
}
