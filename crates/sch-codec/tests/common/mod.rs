#![allow(dead_code)]

use std::any::Any;
use std::sync::{Arc, Mutex};

use sch_codec::record::{self, Record};
use sch_codec::{
    Blueprint, CodecResult, Deserializer, ModificationRegistry, Serializer, modification_blueprint,
};
use sch_core::{Coordinate, Modification, ModificationResult};
use serde_json::Value;

/// Records every coordinate it is applied at.
#[derive(Debug, Default)]
pub struct Marker {
    pub label: String,
    pub hits: Mutex<Vec<Coordinate>>,
}

impl Marker {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.into(),
            hits: Mutex::default(),
        }
    }
}

impl Modification for Marker {
    fn kind(&self) -> &str {
        "marker"
    }

    fn is_available(&self, _: Coordinate) -> bool {
        true
    }

    fn apply(&self, at: Coordinate) -> ModificationResult<()> {
        self.hits.lock().unwrap().push(at);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct MarkerCodec;

impl Serializer<Marker> for MarkerCodec {
    fn serialize(&self, value: &Marker) -> CodecResult<Record> {
        let mut r = record::typed("marker");
        r.insert("label".into(), Value::String(value.label.clone()));
        Ok(r)
    }
}

impl Deserializer<Marker> for MarkerCodec {
    fn deserialize(&self, r: &Record) -> CodecResult<Marker> {
        Ok(Marker::new(record::require_str(r, "label")?))
    }

    fn is_valid(&self, r: &Record) -> bool {
        record::has_str(r, "label")
    }

    fn kind(&self) -> Option<&str> {
        Some("marker")
    }
}

pub fn registry() -> Arc<ModificationRegistry> {
    Arc::new(
        ModificationRegistry::new("modification")
            .with(modification_blueprint(Blueprint::<Marker>::from_codec(MarkerCodec))),
    )
}

pub fn label_of(modification: &dyn Modification) -> String {
    modification
        .as_any()
        .downcast_ref::<Marker>()
        .map(|m| m.label.clone())
        .unwrap_or_default()
}
