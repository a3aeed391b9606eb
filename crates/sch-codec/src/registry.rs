use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::blueprint::Blueprint;
use crate::error::{CodecError, CodecResult};
use crate::record::{self, Record};

/// A capability trait object that reports its kind and concrete type.
///
/// Registries use this to pick a blueprint when serializing and to
/// downcast to the concrete type the blueprint was written for.
pub trait Tagged {
    /// The kind tag written to the record's `type` field.
    fn tag(&self) -> &str;

    /// The value as [`Any`], for downcasting.
    fn concrete(&self) -> &dyn Any;
}

/// Blueprints for every known kind of one capability.
///
/// Resolution is tag-first: a record whose `type` names a registered kind
/// goes straight to that blueprint. Untagged records, and records whose
/// tag nobody registered, are probed against every blueprint in
/// registration order and the first whose [`Blueprint::is_valid`] accepts
/// the record wins.
pub struct BlueprintRegistry<T: ?Sized + 'static> {
    capability: &'static str,
    entries: Vec<Blueprint<Arc<T>>>,
    by_kind: HashMap<String, usize>,
}

impl<T: ?Sized + Tagged + 'static> BlueprintRegistry<T> {
    /// Create an empty registry; `capability` names it in errors and logs.
    pub fn new(capability: &'static str) -> Self {
        Self {
            capability,
            entries: Vec::new(),
            by_kind: HashMap::new(),
        }
    }

    /// Builder form of [`BlueprintRegistry::register`].
    pub fn with(mut self, blueprint: Blueprint<Arc<T>>) -> Self {
        self.register(blueprint);
        self
    }

    /// The capability this registry serves.
    pub fn capability(&self) -> &str {
        self.capability
    }

    /// Add a blueprint.
    ///
    /// A blueprint for an already registered kind replaces the old one in
    /// place, keeping its probe position, and the old one is returned.
    pub fn register(&mut self, blueprint: Blueprint<Arc<T>>) -> Option<Blueprint<Arc<T>>> {
        let kind = blueprint.kind().map(str::to_owned);
        match kind {
            Some(kind) => {
                if let Some(&index) = self.by_kind.get(&kind) {
                    debug!("{} registry: replacing blueprint for {kind}", self.capability);
                    return Some(std::mem::replace(&mut self.entries[index], blueprint));
                }
                debug!("{} registry: registered {kind}", self.capability);
                self.by_kind.insert(kind, self.entries.len());
                self.entries.push(blueprint);
            }
            None => {
                debug!("{} registry: registered untagged blueprint", self.capability);
                self.entries.push(blueprint);
            }
        }
        None
    }

    /// Remove the blueprint registered for `kind`.
    pub fn unregister(&mut self, kind: &str) -> Option<Blueprint<Arc<T>>> {
        let index = self.by_kind.remove(kind)?;
        let removed = self.entries.remove(index);
        for slot in self.by_kind.values_mut() {
            if *slot > index {
                *slot -= 1;
            }
        }
        debug!("{} registry: unregistered {kind}", self.capability);
        Some(removed)
    }

    /// The blueprint registered for `kind`.
    pub fn get(&self, kind: &str) -> Option<&Blueprint<Arc<T>>> {
        self.by_kind.get(kind).map(|&index| &self.entries[index])
    }

    /// Whether a blueprint is registered for `kind`.
    pub fn contains(&self, kind: &str) -> bool {
        self.by_kind.contains_key(kind)
    }

    /// Registered kinds in probe order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(Blueprint::kind)
    }

    /// All blueprints in probe order.
    pub fn blueprints(&self) -> &[Blueprint<Arc<T>>] {
        &self.entries
    }

    /// Number of registered blueprints.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no blueprint is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pick the blueprint that should read `record`.
    pub fn resolve(&self, record: &Record) -> CodecResult<&Blueprint<Arc<T>>> {
        let kind = record::kind_of(record);
        if let Some(kind) = kind {
            if let Some(blueprint) = self.get(kind) {
                debug!("{} registry: {kind} resolved by tag", self.capability);
                return Ok(blueprint);
            }
        }

        match self.entries.iter().position(|b| b.is_valid(record)) {
            Some(index) => {
                debug!(
                    "{} registry: {} record resolved by probe to blueprint #{index} ({})",
                    self.capability,
                    kind.unwrap_or("untyped"),
                    self.entries[index].kind().unwrap_or("untagged"),
                );
                Ok(&self.entries[index])
            }
            None => {
                debug!(
                    "{} registry: no blueprint for {} record",
                    self.capability,
                    kind.unwrap_or("untyped")
                );
                Err(CodecError::NoMatchingBlueprint {
                    capability: self.capability.to_string(),
                    kind: kind.map(str::to_owned),
                })
            }
        }
    }

    /// Whether some blueprint would accept `record`.
    pub fn accepts(&self, record: &Record) -> bool {
        match self.resolve(record) {
            Ok(blueprint) => blueprint.is_valid(record),
            Err(_) => false,
        }
    }

    /// Resolve and deserialize `record`.
    pub fn deserialize(&self, record: &Record) -> CodecResult<Arc<T>> {
        self.resolve(record)?.deserialize(record)
    }

    /// Serialize `value` with the blueprint registered for its tag.
    pub fn serialize(&self, value: &Arc<T>) -> CodecResult<Record> {
        let tagged: &T = value;
        let kind = tagged.tag();
        let blueprint = self.get(kind).ok_or_else(|| CodecError::Unserializable {
            kind: kind.to_string(),
            reason: format!("no {} blueprint is registered for it", self.capability),
        })?;
        blueprint.serialize(value)
    }
}

impl<T: ?Sized + 'static> std::fmt::Debug for BlueprintRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlueprintRegistry")
            .field("capability", &self.capability)
            .field("entries", &self.entries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::blueprint::{Deserializer, Serializer};
    use crate::record::into_record;

    trait Shape: std::fmt::Debug + Send + Sync {
        fn name(&self) -> &str;
        fn as_any(&self) -> &dyn Any;
    }

    impl Tagged for dyn Shape {
        fn tag(&self) -> &str {
            self.name()
        }

        fn concrete(&self) -> &dyn Any {
            self.as_any()
        }
    }

    #[derive(Debug, PartialEq)]
    struct Circle {
        radius: f64,
    }

    #[derive(Debug, PartialEq)]
    struct Square {
        side: f64,
    }

    impl Shape for Circle {
        fn name(&self) -> &str {
            "circle"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    impl Shape for Square {
        fn name(&self) -> &str {
            "square"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    /// Reads `field` into a one-number shape.
    struct NumberCodec<S> {
        kind: &'static str,
        field: &'static str,
        build: fn(f64) -> S,
        read: fn(&S) -> f64,
    }

    impl<S: 'static> Serializer<S> for NumberCodec<S> {
        fn serialize(&self, value: &S) -> CodecResult<Record> {
            let mut r = record::typed(self.kind);
            r.insert(self.field.into(), json!((self.read)(value)));
            Ok(r)
        }
    }

    impl<S: 'static> Deserializer<S> for NumberCodec<S> {
        fn deserialize(&self, r: &Record) -> CodecResult<S> {
            Ok((self.build)(record::require_f64(r, self.field)?))
        }

        fn is_valid(&self, r: &Record) -> bool {
            record::has_number(r, self.field)
        }

        fn kind(&self) -> Option<&str> {
            Some(self.kind)
        }
    }

    fn circle_blueprint(field: &'static str) -> Blueprint<Arc<dyn Shape>> {
        Blueprint::<Circle>::from_codec(NumberCodec {
            kind: "circle",
            field,
            build: |radius| Circle { radius },
            read: |c: &Circle| c.radius,
        })
        .erase(|c| Arc::new(c) as Arc<dyn Shape>)
    }

    fn square_blueprint(field: &'static str) -> Blueprint<Arc<dyn Shape>> {
        Blueprint::<Square>::from_codec(NumberCodec {
            kind: "square",
            field,
            build: |side| Square { side },
            read: |s: &Square| s.side,
        })
        .erase(|s| Arc::new(s) as Arc<dyn Shape>)
    }

    fn rec(value: Value) -> Record {
        into_record(value).unwrap()
    }

    fn registry(blueprints: Vec<Blueprint<Arc<dyn Shape>>>) -> BlueprintRegistry<dyn Shape> {
        blueprints
            .into_iter()
            .fold(BlueprintRegistry::new("shape"), BlueprintRegistry::with)
    }

    #[test]
    fn tag_dispatches_exactly() {
        // Both probes accept "size"; the tag decides.
        let reg = registry(vec![circle_blueprint("size"), square_blueprint("size")]);
        let shape = reg.deserialize(&rec(json!({ "type": "square", "size": 2.0 }))).unwrap();
        assert_eq!(shape.name(), "square");
        let shape = reg.deserialize(&rec(json!({ "type": "circle", "size": 2.0 }))).unwrap();
        assert_eq!(shape.name(), "circle");
    }

    #[test]
    fn exclusive_probes_resolve_regardless_of_order() {
        let untyped_circle = rec(json!({ "radius": 1.0 }));
        let untyped_square = rec(json!({ "side": 3.0 }));
        for reg in [
            registry(vec![circle_blueprint("radius"), square_blueprint("side")]),
            registry(vec![square_blueprint("side"), circle_blueprint("radius")]),
        ] {
            assert_eq!(reg.deserialize(&untyped_circle).unwrap().name(), "circle");
            assert_eq!(reg.deserialize(&untyped_square).unwrap().name(), "square");
        }
    }

    #[test]
    fn overlapping_probes_resolve_to_first_registered() {
        let untyped = rec(json!({ "size": 1.0 }));
        let reg = registry(vec![circle_blueprint("size"), square_blueprint("size")]);
        assert_eq!(reg.deserialize(&untyped).unwrap().name(), "circle");
        let reg = registry(vec![square_blueprint("size"), circle_blueprint("size")]);
        assert_eq!(reg.deserialize(&untyped).unwrap().name(), "square");
    }

    #[test]
    fn unclaimed_tag_falls_back_to_probe() {
        let reg = registry(vec![circle_blueprint("radius")]);
        let shape = reg.deserialize(&rec(json!({ "type": "round", "radius": 4.0 }))).unwrap();
        let circle = shape.as_any().downcast_ref::<Circle>().unwrap();
        assert_eq!(circle, &Circle { radius: 4.0 });
    }

    #[test]
    fn no_match_is_reported() {
        let reg = registry(vec![circle_blueprint("radius")]);
        let err = reg.deserialize(&rec(json!({ "type": "hexagon" }))).unwrap_err();
        match err {
            CodecError::NoMatchingBlueprint { capability, kind } => {
                assert_eq!(capability, "shape");
                assert_eq!(kind.as_deref(), Some("hexagon"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!reg.accepts(&rec(json!({}))));
    }

    #[test]
    fn tagged_record_with_bad_fields_is_malformed() {
        let reg = registry(vec![circle_blueprint("radius")]);
        let record = rec(json!({ "type": "circle" }));
        assert!(!reg.accepts(&record));
        let err = reg.deserialize(&record).unwrap_err();
        assert!(matches!(err, CodecError::MalformedRecord { .. }));
    }

    #[test]
    fn register_replaces_in_place() {
        let mut reg = registry(vec![circle_blueprint("radius"), square_blueprint("side")]);
        let old = reg.register(circle_blueprint("r"));
        assert!(old.is_some());
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.kinds().collect::<Vec<_>>(), vec!["circle", "square"]);
        let shape = reg.deserialize(&rec(json!({ "type": "circle", "r": 1.0 }))).unwrap();
        assert_eq!(shape.name(), "circle");
    }

    #[test]
    fn unregister_reindexes() {
        let mut reg = registry(vec![circle_blueprint("radius"), square_blueprint("side")]);
        assert!(reg.unregister("circle").is_some());
        assert!(reg.unregister("circle").is_none());
        assert!(!reg.contains("circle"));
        assert_eq!(reg.get("square").and_then(Blueprint::kind), Some("square"));
        let shape = reg.deserialize(&rec(json!({ "type": "square", "side": 1.0 }))).unwrap();
        assert_eq!(shape.name(), "square");
    }

    #[test]
    fn serialize_uses_value_tag() {
        let reg = registry(vec![circle_blueprint("radius"), square_blueprint("side")]);
        let square: Arc<dyn Shape> = Arc::new(Square { side: 2.5 });
        let stored = reg.serialize(&square).unwrap();
        assert_eq!(Value::Object(stored), json!({ "type": "square", "side": 2.5 }));
    }

    #[test]
    fn serialize_unknown_kind_fails() {
        let reg = registry(vec![circle_blueprint("radius")]);
        let square: Arc<dyn Shape> = Arc::new(Square { side: 1.0 });
        let err = reg.serialize(&square).unwrap_err();
        assert!(matches!(err, CodecError::Unserializable { .. }));
    }

    #[test]
    fn registry_is_send_and_sync() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<BlueprintRegistry<dyn Shape>>();
    }
}
