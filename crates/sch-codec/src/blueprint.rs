use std::any::type_name;
use std::sync::Arc;

use crate::error::{CodecError, CodecResult};
use crate::record::Record;
use crate::registry::Tagged;

/// Converts a `T` into its stored form `V`.
pub trait Serializer<T: ?Sized, V = Record>: Send + Sync {
    /// Produce the stored form of `value`.
    fn serialize(&self, value: &T) -> CodecResult<V>;
}

/// Rebuilds a `T` from its stored form `V`.
///
/// [`Deserializer::is_valid`] is a cheap structural probe. When it returns
/// `true`, `deserialize` does not fail for structural reasons, though it
/// may still reject semantically invalid values such as an unknown
/// material name.
pub trait Deserializer<T, V = Record>: Send + Sync {
    /// Rebuild a value from `record`.
    fn deserialize(&self, record: &V) -> CodecResult<T>;

    /// Whether `record` has the shape this deserializer reads.
    fn is_valid(&self, record: &V) -> bool;

    /// The type tag this deserializer handles, if it has one.
    fn kind(&self) -> Option<&str> {
        None
    }
}

/// A serializer and deserializer for the same `(T, V)` pair.
pub struct Blueprint<T, V = Record> {
    serializer: Arc<dyn Serializer<T, V>>,
    deserializer: Arc<dyn Deserializer<T, V>>,
}

impl<T, V> Clone for Blueprint<T, V> {
    fn clone(&self) -> Self {
        Self {
            serializer: Arc::clone(&self.serializer),
            deserializer: Arc::clone(&self.deserializer),
        }
    }
}

impl<T, V> std::fmt::Debug for Blueprint<T, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blueprint")
            .field("type", &type_name::<T>())
            .field("kind", &self.deserializer.kind())
            .finish()
    }
}

impl<T: 'static, V: 'static> Blueprint<T, V> {
    /// Pair a serializer and a deserializer.
    pub fn new(
        serializer: impl Serializer<T, V> + 'static,
        deserializer: impl Deserializer<T, V> + 'static,
    ) -> Self {
        Self {
            serializer: Arc::new(serializer),
            deserializer: Arc::new(deserializer),
        }
    }

    /// Use one value for both directions.
    pub fn from_codec<C>(codec: C) -> Self
    where
        C: Serializer<T, V> + Deserializer<T, V> + 'static,
    {
        let codec = Arc::new(codec);
        Self {
            serializer: codec.clone(),
            deserializer: codec,
        }
    }

    /// The serializing half.
    pub fn serializer(&self) -> &dyn Serializer<T, V> {
        self.serializer.as_ref()
    }

    /// The deserializing half.
    pub fn deserializer(&self) -> &dyn Deserializer<T, V> {
        self.deserializer.as_ref()
    }

    /// Shorthand for `self.serializer().serialize(value)`.
    pub fn serialize(&self, value: &T) -> CodecResult<V> {
        self.serializer.serialize(value)
    }

    /// Shorthand for `self.deserializer().deserialize(record)`.
    pub fn deserialize(&self, record: &V) -> CodecResult<T> {
        self.deserializer.deserialize(record)
    }

    /// Shorthand for `self.deserializer().is_valid(record)`.
    pub fn is_valid(&self, record: &V) -> bool {
        self.deserializer.is_valid(record)
    }

    /// The type tag the deserializer handles.
    pub fn kind(&self) -> Option<&str> {
        self.deserializer.kind()
    }

    /// Lift a blueprint for a concrete type into one for shared trait objects.
    ///
    /// `share` wraps a freshly deserialized value. Serializing a trait object
    /// whose concrete type is not `T` fails with
    /// [`CodecError::Unserializable`].
    pub fn erase<D>(self, share: fn(T) -> Arc<D>) -> Blueprint<Arc<D>, V>
    where
        D: ?Sized + Tagged + 'static,
    {
        Blueprint {
            serializer: Arc::new(ErasedSerializer {
                inner: self.serializer,
            }),
            deserializer: Arc::new(ErasedDeserializer {
                inner: self.deserializer,
                share,
            }),
        }
    }
}

struct ErasedSerializer<T, V> {
    inner: Arc<dyn Serializer<T, V>>,
}

impl<D, T, V> Serializer<Arc<D>, V> for ErasedSerializer<T, V>
where
    D: ?Sized + Tagged,
    T: 'static,
{
    fn serialize(&self, value: &Arc<D>) -> CodecResult<V> {
        let tagged: &D = value;
        let concrete = tagged
            .concrete()
            .downcast_ref::<T>()
            .ok_or_else(|| CodecError::Unserializable {
                kind: tagged.tag().to_string(),
                reason: format!("blueprint expects {}", type_name::<T>()),
            })?;
        self.inner.serialize(concrete)
    }
}

struct ErasedDeserializer<T, D: ?Sized, V> {
    inner: Arc<dyn Deserializer<T, V>>,
    share: fn(T) -> Arc<D>,
}

impl<D, T, V> Deserializer<Arc<D>, V> for ErasedDeserializer<T, D, V>
where
    D: ?Sized,
{
    fn deserialize(&self, record: &V) -> CodecResult<Arc<D>> {
        self.inner.deserialize(record).map(self.share)
    }

    fn is_valid(&self, record: &V) -> bool {
        self.inner.is_valid(record)
    }

    fn kind(&self) -> Option<&str> {
        self.inner.kind()
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use serde_json::{Value, json};

    use super::*;
    use crate::record::{self, into_record};

    #[derive(Debug, PartialEq)]
    struct Label(String);

    struct LabelCodec;

    impl Serializer<Label> for LabelCodec {
        fn serialize(&self, value: &Label) -> CodecResult<Record> {
            let mut r = record::typed("label");
            r.insert("text".into(), Value::String(value.0.clone()));
            Ok(r)
        }
    }

    impl Deserializer<Label> for LabelCodec {
        fn deserialize(&self, r: &Record) -> CodecResult<Label> {
            Ok(Label(record::require_str(r, "text")?.to_string()))
        }

        fn is_valid(&self, r: &Record) -> bool {
            record::has_str(r, "text")
        }

        fn kind(&self) -> Option<&str> {
            Some("label")
        }
    }

    trait Named: Send + Sync {
        fn name(&self) -> &str;
        fn as_any(&self) -> &dyn Any;
    }

    impl Named for Label {
        fn name(&self) -> &str {
            "label"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct Other;

    impl Named for Other {
        fn name(&self) -> &str {
            "other"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    impl Tagged for dyn Named {
        fn tag(&self) -> &str {
            self.name()
        }

        fn concrete(&self) -> &dyn Any {
            self.as_any()
        }
    }

    fn share(label: Label) -> Arc<dyn Named> {
        Arc::new(label)
    }

    #[test]
    fn blueprint_round_trips() {
        let blueprint = Blueprint::<Label>::from_codec(LabelCodec);
        let stored = blueprint.serialize(&Label("hi".into())).unwrap();
        assert_eq!(Value::Object(stored.clone()), json!({ "type": "label", "text": "hi" }));
        assert_eq!(blueprint.deserialize(&stored).unwrap(), Label("hi".into()));
        assert_eq!(blueprint.kind(), Some("label"));
    }

    #[test]
    fn is_valid_probes_shape() {
        let blueprint = Blueprint::<Label>::from_codec(LabelCodec);
        assert!(blueprint.is_valid(&into_record(json!({ "text": "x" })).unwrap()));
        assert!(!blueprint.is_valid(&into_record(json!({ "text": 1 })).unwrap()));
    }

    #[test]
    fn erased_blueprint_serializes_matching_concrete_type() {
        let erased = Blueprint::<Label>::from_codec(LabelCodec).erase(share);
        let value: Arc<dyn Named> = Arc::new(Label("a".into()));
        let stored = erased.serialize(&value).unwrap();
        let back = erased.deserialize(&stored).unwrap();
        assert_eq!(back.name(), "label");
        assert_eq!(back.as_any().downcast_ref::<Label>(), Some(&Label("a".into())));
        assert_eq!(erased.kind(), Some("label"));
    }

    #[test]
    fn erased_blueprint_rejects_other_concrete_type() {
        let erased = Blueprint::<Label>::from_codec(LabelCodec).erase(share);
        let value: Arc<dyn Named> = Arc::new(Other);
        let err = erased.serialize(&value).unwrap_err();
        assert!(matches!(err, CodecError::Unserializable { ref kind, .. } if kind == "other"));
    }

    #[test]
    fn blueprint_debug_names_kind() {
        let blueprint = Blueprint::<Label>::from_codec(LabelCodec);
        let text = format!("{blueprint:?}");
        assert!(text.contains("label"));
    }
}
