//! Serialization for schematics and anything else built from registered kinds.
//!
//! A [`Blueprint`] pairs a [`Serializer`] and a [`Deserializer`] for one type.
//! A [`BlueprintRegistry`] collects blueprints for a capability (for example
//! every known [`sch_core::Modification`] kind) and picks the right one for a
//! JSON [`Record`]: by its `type` tag first, then by probing each blueprint in
//! registration order. A [`Store`] persists identified artifacts as one JSON
//! file per id.

/// Serializer, deserializer and blueprint contracts.
pub mod blueprint;
/// Coordinate and vector records.
pub mod coordinate;
/// Error types for the codec crate.
pub mod error;
/// Modification registries and relative-modification records.
pub mod modification;
/// JSON record helpers.
pub mod record;
/// Tag-first, probe-fallback blueprint registry.
pub mod registry;
/// Schematic records.
pub mod schematic;
/// Directory-backed artifact storage.
pub mod store;

/// Re-exports of the blueprint contracts.
pub use blueprint::{Blueprint, Deserializer, Serializer};
/// Re-exports of the coordinate and vector blueprints.
pub use coordinate::{CoordinateCodec, VectorCodec, coordinate_blueprint, vector_blueprint};
/// Re-exports of [`error::CodecError`] and [`error::CodecResult`].
pub use error::{CodecError, CodecResult};
/// Re-exports of the modification registry helpers.
pub use modification::{
    ModificationBlueprint, ModificationRegistry, RelativeModificationDeserializer,
    RelativeModificationSerializer, modification_blueprint, relative_modification_blueprint,
};
/// Re-export of [`record::Record`].
pub use record::Record;
/// Re-exports of [`registry::BlueprintRegistry`] and [`registry::Tagged`].
pub use registry::{BlueprintRegistry, Tagged};
/// Re-exports of the schematic record types.
pub use schematic::{
    RecordPolicy, SchematicDeserializer, SchematicSerializer, schematic_blueprint,
    schematic_blueprint_with_policy,
};
/// Re-exports of the store types.
pub use store::{
    Identified, LoadReport, SaveOutcome, SaveReport, SkippedFile, Store, StoreConfig, validate_id,
};
