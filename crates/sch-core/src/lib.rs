//! Core model for schematics.
//!
//! A [`Schematic`] is an ordered set of spatial [`Modification`]s, each
//! stored relative to an anchor so the whole set can be replayed at any
//! position. This crate holds the geometry value types, the modification
//! capability and the composition rules; serialization lives in `sch-codec`
//! and hosts (worlds that actually change) implement [`Modification`].

/// Error types for the core crate.
pub mod error;
/// The modification capability and its relative wrapper.
pub mod modification;
/// Points and offsets in 3-dimensional space.
pub mod position;
/// Schematics: anchored, ordered collections of relative modifications.
pub mod schematic;
/// Axis-aligned shapes built from coordinates.
pub mod shape;

/// Re-exports of the error types and their result aliases.
pub use error::{CoreError, CoreResult, ModificationError, ModificationResult};
/// Re-exports of the modification types.
pub use modification::{Modification, RelativeModification, SharedModification};
/// Re-exports of [`position::Coordinate`] and [`position::Vector`].
pub use position::{Coordinate, Vector};
/// Re-exports of [`schematic::ApplyReport`] and [`schematic::Schematic`].
pub use schematic::{ApplyReport, Schematic};
/// Re-exports of [`shape::Axis`], [`shape::Cuboid`] and their sampling limits.
pub use shape::{Axis, Cuboid, MAX_AXIS_SAMPLES, MAX_CUBOID_SAMPLES};
