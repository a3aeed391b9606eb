use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::ModificationResult;
use crate::position::{Coordinate, Vector};

/// A named spatial effect that can be checked and applied at a coordinate.
///
/// `is_available` and `apply` form a check-then-act protocol: `apply` must
/// not fail when `is_available` returned `true` for the same coordinate
/// immediately before. Calling `apply` without checking is allowed; the
/// host decides what happens then.
pub trait Modification: fmt::Debug + Send + Sync + 'static {
    /// Discriminant used to pick a blueprint when serializing.
    fn kind(&self) -> &str;

    /// Whether applying at `at` would change anything.
    fn is_available(&self, at: Coordinate) -> bool;

    /// Perform the effect at `at`.
    fn apply(&self, at: Coordinate) -> ModificationResult<()>;

    /// Support downcasting to the concrete modification type.
    fn as_any(&self) -> &dyn Any;
}

/// A modification handle that can be shared between schematics.
pub type SharedModification = Arc<dyn Modification>;

impl<M: Modification + ?Sized> Modification for Arc<M> {
    fn kind(&self) -> &str {
        (**self).kind()
    }

    fn is_available(&self, at: Coordinate) -> bool {
        (**self).is_available(at)
    }

    fn apply(&self, at: Coordinate) -> ModificationResult<()> {
        (**self).apply(at)
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }
}

impl<M: Modification + ?Sized> Modification for Box<M> {
    fn kind(&self) -> &str {
        (**self).kind()
    }

    fn is_available(&self, at: Coordinate) -> bool {
        (**self).is_available(at)
    }

    fn apply(&self, at: Coordinate) -> ModificationResult<()> {
        (**self).apply(at)
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }
}

/// A modification placed at an offset from some anchor.
///
/// `RelativeModification` does not implement [`Modification`], so one can
/// never wrap another:
///
/// ```compile_fail
/// use std::any::Any;
/// use sch_core::{Coordinate, Modification, ModificationResult, RelativeModification, Vector};
///
/// #[derive(Debug)]
/// struct Marker;
///
/// impl Modification for Marker {
///     fn kind(&self) -> &str { "marker" }
///     fn is_available(&self, _: Coordinate) -> bool { true }
///     fn apply(&self, _: Coordinate) -> ModificationResult<()> { Ok(()) }
///     fn as_any(&self) -> &dyn Any { self }
/// }
///
/// let inner = RelativeModification::new(Marker, Vector::ZERO);
/// let _nested = RelativeModification::new(inner, Vector::new(1.0, 0.0, 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct RelativeModification<M: Modification = SharedModification> {
    modification: M,
    vector: Vector,
}

impl<M: Modification> RelativeModification<M> {
    /// Discriminant written for relative modifications in untagged contexts.
    pub const KIND: &'static str = "relative-modification";

    /// Place `modification` at `vector` from the anchor.
    pub fn new(modification: M, vector: Vector) -> Self {
        Self {
            modification,
            vector,
        }
    }

    /// The wrapped modification.
    pub fn modification(&self) -> &M {
        &self.modification
    }

    /// The offset from the anchor.
    pub fn vector(&self) -> Vector {
        self.vector
    }

    /// Where the modification lands for a given anchor.
    pub fn relative_coordinate(&self, anchor: Coordinate) -> Coordinate {
        anchor.apply_vector(self.vector)
    }

    /// Check availability at the coordinate resolved from `anchor`.
    pub fn is_available(&self, anchor: Coordinate) -> bool {
        self.modification.is_available(self.relative_coordinate(anchor))
    }

    /// Apply at the coordinate resolved from `anchor`.
    pub fn apply(&self, anchor: Coordinate) -> ModificationResult<()> {
        self.modification.apply(self.relative_coordinate(anchor))
    }

    /// A copy moved by an additional `offset`.
    pub fn shifted(&self, offset: Vector) -> Self
    where
        M: Clone,
    {
        Self::new(self.modification.clone(), self.vector.add(offset))
    }

    /// Erase the concrete modification type.
    pub fn into_shared(self) -> RelativeModification<SharedModification> {
        RelativeModification::new(Arc::new(self.modification), self.vector)
    }
}
