use log::{debug, error};

use crate::error::{CoreError, CoreResult};
use crate::modification::{RelativeModification, SharedModification};
use crate::position::{Coordinate, Vector};
use crate::shape::Cuboid;

/// Counts produced by [`Schematic::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplyReport {
    /// Modifications that were available and applied.
    pub applied: usize,
    /// Modifications skipped because they were not available.
    pub skipped: usize,
}

impl ApplyReport {
    /// Total number of modifications visited.
    pub fn total(&self) -> usize {
        self.applied + self.skipped
    }
}

/// An anchored, ordered collection of relative modifications.
///
/// The id is the storage key and only matters when persisting.
#[derive(Debug, Clone, Default)]
pub struct Schematic {
    id: Option<String>,
    initial_position: Coordinate,
    modifications: Vec<RelativeModification>,
}

impl Schematic {
    /// Create an unnamed, empty schematic anchored at `initial_position`.
    pub fn new(initial_position: Coordinate) -> Self {
        Self {
            id: None,
            initial_position,
            modifications: Vec::new(),
        }
    }

    /// Create an empty schematic with a storage id.
    pub fn with_id(id: impl Into<String>, initial_position: Coordinate) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::new(initial_position)
        }
    }

    /// Builder form of [`Schematic::push`] for several modifications.
    pub fn with_modifications(
        mut self,
        modifications: impl IntoIterator<Item = RelativeModification>,
    ) -> Self {
        self.modifications.extend(modifications);
        self
    }

    /// The storage id, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Replace the storage id.
    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    /// The anchor every modification is resolved against.
    pub fn initial_position(&self) -> Coordinate {
        self.initial_position
    }

    /// Move the anchor.
    pub fn set_initial_position(&mut self, at: Coordinate) {
        self.initial_position = at;
    }

    /// The modifications in application order.
    pub fn modifications(&self) -> &[RelativeModification] {
        &self.modifications
    }

    /// Number of modifications.
    pub fn len(&self) -> usize {
        self.modifications.len()
    }

    /// Whether the schematic has no modifications.
    pub fn is_empty(&self) -> bool {
        self.modifications.is_empty()
    }

    /// Append a relative modification.
    pub fn push(&mut self, modification: RelativeModification) {
        self.modifications.push(modification);
    }

    /// Append `modification` at `vector` from the anchor.
    pub fn add_modification(&mut self, modification: SharedModification, vector: Vector) {
        self.push(RelativeModification::new(modification, vector));
    }

    /// Append `modification` at the anchor itself.
    pub fn add_absolute_modification(&mut self, modification: SharedModification) {
        self.add_modification(modification, Vector::ZERO);
    }

    /// Append `modification` at every sampled point of `region`.
    ///
    /// Offsets are computed from the current anchor, so the region is where
    /// the modifications land when the schematic is applied unmoved.
    /// Returns how many modifications were added.
    pub fn fill(
        &mut self,
        region: &Cuboid,
        step: f64,
        modification: SharedModification,
    ) -> CoreResult<usize> {
        let points = region.inner_coordinates(step)?;
        let count = points.len();
        for point in points {
            let vector = self.initial_position.vector_to(point);
            self.add_modification(modification.clone(), vector);
        }
        Ok(count)
    }

    /// Remove and return the modification at `index`.
    pub fn remove_modification(&mut self, index: usize) -> Option<RelativeModification> {
        if index < self.modifications.len() {
            Some(self.modifications.remove(index))
        } else {
            None
        }
    }

    /// Keep only the modifications matching `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&RelativeModification) -> bool) {
        self.modifications.retain(keep);
    }

    /// A copy whose anchor is moved by `vector`.
    pub fn translated(&self, vector: Vector) -> Self {
        Self {
            initial_position: self.initial_position.apply_vector(vector),
            ..self.clone()
        }
    }

    /// Apply every available modification relative to the initial position.
    pub fn apply(&self) -> CoreResult<ApplyReport> {
        self.apply_at(self.initial_position)
    }

    /// Apply every available modification relative to `anchor`, in order.
    ///
    /// Unavailable modifications are skipped. A modification that fails
    /// after reporting itself available stops the run; earlier effects are
    /// not rolled back.
    pub fn apply_at(&self, anchor: Coordinate) -> CoreResult<ApplyReport> {
        let mut report = ApplyReport::default();
        for (index, relative) in self.modifications.iter().enumerate() {
            if !relative.is_available(anchor) {
                report.skipped += 1;
                continue;
            }
            if let Err(source) = relative.apply(anchor) {
                error!(
                    "schematic {}: {} modification at {} failed after reporting available: {source}",
                    self.id.as_deref().unwrap_or("<unnamed>"),
                    relative.modification().kind(),
                    relative.relative_coordinate(anchor),
                );
                return Err(CoreError::Apply { index, source });
            }
            report.applied += 1;
        }
        debug!(
            "schematic {} applied at {anchor}: {} applied, {} skipped",
            self.id.as_deref().unwrap_or("<unnamed>"),
            report.applied,
            report.skipped
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::{ModificationError, ModificationResult};
    use crate::modification::Modification;

    /// Available only where nothing was applied yet.
    #[derive(Debug, Default)]
    struct Once {
        applied: Mutex<Vec<Coordinate>>,
    }

    impl Modification for Once {
        fn kind(&self) -> &str {
            "once"
        }

        fn is_available(&self, at: Coordinate) -> bool {
            self.applied.lock().map(|a| !a.contains(&at)).unwrap_or(false)
        }

        fn apply(&self, at: Coordinate) -> ModificationResult<()> {
            if let Ok(mut applied) = self.applied.lock() {
                applied.push(at);
            }
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    /// Claims to be available but always fails.
    #[derive(Debug)]
    struct Liar;

    impl Modification for Liar {
        fn kind(&self) -> &str {
            "liar"
        }

        fn is_available(&self, _: Coordinate) -> bool {
            true
        }

        fn apply(&self, at: Coordinate) -> ModificationResult<()> {
            Err(ModificationError::Failed {
                kind: "liar".into(),
                at,
                reason: "refused".into(),
            })
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    /// Available only at x == 1.
    #[derive(Debug)]
    struct OnlyAtX1;

    impl Modification for OnlyAtX1 {
        fn kind(&self) -> &str {
            "only-x1"
        }

        fn is_available(&self, at: Coordinate) -> bool {
            at.x == 1.0
        }

        fn apply(&self, _: Coordinate) -> ModificationResult<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn applied_at(once: &Arc<Once>) -> Vec<Coordinate> {
        once.applied.lock().unwrap().clone()
    }

    #[test]
    fn new_schematic_is_empty() {
        let schematic = Schematic::with_id("tower", Coordinate::new(1.0, 2.0, 3.0));
        assert_eq!(schematic.id(), Some("tower"));
        assert_eq!(schematic.initial_position(), Coordinate::new(1.0, 2.0, 3.0));
        assert!(schematic.is_empty());
        assert_eq!(schematic.apply().unwrap(), ApplyReport::default());
    }

    #[test]
    fn apply_resolves_offsets_against_anchor() {
        let once = Arc::new(Once::default());
        let mut schematic = Schematic::new(Coordinate::new(10.0, 0.0, 0.0));
        schematic.add_modification(once.clone(), Vector::new(1.0, 0.0, 0.0));
        schematic.add_absolute_modification(once.clone());

        let report = schematic.apply().unwrap();
        assert_eq!(report.applied, 2);
        assert_eq!(
            applied_at(&once),
            vec![Coordinate::new(11.0, 0.0, 0.0), Coordinate::new(10.0, 0.0, 0.0)]
        );
    }

    #[test]
    fn apply_is_idempotent_when_modifications_become_unavailable() {
        let once = Arc::new(Once::default());
        let mut schematic = Schematic::new(Coordinate::ORIGIN);
        schematic.add_modification(once.clone(), Vector::new(0.0, 1.0, 0.0));

        let first = schematic.apply().unwrap();
        let second = schematic.apply().unwrap();
        assert_eq!(first, ApplyReport { applied: 1, skipped: 0 });
        assert_eq!(second, ApplyReport { applied: 0, skipped: 1 });
        assert_eq!(applied_at(&once).len(), 1);
    }

    #[test]
    fn shared_instance_availability_depends_on_offset() {
        let shared: SharedModification = Arc::new(OnlyAtX1);
        let mut near = Schematic::new(Coordinate::ORIGIN);
        near.add_modification(shared.clone(), Vector::new(1.0, 0.0, 0.0));
        let mut far = Schematic::new(Coordinate::ORIGIN);
        far.add_modification(shared, Vector::new(5.0, 0.0, 0.0));

        assert_eq!(near.apply().unwrap().applied, 1);
        assert_eq!(far.apply().unwrap(), ApplyReport { applied: 0, skipped: 1 });
    }

    #[test]
    fn apply_stops_at_contract_violation() {
        let once = Arc::new(Once::default());
        let mut schematic = Schematic::new(Coordinate::ORIGIN);
        schematic.add_absolute_modification(once.clone());
        schematic.add_modification(Arc::new(Liar), Vector::new(1.0, 0.0, 0.0));
        schematic.add_modification(once.clone(), Vector::new(2.0, 0.0, 0.0));

        let err = schematic.apply().unwrap_err();
        match err {
            CoreError::Apply { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(applied_at(&once), vec![Coordinate::ORIGIN]);
    }

    #[test]
    fn apply_at_replays_elsewhere() {
        let once = Arc::new(Once::default());
        let mut schematic = Schematic::new(Coordinate::ORIGIN);
        schematic.add_modification(once.clone(), Vector::new(0.0, 0.0, 1.0));

        schematic.apply().unwrap();
        schematic.apply_at(Coordinate::new(100.0, 0.0, 0.0)).unwrap();
        assert_eq!(
            applied_at(&once),
            vec![Coordinate::new(0.0, 0.0, 1.0), Coordinate::new(100.0, 0.0, 1.0)]
        );
    }

    #[test]
    fn translated_moves_anchor_only() {
        let mut schematic = Schematic::with_id("a", Coordinate::ORIGIN);
        schematic.add_modification(Arc::new(OnlyAtX1), Vector::new(1.0, 0.0, 0.0));
        let moved = schematic.translated(Vector::new(0.0, 5.0, 0.0));
        assert_eq!(moved.initial_position(), Coordinate::new(0.0, 5.0, 0.0));
        assert_eq!(moved.len(), 1);
        assert_eq!(moved.modifications()[0].vector(), Vector::new(1.0, 0.0, 0.0));
        assert_eq!(schematic.initial_position(), Coordinate::ORIGIN);
    }

    #[test]
    fn remove_and_retain() {
        let mut schematic = Schematic::new(Coordinate::ORIGIN);
        schematic.add_modification(Arc::new(OnlyAtX1), Vector::new(1.0, 0.0, 0.0));
        schematic.add_modification(Arc::new(Liar), Vector::new(2.0, 0.0, 0.0));
        schematic.add_modification(Arc::new(OnlyAtX1), Vector::new(3.0, 0.0, 0.0));

        assert!(schematic.remove_modification(10).is_none());
        let removed = schematic.remove_modification(0).unwrap();
        assert_eq!(removed.vector(), Vector::new(1.0, 0.0, 0.0));

        schematic.retain(|m| m.modification().kind() != "liar");
        assert_eq!(schematic.len(), 1);
        assert_eq!(schematic.modifications()[0].vector(), Vector::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn fill_places_modification_at_every_point() {
        let once = Arc::new(Once::default());
        let mut schematic = Schematic::new(Coordinate::new(1.0, 1.0, 1.0));
        let region = Cuboid::new(Coordinate::new(1.0, 1.0, 1.0), Coordinate::new(2.0, 1.0, 2.0));
        let added = schematic.fill(&region, 1.0, once.clone()).unwrap();
        assert_eq!(added, 4);
        assert_eq!(schematic.modifications()[0].vector(), Vector::ZERO);

        schematic.apply().unwrap();
        let applied = applied_at(&once);
        assert_eq!(applied.len(), 4);
        assert!(applied.iter().all(|p| region.contains(*p)));
    }

    #[test]
    fn fill_rejects_bad_step() {
        let mut schematic = Schematic::new(Coordinate::ORIGIN);
        let region = Cuboid::new(Coordinate::ORIGIN, Coordinate::new(1.0, 1.0, 1.0));
        assert!(schematic.fill(&region, 0.0, Arc::new(OnlyAtX1)).is_err());
        assert!(schematic.is_empty());
    }
}
