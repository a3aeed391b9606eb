use std::any::Any;
use std::fmt;
use std::sync::Arc;

use log::debug;
use sch_core::Schematic;

use crate::error::AnimationResult;
use crate::timing::Timing;

/// One timed step of an animation.
///
/// A transition waits `milliseconds_before`, runs its effect once, then
/// stays current for `milliseconds_after` before the animation moves on.
pub trait Transition: fmt::Debug + Send + Sync + 'static {
    /// Discriminant used to pick a blueprint when serializing.
    fn kind(&self) -> &str;

    /// The transition's durations.
    fn timing(&self) -> Timing;

    /// Perform the effect.
    fn run(&self) -> AnimationResult<()>;

    /// Support downcasting to the concrete transition type.
    fn as_any(&self) -> &dyn Any;

    /// Delay before [`Transition::run`] is invoked.
    fn milliseconds_before(&self) -> u64 {
        self.timing().before_ms()
    }

    /// Time spent current after [`Transition::run`].
    fn milliseconds_after(&self) -> u64 {
        self.timing().after_ms()
    }

    /// Total time the transition stays current.
    fn run_time(&self) -> u64 {
        self.timing().run_time_ms()
    }
}

/// A transition handle that can be shared between animations.
pub type SharedTransition = Arc<dyn Transition>;

/// A transition with no effect, used as a pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmptyTransition {
    timing: Timing,
}

impl EmptyTransition {
    /// Kind tag of empty transitions.
    pub const KIND: &'static str = "empty";

    /// A pause with the given durations.
    pub fn new(timing: Timing) -> Self {
        Self { timing }
    }
}

impl Transition for EmptyTransition {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn timing(&self) -> Timing {
        self.timing
    }

    fn run(&self) -> AnimationResult<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A transition that applies a schematic when it runs.
#[derive(Debug, Clone)]
pub struct SchematicTransition {
    schematic: Schematic,
    timing: Timing,
}

impl SchematicTransition {
    /// Kind tag of schematic transitions.
    pub const KIND: &'static str = "schematic";

    /// Apply `schematic` at its own initial position when run.
    pub fn new(schematic: Schematic, timing: Timing) -> Self {
        Self { schematic, timing }
    }

    /// The schematic applied by this transition.
    pub fn schematic(&self) -> &Schematic {
        &self.schematic
    }
}

impl Transition for SchematicTransition {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn timing(&self) -> Timing {
        self.timing
    }

    fn run(&self) -> AnimationResult<()> {
        let report = self.schematic.apply()?;
        debug!(
            "schematic transition {}: {} applied, {} skipped",
            self.schematic.id().unwrap_or("<unnamed>"),
            report.applied,
            report.skipped
        );
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use sch_core::{Coordinate, Modification, ModificationResult, Vector};

    use super::*;

    #[derive(Debug, Default)]
    struct Counter {
        hits: Mutex<usize>,
    }

    impl Modification for Counter {
        fn kind(&self) -> &str {
            "counter"
        }

        fn is_available(&self, _: Coordinate) -> bool {
            true
        }

        fn apply(&self, _: Coordinate) -> ModificationResult<()> {
            *self.hits.lock().unwrap() += 1;
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn default_durations_come_from_timing() {
        let transition = EmptyTransition::new(Timing::from_millis(30, 70));
        assert_eq!(transition.milliseconds_before(), 30);
        assert_eq!(transition.milliseconds_after(), 70);
        assert_eq!(transition.run_time(), 100);
        assert_eq!(transition.kind(), "empty");
        assert!(transition.run().is_ok());
    }

    #[test]
    fn schematic_transition_applies_schematic() {
        let counter = Arc::new(Counter::default());
        let mut schematic = Schematic::new(Coordinate::ORIGIN);
        schematic.add_modification(counter.clone(), Vector::new(1.0, 0.0, 0.0));
        schematic.add_modification(counter.clone(), Vector::new(2.0, 0.0, 0.0));

        let transition = SchematicTransition::new(schematic, Timing::INSTANT);
        transition.run().unwrap();
        assert_eq!(*counter.hits.lock().unwrap(), 2);
        assert_eq!(transition.kind(), "schematic");
    }

    #[test]
    fn shared_transition_downcasts() {
        let shared: SharedTransition = Arc::new(EmptyTransition::default());
        assert!(shared.as_any().downcast_ref::<EmptyTransition>().is_some());
    }
}
