use log::debug;

use crate::error::AnimationResult;
use crate::runtime::{AnimationRuntime, TickOutcome};
use crate::state::{AnimationState, StateFlags};
use crate::transition::SharedTransition;

/// The persisted part of an animation: an optional id and its transitions.
#[derive(Debug, Clone, Default)]
pub struct AnimationDefinition {
    id: Option<String>,
    transitions: Vec<SharedTransition>,
}

impl AnimationDefinition {
    /// Create a definition from transitions in playback order.
    pub fn new(id: Option<String>, transitions: Vec<SharedTransition>) -> Self {
        Self { id, transitions }
    }

    /// An empty definition with a storage id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self::new(Some(id.into()), Vec::new())
    }

    /// Builder form of [`AnimationDefinition::add_transition`].
    pub fn with_transition(mut self, transition: SharedTransition) -> Self {
        self.add_transition(transition);
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

    /// Transitions in playback order.
    pub fn transitions(&self) -> &[SharedTransition] {
        &self.transitions
    }

    /// Append a transition.
    pub fn add_transition(&mut self, transition: SharedTransition) {
        self.transitions.push(transition);
    }

    /// Remove and return the transition at `index`.
    pub fn remove_transition(&mut self, index: usize) -> Option<SharedTransition> {
        if index < self.transitions.len() {
            Some(self.transitions.remove(index))
        } else {
            None
        }
    }

    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Whether there are no transitions.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Sum of every transition's run time.
    pub fn total_time(&self) -> u64 {
        self.transitions
            .iter()
            .fold(0u64, |sum, t| sum.saturating_add(t.run_time()))
    }
}

/// A definition being played back.
///
/// A new animation has an empty cursor, so its state is
/// [`AnimationState::Finished`] until [`Animation::reset`] or
/// [`Animation::activate`] seeds it.
#[derive(Debug, Clone, Default)]
pub struct Animation {
    definition: AnimationDefinition,
    runtime: AnimationRuntime,
    activated: bool,
}

impl Animation {
    /// Wrap `definition` with an unseeded cursor.
    pub fn new(definition: AnimationDefinition) -> Self {
        Self {
            definition,
            runtime: AnimationRuntime::default(),
            activated: false,
        }
    }

    /// The storage id of the definition.
    pub fn id(&self) -> Option<&str> {
        self.definition.id()
    }

    /// The persisted definition.
    pub fn definition(&self) -> &AnimationDefinition {
        &self.definition
    }

    /// Mutable access to the definition. Changes apply from the next reset.
    pub fn definition_mut(&mut self) -> &mut AnimationDefinition {
        &mut self.definition
    }

    /// Drop the playback state and return the definition.
    pub fn into_definition(self) -> AnimationDefinition {
        self.definition
    }

    /// The playback cursor.
    pub fn runtime(&self) -> &AnimationRuntime {
        &self.runtime
    }

    /// Whether the animation is activated.
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Start playback.
    ///
    /// An animation that would be [`AnimationState::Finished`] once active
    /// is reset first, so activating a fresh or finished animation plays it
    /// from the start. A halted animation resumes where it stopped.
    pub fn activate(&mut self) {
        let pending = StateFlags {
            activated: true,
            ..self.flags()
        };
        if pending.state().is_finished() {
            self.reset();
        }
        self.activated = true;
        debug!("animation {} activated", self.id().unwrap_or("<unnamed>"));
    }

    /// Stop playback without discarding the cursor.
    pub fn deactivate(&mut self) {
        self.activated = false;
        debug!("animation {} deactivated", self.id().unwrap_or("<unnamed>"));
    }

    /// Re-seed the cursor from the definition. Does nothing when the
    /// definition has no transitions.
    pub fn reset(&mut self) {
        if self.definition.is_empty() {
            return;
        }
        self.runtime = AnimationRuntime::seeded(self.definition.transitions());
    }

    /// Advance playback by `elapsed_ms`.
    pub fn tick(&mut self, elapsed_ms: u64) -> AnimationResult<TickOutcome> {
        self.runtime.tick(elapsed_ms)
    }

    /// The flags the state is derived from.
    pub fn flags(&self) -> StateFlags {
        StateFlags {
            activated: self.activated,
            has_current: self.runtime.current().is_some(),
            fired: self.runtime.has_fired(),
            queue_empty: self.runtime.queue_is_empty(),
        }
    }

    /// The lifecycle state.
    pub fn state(&self) -> AnimationState {
        self.flags().state()
    }

    /// The current transition.
    pub fn current_transition(&self) -> Option<&SharedTransition> {
        self.runtime.current()
    }

    /// The transition that will become current next.
    pub fn peek_next_transition(&self) -> Option<&SharedTransition> {
        self.runtime.peek_next()
    }

    /// Sum of every transition's run time.
    pub fn total_time(&self) -> u64 {
        self.definition.total_time()
    }

    /// Run time of the transitions still queued.
    pub fn remaining_time(&self) -> u64 {
        self.runtime.queued_time_ms()
    }

    /// Time left before the current transition completes.
    pub fn time_to_next_transition(&self) -> Option<u64> {
        self.runtime.time_to_next_ms()
    }
}

impl From<AnimationDefinition> for Animation {
    fn from(definition: AnimationDefinition) -> Self {
        Self::new(definition)
    }
}
