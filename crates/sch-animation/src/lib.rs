//! Timed transitions and tick-driven animation playback.
//!
//! An [`AnimationDefinition`] is the persisted, ordered list of
//! [`Transition`]s. An [`Animation`] pairs a definition with an
//! [`AnimationRuntime`] cursor and is advanced by an external clock through
//! [`Animation::tick`]. The [`AnimationDriver`] is a fixed-rate clock that
//! drives many animations and records what happened in a [`PlaybackLog`].

/// Animations: a definition plus its playback cursor.
pub mod animation;
/// Transition and animation records.
pub mod codec;
/// Configuration for the playback driver.
pub mod config;
/// Fixed-rate driver ticking a set of animations.
pub mod driver;
/// Error types for the animation crate.
pub mod error;
/// Playback events and the playback log.
pub mod event;
/// The transient cursor that walks a transition list.
pub mod runtime;
/// Lifecycle states derived from the cursor.
pub mod state;
/// Transition durations.
pub mod timing;
/// The transition capability and the built-in kinds.
pub mod transition;

/// Re-exports of [`animation::Animation`] and [`animation::AnimationDefinition`].
pub use animation::{Animation, AnimationDefinition};
/// Re-exports of the transition and animation record types.
pub use codec::{
    AnimationDeserializer, AnimationSerializer, TransitionBlueprint, TransitionRegistry,
    animation_blueprint, builtin_transition_registry, empty_transition_blueprint,
    schematic_transition_blueprint, transition_blueprint,
};
/// Re-export of [`config::DriverConfig`].
pub use config::DriverConfig;
/// Re-exports of [`driver::AnimationDriver`] and [`driver::AnimationHandle`].
pub use driver::{AnimationDriver, AnimationHandle};
/// Re-exports of [`error::AnimationError`] and [`error::AnimationResult`].
pub use error::{AnimationError, AnimationResult};
/// Re-exports of the playback event types.
pub use event::{PlaybackEvent, PlaybackEventKind, PlaybackLog};
/// Re-exports of [`runtime::AnimationRuntime`] and [`runtime::TickOutcome`].
pub use runtime::{AnimationRuntime, TickOutcome};
/// Re-exports of [`state::AnimationState`] and [`state::StateFlags`].
pub use state::{AnimationState, StateFlags};
/// Re-export of [`timing::Timing`].
pub use timing::Timing;
/// Re-exports of the transition types.
pub use transition::{EmptyTransition, SchematicTransition, SharedTransition, Transition};
