use std::fmt;

/// Lifecycle state of an animation, derived from its cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationState {
    /// Seeded and waiting to be activated.
    Ready,
    /// Active with transitions still to come.
    Running,
    /// Active on the last transition, which has not fired yet.
    Ending,
    /// Nothing left to run.
    Finished,
    /// Deactivated in the middle of a transition.
    Halted,
}

impl AnimationState {
    /// Whether the driver should stop ticking.
    pub fn is_finished(self) -> bool {
        self == Self::Finished
    }
}

impl fmt::Display for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Ending => "ending",
            Self::Finished => "finished",
            Self::Halted => "halted",
        };
        f.write_str(name)
    }
}

/// The facts an [`AnimationState`] is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateFlags {
    /// The animation is activated.
    pub activated: bool,
    /// A transition is current.
    pub has_current: bool,
    /// The current transition has run its effect.
    pub fired: bool,
    /// No transitions are queued after the current one.
    pub queue_empty: bool,
}

impl StateFlags {
    /// The state these flags describe.
    pub fn state(self) -> AnimationState {
        use AnimationState::*;
        match (self.activated, self.has_current, self.fired, self.queue_empty) {
            (true, false, _, true) => Finished,
            (true, false, _, false) => Running,
            (true, true, false, true) => Ending,
            (true, true, true, true) => Finished,
            (true, true, _, false) => Running,
            (false, true, _, _) => Halted,
            (false, false, _, true) => Finished,
            (false, false, _, false) => Ready,
        }
    }
}
