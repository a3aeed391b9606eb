use std::fmt;

/// Something that happened to one animation during a driver pulse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEventKind {
    /// The animation was activated.
    Activated,
    /// A transition became current.
    Started {
        /// Position in the definition.
        index: usize,
        /// Transition kind.
        kind: String,
    },
    /// A transition ran its effect.
    Fired {
        /// Position in the definition.
        index: usize,
        /// Transition kind.
        kind: String,
    },
    /// A transition used up its run time.
    Completed {
        /// Position in the definition.
        index: usize,
    },
    /// The animation reached its end and stopped being ticked.
    Finished,
    /// The animation was deactivated before finishing.
    Halted,
}

impl fmt::Display for PlaybackEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Activated => f.write_str("activated"),
            Self::Started { index, kind } => write!(f, "started #{index} ({kind})"),
            Self::Fired { index, kind } => write!(f, "fired #{index} ({kind})"),
            Self::Completed { index } => write!(f, "completed #{index}"),
            Self::Finished => f.write_str("finished"),
            Self::Halted => f.write_str("halted"),
        }
    }
}

/// A single recorded playback event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackEvent {
    /// Driver time in milliseconds when the event occurred.
    pub at_ms: u64,
    /// Driver handle of the animation.
    pub animation: usize,
    /// Storage id of the animation, if it has one.
    pub animation_id: Option<String>,
    /// What happened.
    pub kind: PlaybackEventKind,
}

impl PlaybackEvent {
    /// Create a new event.
    pub fn new(
        at_ms: u64,
        animation: usize,
        animation_id: Option<&str>,
        kind: PlaybackEventKind,
    ) -> Self {
        Self {
            at_ms,
            animation,
            animation_id: animation_id.map(str::to_owned),
            kind,
        }
    }
}

impl fmt::Display for PlaybackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.animation_id {
            Some(id) => write!(f, "[{:>6} ms] {id}: {}", self.at_ms, self.kind),
            None => write!(f, "[{:>6} ms] #{}: {}", self.at_ms, self.animation, self.kind),
        }
    }
}

/// A bounded log of playback events.
#[derive(Debug, Clone, Default)]
pub struct PlaybackLog {
    events: Vec<PlaybackEvent>,
    max_events: usize,
}

impl PlaybackLog {
    /// Create a log holding at most `max_events` events (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest ones past capacity.
    pub fn push(&mut self, event: PlaybackEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let excess = self.events.len() - self.max_events;
            self.events.drain(..excess);
        }
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> &[PlaybackEvent] {
        &self.events
    }

    /// Events recorded for the animation with `handle`.
    pub fn events_for(&self, handle: usize) -> Vec<&PlaybackEvent> {
        self.events.iter().filter(|e| e.animation == handle).collect()
    }

    /// Events recorded at driver time `at_ms`.
    pub fn events_at(&self, at_ms: u64) -> Vec<&PlaybackEvent> {
        self.events.iter().filter(|e| e.at_ms == at_ms).collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
