/// How long a transition waits before its effect and lingers after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timing {
    before_ms: u64,
    after_ms: u64,
}

impl Timing {
    /// A timing with no delay on either side.
    pub const INSTANT: Self = Self::from_millis(0, 0);

    /// Build a timing from unsigned durations.
    pub const fn from_millis(before_ms: u64, after_ms: u64) -> Self {
        Self {
            before_ms,
            after_ms,
        }
    }

    /// Delay before the effect runs.
    pub fn before_ms(&self) -> u64 {
        self.before_ms
    }

    /// Time the transition stays current after its effect.
    pub fn after_ms(&self) -> u64 {
        self.after_ms
    }

    /// `before + after`.
    pub fn run_time_ms(&self) -> u64 {
        self.before_ms.saturating_add(self.after_ms)
    }
}
