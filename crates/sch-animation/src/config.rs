/// Configuration for an [`AnimationDriver`](crate::AnimationDriver).
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Milliseconds of playback time each pulse advances.
    pub period_ms: u64,
    /// Maximum playback log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            period_ms: 50,
            max_events: 0,
        }
    }
}

impl DriverConfig {
    /// Set the milliseconds each pulse advances.
    pub fn with_period_ms(mut self, period_ms: u64) -> Self {
        self.period_ms = period_ms;
        self
    }

    /// Set the maximum playback log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }
}
