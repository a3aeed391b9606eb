use log::{debug, warn};

use crate::animation::Animation;
use crate::config::DriverConfig;
use crate::error::{AnimationError, AnimationResult};
use crate::event::{PlaybackEvent, PlaybackEventKind, PlaybackLog};
use crate::runtime::TickOutcome;

/// Identifies an animation owned by an [`AnimationDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle(usize);

impl AnimationHandle {
    /// Position of the animation in the driver.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A fixed-rate clock that ticks every activated animation it owns.
///
/// Each [`AnimationDriver::pulse`] advances driver time by the configured
/// period. Animations that reached [`crate::AnimationState::Finished`] are
/// deactivated instead of ticked; all other activated animations are ticked
/// by the period, in the order they were added.
pub struct AnimationDriver {
    config: DriverConfig,
    animations: Vec<Animation>,
    log: PlaybackLog,
    elapsed_ms: u64,
    pulses: u64,
}

impl std::fmt::Debug for AnimationDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationDriver")
            .field("elapsed_ms", &self.elapsed_ms)
            .field("animations", &self.animations.len())
            .field("events", &self.log.len())
            .finish()
    }
}

impl AnimationDriver {
    /// Create a driver with no animations.
    pub fn new(config: DriverConfig) -> Self {
        let log = PlaybackLog::new(config.max_events);
        Self {
            config,
            animations: Vec::new(),
            log,
            elapsed_ms: 0,
            pulses: 0,
        }
    }

    /// Take ownership of an animation. It is not started.
    pub fn add(&mut self, animation: Animation) -> AnimationHandle {
        self.animations.push(animation);
        AnimationHandle(self.animations.len() - 1)
    }

    /// Activate the animation behind `handle`.
    pub fn start(&mut self, handle: AnimationHandle) -> AnimationResult<()> {
        let now = self.elapsed_ms;
        let animation = self
            .animations
            .get_mut(handle.0)
            .ok_or(AnimationError::UnknownAnimation(handle.0))?;
        animation.activate();
        self.log.push(PlaybackEvent::new(
            now,
            handle.0,
            animation.id(),
            PlaybackEventKind::Activated,
        ));
        Ok(())
    }

    /// Deactivate the animation behind `handle`, keeping its cursor.
    pub fn stop(&mut self, handle: AnimationHandle) -> AnimationResult<()> {
        let now = self.elapsed_ms;
        let animation = self
            .animations
            .get_mut(handle.0)
            .ok_or(AnimationError::UnknownAnimation(handle.0))?;
        if animation.is_activated() {
            animation.deactivate();
            self.log.push(PlaybackEvent::new(
                now,
                handle.0,
                animation.id(),
                PlaybackEventKind::Halted,
            ));
        }
        Ok(())
    }

    /// Advance every activated animation by one period.
    ///
    /// A failing transition stops the pulse: its animation is deactivated
    /// and the error returned. Animations later in the order are not ticked.
    pub fn pulse(&mut self) -> AnimationResult<()> {
        self.pulses += 1;
        self.elapsed_ms = self.elapsed_ms.saturating_add(self.config.period_ms);
        let now = self.elapsed_ms;

        for (index, animation) in self.animations.iter_mut().enumerate() {
            if !animation.is_activated() {
                continue;
            }
            if animation.state().is_finished() {
                animation.deactivate();
                debug!(
                    "animation {} finished at {now} ms",
                    animation.id().unwrap_or("<unnamed>")
                );
                self.log.push(PlaybackEvent::new(
                    now,
                    index,
                    animation.id(),
                    PlaybackEventKind::Finished,
                ));
                continue;
            }

            match animation.tick(self.config.period_ms) {
                Ok(outcome) => record(&mut self.log, now, index, animation, outcome),
                Err(e) => {
                    warn!(
                        "animation {} stopped: {e}",
                        animation.id().unwrap_or("<unnamed>")
                    );
                    animation.deactivate();
                    self.log.push(PlaybackEvent::new(
                        now,
                        index,
                        animation.id(),
                        PlaybackEventKind::Halted,
                    ));
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Pulse until no animation is activated or `max_pulses` is reached.
    /// Returns the number of pulses performed.
    pub fn run_until_idle(&mut self, max_pulses: u64) -> AnimationResult<u64> {
        let mut count = 0;
        while count < max_pulses && !self.is_idle() {
            self.pulse()?;
            count += 1;
        }
        Ok(count)
    }

    /// Whether no animation is activated.
    pub fn is_idle(&self) -> bool {
        self.animations.iter().all(|a| !a.is_activated())
    }

    /// The animation behind `handle`.
    pub fn animation(&self, handle: AnimationHandle) -> Option<&Animation> {
        self.animations.get(handle.0)
    }

    /// Every owned animation, in the order added.
    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    /// The playback log.
    pub fn events(&self) -> &PlaybackLog {
        &self.log
    }

    /// Driver time in milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Number of pulses performed.
    pub fn pulses(&self) -> u64 {
        self.pulses
    }

    /// The active configuration.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }
}

fn record(
    log: &mut PlaybackLog,
    now: u64,
    index: usize,
    animation: &Animation,
    outcome: TickOutcome,
) {
    let kind_at = |i: usize| {
        animation
            .definition()
            .transitions()
            .get(i)
            .map(|t| t.kind().to_string())
            .unwrap_or_default()
    };
    let id = animation.id();
    if let Some(i) = outcome.completed {
        log.push(PlaybackEvent::new(now, index, id, PlaybackEventKind::Completed { index: i }));
    }
    if let Some(i) = outcome.started {
        log.push(PlaybackEvent::new(
            now,
            index,
            id,
            PlaybackEventKind::Started {
                index: i,
                kind: kind_at(i),
            },
        ));
    }
    if let Some(i) = outcome.fired {
        log.push(PlaybackEvent::new(
            now,
            index,
            id,
            PlaybackEventKind::Fired {
                index: i,
                kind: kind_at(i),
            },
        ));
    }
}
