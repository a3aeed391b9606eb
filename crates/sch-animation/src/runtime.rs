use std::collections::VecDeque;

use log::debug;

use crate::error::AnimationResult;
use crate::transition::SharedTransition;

/// What a single [`AnimationRuntime::tick`] did.
///
/// Indices refer to positions in the seeded transition list. One tick can
/// complete a transition, start the next, and fire it when the next has no
/// leading delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Nothing was queued; the tick did nothing.
    pub idle: bool,
    /// A transition that became current.
    pub started: Option<usize>,
    /// A transition whose effect ran.
    pub fired: Option<usize>,
    /// A transition that finished its run time and was left.
    pub completed: Option<usize>,
}

impl TickOutcome {
    /// The outcome of ticking with nothing queued.
    pub const IDLE: Self = Self {
        idle: true,
        started: None,
        fired: None,
        completed: None,
    };

    /// Whether the tick changed nothing but the elapsed counter.
    pub fn is_quiet(&self) -> bool {
        self.started.is_none() && self.fired.is_none() && self.completed.is_none()
    }
}

/// The transient cursor over a transition list.
///
/// Holds the queue of transitions still to come, the current transition,
/// the time spent in it, and whether it has fired. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct AnimationRuntime {
    queue: VecDeque<SharedTransition>,
    current: Option<SharedTransition>,
    current_index: Option<usize>,
    popped: usize,
    elapsed_ms: u64,
    fired: bool,
}

impl AnimationRuntime {
    /// A cursor positioned before the first of `transitions`.
    pub fn seeded(transitions: &[SharedTransition]) -> Self {
        Self {
            queue: transitions.iter().cloned().collect(),
            ..Self::default()
        }
    }

    /// The current transition.
    pub fn current(&self) -> Option<&SharedTransition> {
        self.current.as_ref()
    }

    /// Position of the current transition in the seeded list.
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// The transition that will become current next.
    pub fn peek_next(&self) -> Option<&SharedTransition> {
        self.queue.front()
    }

    /// Number of transitions queued after the current one.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Whether no transitions are queued.
    pub fn queue_is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Time spent in the current transition.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Whether the current transition has fired.
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Whether there is neither a current nor a queued transition.
    pub fn is_exhausted(&self) -> bool {
        self.current.is_none() && self.queue.is_empty()
    }

    /// Total run time of the queued transitions.
    pub fn queued_time_ms(&self) -> u64 {
        self.queue
            .iter()
            .fold(0u64, |sum, t| sum.saturating_add(t.run_time()))
    }

    /// Time left before the current transition completes.
    pub fn time_to_next_ms(&self) -> Option<u64> {
        self.current
            .as_ref()
            .map(|t| t.run_time().saturating_sub(self.elapsed_ms))
    }

    /// Make the next queued transition current, clearing the counter.
    ///
    /// Returns `false` and clears the current transition when the queue is
    /// empty.
    pub fn advance(&mut self) -> bool {
        self.elapsed_ms = 0;
        self.fired = false;
        match self.queue.pop_front() {
            Some(next) => {
                self.current = Some(next);
                self.current_index = Some(self.popped);
                self.popped += 1;
                true
            }
            None => {
                self.current = None;
                self.current_index = None;
                false
            }
        }
    }

    /// Advance the cursor by `elapsed_ms`.
    ///
    /// A tick crosses at most one transition boundary and leftover time is
    /// not carried into the next transition. An error from a transition's
    /// effect is returned after the transition has been marked fired, so it
    /// will not be retried.
    pub fn tick(&mut self, elapsed_ms: u64) -> AnimationResult<TickOutcome> {
        let mut outcome = TickOutcome::default();
        if self.current.is_none() {
            if !self.advance() {
                return Ok(TickOutcome::IDLE);
            }
            outcome.started = self.current_index;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);

        let Some(current) = self.current.clone() else {
            return Ok(outcome);
        };
        if !self.fired {
            if self.elapsed_ms >= current.milliseconds_before() {
                self.fire(&current, &mut outcome)?;
            }
        } else if self.elapsed_ms >= current.run_time() {
            outcome.completed = self.current_index;
            if self.advance() {
                outcome.started = self.current_index;
                if let Some(next) = self.current.clone() {
                    if self.elapsed_ms >= next.milliseconds_before() {
                        self.fire(&next, &mut outcome)?;
                    }
                }
            }
        }
        Ok(outcome)
    }

    fn fire(
        &mut self,
        transition: &SharedTransition,
        outcome: &mut TickOutcome,
    ) -> AnimationResult<()> {
        self.fired = true;
        outcome.fired = self.current_index;
        debug!(
            "running {} transition #{}",
            transition.kind(),
            self.current_index.unwrap_or_default()
        );
        transition.run()
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::AnimationError;
    use crate::timing::Timing;
    use crate::transition::{EmptyTransition, Transition};

    #[derive(Debug)]
    struct Counting {
        timing: Timing,
        runs: AtomicUsize,
        fail: bool,
    }

    impl Counting {
        fn new(before: u64, after: u64) -> Arc<Self> {
            Arc::new(Self {
                timing: Timing::from_millis(before, after),
                runs: AtomicUsize::new(0),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                timing: Timing::INSTANT,
                runs: AtomicUsize::new(0),
                fail: true,
            })
        }

        fn runs(&self) -> usize {
            self.runs.load(Ordering::SeqCst)
        }
    }

    impl Transition for Counting {
        fn kind(&self) -> &str {
            "counting"
        }

        fn timing(&self) -> Timing {
            self.timing
        }

        fn run(&self) -> AnimationResult<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AnimationError::TransitionFailed {
                    kind: "counting".into(),
                    reason: "boom".into(),
                });
            }
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn shared(t: &Arc<Counting>) -> SharedTransition {
        t.clone()
    }

    #[test]
    fn empty_runtime_ticks_idle() {
        let mut runtime = AnimationRuntime::default();
        assert_eq!(runtime.tick(10).unwrap(), TickOutcome::IDLE);
        assert!(runtime.is_exhausted());
    }

    #[test]
    fn first_tick_starts_and_accumulates() {
        let t = Counting::new(100, 0);
        let mut runtime = AnimationRuntime::seeded(&[shared(&t)]);
        let outcome = runtime.tick(10).unwrap();
        assert_eq!(outcome.started, Some(0));
        assert_eq!(outcome.fired, None);
        assert_eq!(runtime.elapsed_ms(), 10);
        assert_eq!(t.runs(), 0);
    }

    #[test]
    fn fires_once_when_delay_elapses() {
        let t = Counting::new(30, 100);
        let mut runtime = AnimationRuntime::seeded(&[shared(&t)]);
        for _ in 0..2 {
            runtime.tick(10).unwrap();
        }
        assert_eq!(t.runs(), 0);
        let outcome = runtime.tick(10).unwrap();
        assert_eq!(outcome.fired, Some(0));
        for _ in 0..5 {
            runtime.tick(10).unwrap();
        }
        assert_eq!(t.runs(), 1);
        assert!(runtime.has_fired());
    }

    #[test]
    fn reference_sequence_timing() {
        // [(100, 50), (0, 0)] ticked every 10 ms.
        let first = Counting::new(100, 50);
        let second = Counting::new(0, 0);
        let mut runtime = AnimationRuntime::seeded(&[shared(&first), shared(&second)]);

        let mut clock = 0;
        let mut first_fired_at = None;
        let mut second_started_at = None;
        let mut second_fired_at = None;
        while clock < 300 {
            clock += 10;
            let outcome = runtime.tick(10).unwrap();
            if outcome.fired == Some(0) {
                first_fired_at = Some(clock);
            }
            if outcome.started == Some(1) {
                second_started_at = Some(clock);
            }
            if outcome.fired == Some(1) {
                second_fired_at = Some(clock);
                break;
            }
        }
        assert_eq!(first_fired_at, Some(100));
        assert_eq!(second_started_at, Some(150));
        assert_eq!(second_fired_at, Some(150));
        assert_eq!(first.runs(), 1);
        assert_eq!(second.runs(), 1);
        assert!(runtime.has_fired());
        assert!(runtime.queue_is_empty());
    }

    #[test]
    fn large_tick_crosses_one_boundary_only() {
        let a = Counting::new(0, 10);
        let b = Counting::new(5, 0);
        let c = Counting::new(0, 0);
        let mut runtime = AnimationRuntime::seeded(&[shared(&a), shared(&b), shared(&c)]);

        let outcome = runtime.tick(1_000).unwrap();
        assert_eq!(outcome.started, Some(0));
        assert_eq!(outcome.fired, Some(0));

        let outcome = runtime.tick(1_000).unwrap();
        assert_eq!(outcome.completed, Some(0));
        assert_eq!(outcome.started, Some(1));
        assert_eq!(outcome.fired, None);
        assert_eq!(runtime.elapsed_ms(), 0);
        assert_eq!(b.runs(), 0);
        assert_eq!(c.runs(), 0);
    }

    #[test]
    fn exhausts_after_last_transition_completes() {
        let a = Counting::new(0, 0);
        let mut runtime = AnimationRuntime::seeded(&[shared(&a)]);
        runtime.tick(1).unwrap();
        let outcome = runtime.tick(1).unwrap();
        assert_eq!(outcome.completed, Some(0));
        assert_eq!(outcome.started, None);
        assert!(runtime.is_exhausted());
        assert_eq!(runtime.tick(1).unwrap(), TickOutcome::IDLE);
    }

    #[test]
    fn failing_effect_is_not_retried() {
        let bad = Counting::failing();
        let mut runtime = AnimationRuntime::seeded(&[shared(&bad)]);
        assert!(runtime.tick(1).is_err());
        assert!(runtime.has_fired());
        runtime.tick(1).unwrap();
        assert_eq!(bad.runs(), 1);
    }

    #[test]
    fn time_queries() {
        let a: SharedTransition = Arc::new(EmptyTransition::new(Timing::from_millis(10, 20)));
        let b: SharedTransition = Arc::new(EmptyTransition::new(Timing::from_millis(5, 5)));
        let mut runtime = AnimationRuntime::seeded(&[a, b]);
        assert_eq!(runtime.queued_time_ms(), 40);
        assert_eq!(runtime.time_to_next_ms(), None);
        assert!(runtime.peek_next().is_some());

        runtime.tick(12).unwrap();
        assert_eq!(runtime.current_index(), Some(0));
        assert_eq!(runtime.queued(), 1);
        assert_eq!(runtime.queued_time_ms(), 10);
        assert_eq!(runtime.time_to_next_ms(), Some(18));
    }
}
