//! History playback state machine.
//!
//! ```text
//!            start(non-empty history)
//!   Idle ────────────────────────────────▶ Animating { step }
//!    │                                       │  one tick per interval,
//!    │ start(empty history, best)            │  history[step] becomes the
//!    ▼                                       ▼  displayed ordering
//!   Settled ◀────────────────────────── last step applied
//!              displayed ordering := best (if any)
//! ```
//!
//! The driver owns exactly one [`TimerSlot`]. Starting a new run always
//! cancels the previous timer before arming a new one, and every emitted
//! [`DriverEvent`] carries the [`RunId`] it belongs to.

use serde::{Deserialize, Serialize};

use crate::animation::{FrameTime, TimerId, TimerSlot};
use crate::config::AnimationConfig;
use crate::snapshot::{normalize, BestSolution, History, Ordering, OrderingSource};

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriverState {
    /// No data; the placeholder is shown.
    Idle,
    /// Stepping through history; `step` is the next snapshot to apply.
    Animating { step: usize },
    /// Playback finished, or there was only a best solution.
    Settled,
}

/// Identifier of one playback run. A new run starts every time the
/// history is replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(u64);

impl RunId {
    /// Raw run number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// What happened on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriverEventKind {
    /// Snapshot `index` was visited. `applied` is false when the snapshot
    /// carried no ordering and the display kept its previous ordering.
    Step { index: usize, applied: bool },
    /// Playback settled. `from_best` tells whether the best solution
    /// replaced the last step's ordering.
    Settled { from_best: bool },
}

/// A tick observed while advancing the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverEvent {
    /// Run the tick belongs to.
    pub run: RunId,
    /// Timer that fired.
    pub timer: TimerId,
    /// Scheduled time of the tick.
    pub at: FrameTime,
    /// What the tick did.
    pub kind: DriverEventKind,
}

/// Steps through a history on a fixed cadence.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    interval_ms: u64,
    state: DriverState,
    history: History,
    best: Option<BestSolution>,
    current: Option<Ordering>,
    changed_at: FrameTime,
    timer: TimerSlot,
    now: FrameTime,
    run: RunId,
}

impl AnimationDriver {
    /// Idle driver with the configured cadence.
    #[must_use]
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            interval_ms: config.step_interval_ms,
            state: DriverState::Idle,
            history: History::empty(),
            best: None,
            current: None,
            changed_at: FrameTime::ZERO,
            timer: TimerSlot::new(),
            now: FrameTime::ZERO,
            run: RunId::default(),
        }
    }

    /// Begin a new run over `history`, replacing any run in progress.
    ///
    /// With a non-empty history the driver animates; with only a best
    /// solution it settles immediately; with neither it goes idle.
    pub fn start(&mut self, history: History, best: Option<BestSolution>) {
        if self.timer.cancel().is_some() {
            tracing::debug!(run = self.run.get(), "replacing running animation");
        }
        self.run = RunId(self.run.0 + 1);
        self.history = history;
        self.best = best;
        self.current = None;
        self.changed_at = self.now;

        if !self.history.is_empty() {
            self.state = DriverState::Animating { step: 0 };
            let timer = self.timer.arm(self.now, self.interval_ms);
            tracing::debug!(
                run = self.run.get(),
                timer = timer.get(),
                steps = self.history.len(),
                "animation started"
            );
        } else if self.best.is_some() {
            self.current = normalize(self.best.as_ref());
            self.state = DriverState::Settled;
            tracing::debug!(run = self.run.get(), "no history, settled on best");
        } else {
            self.state = DriverState::Idle;
        }
    }

    /// Replace the best solution without restarting playback.
    ///
    /// While animating the new best is used when playback settles; once
    /// settled it replaces the displayed ordering immediately.
    pub fn set_best(&mut self, best: Option<BestSolution>) {
        self.best = best;
        match self.state {
            DriverState::Animating { .. } => {}
            DriverState::Settled => {
                if let Some(ordering) = normalize(self.best.as_ref()) {
                    self.current = Some(ordering);
                    self.changed_at = self.now;
                }
            }
            DriverState::Idle => {
                if self.history.is_empty() && self.best.is_some() {
                    self.current = normalize(self.best.as_ref());
                    self.changed_at = self.now;
                    self.state = DriverState::Settled;
                }
            }
        }
    }

    /// Tear down: cancel the live timer and forget the run.
    pub fn cancel(&mut self) {
        self.timer.cancel();
        self.history = History::empty();
        self.best = None;
        self.current = None;
        self.state = DriverState::Idle;
    }

    /// Advance the clock to `now`, firing every tick due on the way in
    /// order. A `now` earlier than the current clock is ignored.
    pub fn advance_to(&mut self, now: FrameTime) -> Vec<DriverEvent> {
        let mut events = Vec::new();
        while let Some((timer, at)) = self.timer.pop_due(now) {
            self.tick(timer, at, &mut events);
        }
        self.now = self.now.max(now);
        events
    }

    /// Advance the clock by `millis`.
    pub fn advance_by(&mut self, millis: u64) -> Vec<DriverEvent> {
        self.advance_to(self.now.add_millis(millis))
    }

    fn tick(&mut self, timer: TimerId, at: FrameTime, events: &mut Vec<DriverEvent>) {
        let DriverState::Animating { step } = self.state else {
            // A timer outliving its run would be a bug; never let it act.
            self.timer.cancel();
            return;
        };

        let applied = match self.history.get(step).and_then(OrderingSource::ordering) {
            Some(ordering) => {
                self.current = Some(ordering);
                self.changed_at = at;
                true
            }
            None => {
                tracing::warn!(step, "snapshot has no ordering, keeping previous");
                false
            }
        };
        tracing::trace!(run = self.run.get(), step, %at, "animation step");
        events.push(DriverEvent {
            run: self.run,
            timer,
            at,
            kind: DriverEventKind::Step {
                index: step,
                applied,
            },
        });

        let next = step + 1;
        if next >= self.history.len() {
            self.settle(timer, at, events);
        } else {
            self.state = DriverState::Animating { step: next };
        }
    }

    fn settle(&mut self, timer: TimerId, at: FrameTime, events: &mut Vec<DriverEvent>) {
        self.timer.finish();
        self.state = DriverState::Settled;

        let from_best = match normalize(self.best.as_ref()) {
            Some(ordering) => {
                self.current = Some(ordering);
                self.changed_at = at;
                true
            }
            None => false,
        };
        tracing::debug!(run = self.run.get(), from_best, %at, "animation settled");
        events.push(DriverEvent {
            run: self.run,
            timer,
            at,
            kind: DriverEventKind::Settled { from_best },
        });
    }

    /// The ordering currently on display.
    #[must_use]
    pub const fn current_ordering(&self) -> Option<&Ordering> {
        self.current.as_ref()
    }

    /// When the displayed ordering last changed.
    #[must_use]
    pub const fn ordering_changed_at(&self) -> FrameTime {
        self.changed_at
    }

    /// Playback state.
    #[must_use]
    pub const fn state(&self) -> DriverState {
        self.state
    }

    /// Whether playback is in progress.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        matches!(self.state, DriverState::Animating { .. })
    }

    /// Number of live timers: 0 or 1.
    #[must_use]
    pub const fn live_timers(&self) -> usize {
        self.timer.live_count()
    }

    /// Number of timers cancelled before finishing.
    #[must_use]
    pub const fn cancelled_timers(&self) -> u64 {
        self.timer.cancelled_count()
    }

    /// Current clock.
    #[must_use]
    pub const fn now(&self) -> FrameTime {
        self.now
    }

    /// Current run.
    #[must_use]
    pub const fn run(&self) -> RunId {
        self.run
    }

    /// History of the current run.
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Best solution of the current run.
    #[must_use]
    pub const fn best(&self) -> Option<&BestSolution> {
        self.best.as_ref()
    }

    /// Cadence between steps.
    #[must_use]
    pub const fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use serde_json::json;

    fn driver() -> AnimationDriver {
        AnimationDriver::new(&AnimationConfig::default())
    }

    fn history(orderings: &[&[usize]]) -> History {
        orderings
            .iter()
            .map(|o| Snapshot::new(json!({ "current_solution": o })))
            .collect()
    }

    fn best(o: &[usize]) -> BestSolution {
        BestSolution::new(json!({ "best_solution": o, "best_cost": 1.0 }))
    }

    fn current(d: &AnimationDriver) -> Option<Vec<usize>> {
        d.current_ordering().map(|o| o.as_slice().to_vec())
    }

    #[test]
    fn test_starts_idle() {
        let d = driver();
        assert_eq!(d.state(), DriverState::Idle);
        assert_eq!(d.live_timers(), 0);
        assert!(d.current_ordering().is_none());
    }

    #[test]
    fn test_empty_history_no_best_is_idle() {
        let mut d = driver();
        d.start(History::empty(), None);
        assert_eq!(d.state(), DriverState::Idle);
        assert_eq!(d.live_timers(), 0);
    }

    #[test]
    fn test_best_only_settles_immediately() {
        let mut d = driver();
        d.start(History::empty(), Some(best(&[2, 0, 1])));
        assert_eq!(d.state(), DriverState::Settled);
        assert_eq!(d.live_timers(), 0);
        assert_eq!(current(&d), Some(vec![2, 0, 1]));
    }

    #[test]
    fn test_steps_on_cadence_then_settles_on_best() {
        let mut d = driver();
        d.start(history(&[&[0, 1, 2], &[1, 0, 2], &[2, 1, 0]]), Some(best(&[0, 2, 1])));
        assert_eq!(d.state(), DriverState::Animating { step: 0 });
        assert_eq!(d.live_timers(), 1);

        assert!(d.advance_to(FrameTime::from_millis(199)).is_empty());
        assert!(d.current_ordering().is_none());

        d.advance_to(FrameTime::from_millis(200));
        assert_eq!(current(&d), Some(vec![0, 1, 2]));
        assert_eq!(d.state(), DriverState::Animating { step: 1 });

        d.advance_to(FrameTime::from_millis(400));
        assert_eq!(current(&d), Some(vec![1, 0, 2]));

        let events = d.advance_to(FrameTime::from_millis(600));
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1].kind, DriverEventKind::Settled { from_best: true }));
        assert_eq!(d.state(), DriverState::Settled);
        assert_eq!(d.live_timers(), 0);
        assert_eq!(current(&d), Some(vec![0, 2, 1]));
        assert_eq!(d.ordering_changed_at(), FrameTime::from_millis(600));
    }

    #[test]
    fn test_settle_without_best_keeps_last_step() {
        let mut d = driver();
        d.start(history(&[&[0, 1], &[1, 0]]), None);
        let events = d.advance_by(10_000);
        assert!(matches!(
            events.last().map(|e| e.kind),
            Some(DriverEventKind::Settled { from_best: false })
        ));
        assert_eq!(current(&d), Some(vec![1, 0]));
        assert_eq!(d.live_timers(), 0);
    }

    #[test]
    fn test_big_jump_applies_every_step_in_order() {
        let mut d = driver();
        d.start(history(&[&[0], &[0], &[0], &[0], &[0]]), None);
        let events = d.advance_by(5_000);
        let steps: Vec<usize> = events
            .iter()
            .filter_map(|e| match e.kind {
                DriverEventKind::Step { index, .. } => Some(index),
                DriverEventKind::Settled { .. } => None,
            })
            .collect();
        assert_eq!(steps, vec![0, 1, 2, 3, 4]);
        let times: Vec<u64> = events.iter().map(|e| e.at.as_millis()).collect();
        assert_eq!(times, vec![200, 400, 600, 800, 1000, 1000]);
    }

    #[test]
    fn test_snapshot_without_ordering_keeps_previous() {
        let mut d = driver();
        let h: History = vec![
            Snapshot::new(json!({ "current_solution": [1, 0] })),
            Snapshot::new(json!({ "iter": 1 })),
            Snapshot::new(json!({ "candidate_solution": [0, 1] })),
        ]
        .into();
        d.start(h, None);

        d.advance_to(FrameTime::from_millis(200));
        let events = d.advance_to(FrameTime::from_millis(400));
        assert!(matches!(
            events[0].kind,
            DriverEventKind::Step { index: 1, applied: false }
        ));
        assert_eq!(current(&d), Some(vec![1, 0]));

        d.advance_to(FrameTime::from_millis(600));
        assert_eq!(current(&d), Some(vec![0, 1]));
    }

    #[test]
    fn test_replacing_history_cancels_old_timer() {
        let mut d = driver();
        d.start(history(&[&[0, 1], &[1, 0], &[0, 1], &[1, 0]]), None);
        d.advance_to(FrameTime::from_millis(300));
        let old_run = d.run();

        d.start(history(&[&[5, 6, 7]]), None);
        let new_run = d.run();
        assert_ne!(old_run, new_run);
        assert_eq!(d.live_timers(), 1);
        assert_eq!(d.cancelled_timers(), 1);

        let events = d.advance_by(5_000);
        assert!(!events.is_empty());
        assert!(events.iter().all(|e| e.run == new_run));
        // new run's first tick is one interval after the restart
        assert_eq!(events[0].at.as_millis(), 500);
        assert_eq!(current(&d), Some(vec![5, 6, 7]));
        assert_eq!(d.live_timers(), 0);
    }

    #[test]
    fn test_set_best_while_animating_used_at_settle() {
        let mut d = driver();
        d.start(history(&[&[0, 1, 2]]), None);
        d.set_best(Some(best(&[2, 1, 0])));
        assert!(d.is_animating());
        d.advance_by(200);
        assert_eq!(current(&d), Some(vec![2, 1, 0]));
    }

    #[test]
    fn test_set_best_after_settle_replaces_display() {
        let mut d = driver();
        d.start(history(&[&[0, 1, 2]]), None);
        d.advance_by(200);
        d.set_best(Some(best(&[1, 2, 0])));
        assert_eq!(current(&d), Some(vec![1, 2, 0]));
    }

    #[test]
    fn test_set_best_from_idle_settles() {
        let mut d = driver();
        d.set_best(Some(best(&[1, 0])));
        assert_eq!(d.state(), DriverState::Settled);
        assert_eq!(current(&d), Some(vec![1, 0]));
    }

    #[test]
    fn test_cancel_tears_down() {
        let mut d = driver();
        d.start(history(&[&[0, 1], &[1, 0]]), None);
        d.cancel();
        assert_eq!(d.state(), DriverState::Idle);
        assert_eq!(d.live_timers(), 0);
        assert!(d.advance_by(10_000).is_empty());
        assert!(d.current_ordering().is_none());
    }

    #[test]
    fn test_clock_never_goes_backwards() {
        let mut d = driver();
        d.advance_to(FrameTime::from_millis(1000));
        d.advance_to(FrameTime::from_millis(10));
        assert_eq!(d.now(), FrameTime::from_millis(1000));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::snapshot::Snapshot;
    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        /// A history of length H settles exactly at H intervals with no
        /// live timer left behind.
        #[test]
        fn prop_settles_after_h_intervals(h in 1usize..60, interval in 1u64..500) {
            let config = AnimationConfig { step_interval_ms: interval, ..AnimationConfig::default() };
            let mut d = AnimationDriver::new(&config);
            let history: History = (0..h)
                .map(|i| Snapshot::new(json!({ "current_solution": [i] })))
                .collect();
            d.start(history, None);

            let end = h as u64 * interval;
            d.advance_to(FrameTime::from_millis(end - 1));
            prop_assert!(d.is_animating());
            prop_assert_eq!(d.live_timers(), 1);

            d.advance_to(FrameTime::from_millis(end + 1));
            prop_assert_eq!(d.state(), DriverState::Settled);
            prop_assert_eq!(d.live_timers(), 0);
            prop_assert_eq!(d.current_ordering().map(|o| o.as_slice().to_vec()), Some(vec![h - 1]));
        }

        /// However often the history is replaced, at most one timer is live
        /// and only the latest run ever ticks.
        #[test]
        fn prop_restarts_never_overlap(restarts in proptest::collection::vec(0u64..700, 1..10)) {
            let mut d = AnimationDriver::new(&AnimationConfig::default());
            for gap in &restarts {
                let history: History = (0..4)
                    .map(|i| Snapshot::new(json!({ "current_solution": [i] })))
                    .collect();
                d.start(history, None);
                let run = d.run();
                prop_assert!(d.live_timers() <= 1);
                for e in d.advance_by(*gap) {
                    prop_assert_eq!(e.run, run);
                }
                prop_assert!(d.live_timers() <= 1);
            }
        }
    }
}
