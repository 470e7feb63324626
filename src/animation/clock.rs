//! Single-slot cancellable interval timer.
//!
//! A [`TimerSlot`] owns at most one live timer. Arming the slot always
//! cancels whatever was armed before, so two timers can never be live at
//! once. Timer identifiers increase monotonically and are never reused,
//! which lets callers tell a tick of the current timer apart from one that
//! belonged to a cancelled timer.

use serde::{Deserialize, Serialize};

use super::FrameTime;

/// Identifier of one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A repeating timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    /// Identifier assigned when armed.
    pub id: TimerId,
    /// Milliseconds between firings.
    pub interval_ms: u64,
    /// Time of the next firing.
    pub next_due: FrameTime,
}

/// Holder of at most one live timer.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TimerSlot {
    live: Option<Timer>,
    /// Monotonic sequence counter for timer ids.
    sequence: u64,
    /// Number of timers cancelled before they finished.
    cancelled: u64,
}

impl TimerSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a repeating timer whose first firing is one interval after
    /// `now`. Any previously live timer is cancelled first.
    ///
    /// A zero interval is bumped to 1ms so the timer always makes progress.
    pub fn arm(&mut self, now: FrameTime, interval_ms: u64) -> TimerId {
        self.cancel();

        let interval_ms = interval_ms.max(1);
        let id = TimerId(self.sequence);
        self.sequence += 1;

        self.live = Some(Timer {
            id,
            interval_ms,
            next_due: now.add_millis(interval_ms),
        });
        id
    }

    /// Cancel the live timer, if any, returning its id.
    pub fn cancel(&mut self) -> Option<TimerId> {
        let timer = self.live.take()?;
        self.cancelled += 1;
        tracing::debug!(timer = timer.id.get(), "timer cancelled");
        Some(timer.id)
    }

    /// Stop the live timer because its work is done.
    ///
    /// Unlike [`TimerSlot::cancel`] this does not count as a cancellation.
    pub fn finish(&mut self) -> Option<TimerId> {
        self.live.take().map(|timer| timer.id)
    }

    /// The live timer.
    #[must_use]
    pub const fn live(&self) -> Option<&Timer> {
        self.live.as_ref()
    }

    /// Whether `id` is the live timer.
    #[must_use]
    pub fn is_live(&self, id: TimerId) -> bool {
        self.live.is_some_and(|t| t.id == id)
    }

    /// Number of live timers: always 0 or 1.
    #[must_use]
    pub const fn live_count(&self) -> usize {
        if self.live.is_some() {
            1
        } else {
            0
        }
    }

    /// Number of timers cancelled so far.
    #[must_use]
    pub const fn cancelled_count(&self) -> u64 {
        self.cancelled
    }

    /// If the live timer is due at or before `now`, consume one firing and
    /// return its id and scheduled time. The timer is rescheduled one
    /// interval later; call repeatedly to drain every overdue firing.
    pub fn pop_due(&mut self, now: FrameTime) -> Option<(TimerId, FrameTime)> {
        let timer = self.live.as_mut()?;
        if timer.next_due > now {
            return None;
        }
        let fired_at = timer.next_due;
        timer.next_due = fired_at.add_millis(timer.interval_ms);
        Some((timer.id, fired_at))
    }
}
