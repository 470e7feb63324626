//! Animation timing primitives.
//!
//! All animation in optiviz runs on a virtual millisecond clock that the
//! host advances (a browser frame callback, a terminal loop, or a test).
//! Nothing here sleeps or spawns; a timer "fires" when the host advances
//! the clock past its due time.
//!
//! - [`clock`]: frame time and the single-slot cancellable timer
//! - [`reveal`]: stroke-reveal and hover transitions

pub mod clock;
pub mod reveal;

use serde::{Deserialize, Serialize};

pub use clock::{Timer, TimerId, TimerSlot};
pub use reveal::{Emphasis, HoverState, StrokeReveal};

/// Point on the animation clock, in whole milliseconds since the host
/// started the clock.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct FrameTime {
    millis: u64,
}

impl FrameTime {
    /// Clock origin.
    pub const ZERO: Self = Self { millis: 0 };

    /// Create from milliseconds.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Milliseconds since the origin.
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.millis
    }

    /// Advance by `millis`, saturating.
    #[must_use]
    pub const fn add_millis(self, millis: u64) -> Self {
        Self {
            millis: self.millis.saturating_add(millis),
        }
    }

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is later.
    #[must_use]
    pub const fn millis_since(self, earlier: Self) -> u64 {
        self.millis.saturating_sub(earlier.millis)
    }
}

impl std::ops::Add for FrameTime {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.add_millis(rhs.millis)
    }
}

impl std::ops::Sub for FrameTime {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_millis(self.millis_since(rhs))
    }
}

impl std::fmt::Display for FrameTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.millis)
    }
}

/// Linear interpolation progress of `elapsed` over `duration`, in `[0, 1]`.
///
/// A zero duration completes immediately.
#[must_use]
pub fn linear_progress(elapsed_ms: u64, duration_ms: u64) -> f64 {
    if duration_ms == 0 {
        return 1.0;
    }
    (elapsed_ms as f64 / duration_ms as f64).clamp(0.0, 1.0)
}
