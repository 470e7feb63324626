//! Stroke-reveal and hover transitions.

use serde::{Deserialize, Serialize};

use super::{linear_progress, FrameTime};

/// Progressive reveal of a stroked path along its own length.
///
/// Expressed as a dash pattern of one dash of `length` and an offset that
/// falls linearly from `length` (fully hidden) to 0 (fully drawn), which is
/// how vector surfaces reveal a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeReveal {
    /// True geometric length of the stroked path.
    pub length: f64,
    /// Time taken to reveal the whole path.
    pub duration_ms: u64,
    /// When the reveal started.
    pub started: FrameTime,
}

impl StrokeReveal {
    /// Start revealing a path of `length` at `started`.
    #[must_use]
    pub const fn new(length: f64, duration_ms: u64, started: FrameTime) -> Self {
        Self {
            length,
            duration_ms,
            started,
        }
    }

    /// Fraction of the path visible at `now`.
    #[must_use]
    pub fn progress_at(&self, now: FrameTime) -> f64 {
        linear_progress(now.millis_since(self.started), self.duration_ms)
    }

    /// Dash offset at `now`.
    #[must_use]
    pub fn dash_offset_at(&self, now: FrameTime) -> f64 {
        self.length * (1.0 - self.progress_at(now))
    }

    /// Whether the whole path is visible at `now`.
    #[must_use]
    pub fn is_complete_at(&self, now: FrameTime) -> bool {
        self.progress_at(now) >= 1.0
    }

    /// Reveal speed in length units per millisecond.
    #[must_use]
    pub fn speed(&self) -> f64 {
        if self.duration_ms == 0 {
            return f64::INFINITY;
        }
        self.length / self.duration_ms as f64
    }
}

/// Pointer-over emphasis of one node marker.
///
/// Tracks which node is hovered and which one was hovered before, so the
/// newly hovered marker grows while the previous one shrinks back. Each
/// transition starts from wherever the marker was when the pointer moved,
/// so an interrupted grow reverses without a jump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HoverState {
    target: Option<usize>,
    previous: Option<usize>,
    since: FrameTime,
    /// Progress of `target` towards full emphasis at `since`.
    target_from: f64,
    /// Progress of `previous` at `since`.
    previous_from: f64,
}

/// Radius and stroke width of a node marker at some instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Emphasis {
    /// Marker radius.
    pub radius: f64,
    /// Marker outline width.
    pub stroke_width: f64,
}

impl Emphasis {
    /// Marker at rest.
    pub const REST_STROKE: f64 = 2.0;
    /// Marker under the pointer.
    pub const HOVER_STROKE: f64 = 3.0;

    fn lerp(from: Self, to: Self, t: f64) -> Self {
        Self {
            radius: from.radius + (to.radius - from.radius) * t,
            stroke_width: from.stroke_width + (to.stroke_width - from.stroke_width) * t,
        }
    }
}

impl HoverState {
    /// Nothing hovered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer moved onto `node`, or off every node with `None`.
    ///
    /// `transition_ms` is the time a full grow or shrink takes.
    pub fn set(&mut self, node: Option<usize>, now: FrameTime, transition_ms: u64) {
        if node == self.target {
            return;
        }
        let leaving = self.target.map_or(0.0, |n| self.progress(n, now, transition_ms));
        let entering = node.map_or(0.0, |n| self.progress(n, now, transition_ms));

        self.previous = self.target;
        self.previous_from = leaving;
        self.target = node;
        self.target_from = entering;
        self.since = now;
    }

    /// Currently hovered node.
    #[must_use]
    pub const fn target(&self) -> Option<usize> {
        self.target
    }

    /// How far `node` is towards full emphasis at `now`, in `[0, 1]`.
    ///
    /// Markers move at a constant rate of one full transition per
    /// `transition_ms`.
    #[must_use]
    pub fn progress(&self, node: usize, now: FrameTime, transition_ms: u64) -> f64 {
        let moved = linear_progress(now.millis_since(self.since), transition_ms);
        if self.target == Some(node) {
            (self.target_from + moved).min(1.0)
        } else if self.previous == Some(node) {
            (self.previous_from - moved).max(0.0)
        } else {
            0.0
        }
    }

    /// Emphasis of `node` at `now`.
    #[must_use]
    pub fn emphasis(
        &self,
        node: usize,
        now: FrameTime,
        rest_radius: f64,
        hover_radius: f64,
        transition_ms: u64,
    ) -> Emphasis {
        let rest = Emphasis {
            radius: rest_radius,
            stroke_width: Emphasis::REST_STROKE,
        };
        let hover = Emphasis {
            radius: hover_radius,
            stroke_width: Emphasis::HOVER_STROKE,
        };
        Emphasis::lerp(rest, hover, self.progress(node, now, transition_ms))
    }
}
