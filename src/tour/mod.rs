//! Tour visualization.
//!
//! [`TourView`] ties the pieces together: the [`driver::AnimationDriver`]
//! picks the ordering on display, [`layout`] places the nodes, and
//! [`scene`] paints them.
//!
//! # Example
//!
//! ```rust
//! use optiviz::prelude::*;
//! use serde_json::json;
//!
//! let history: History = vec![
//!     Snapshot::new(json!({ "current_solution": [0, 1, 2, 3] })),
//!     Snapshot::new(json!({ "current_solution": [0, 2, 1, 3] })),
//! ]
//! .into();
//!
//! let mut view = TourView::new(VizConfig::default());
//! view.load(history, None);
//! view.advance_by(400);
//! assert_eq!(view.state(), DriverState::Settled);
//! assert!(view.render().has_text("SOLUTION READY"));
//! ```

pub mod driver;
pub mod layout;
pub mod scene;

use crate::animation::{FrameTime, HoverState};
use crate::config::VizConfig;
use crate::scene::Scene;
use crate::snapshot::{BestSolution, History, Ordering, OrderingSource};

pub use driver::{AnimationDriver, DriverEvent, DriverEventKind, DriverState, RunId};
pub use layout::{Circle, Point, TourLayout, TourLayoutCache};
pub use scene::{render_placeholder, render_tour, TourFrame};

/// Nodes laid out when the first snapshot carries no ordering.
pub const DEFAULT_NODE_COUNT: usize = 6;

/// Node count implied by a run's data.
///
/// The first snapshot decides; if it has no ordering the default circle is
/// used. Without history the best solution decides.
#[must_use]
pub fn node_count(history: &History, best: Option<&BestSolution>) -> usize {
    if let Some(first) = history.first() {
        return first.ordering().map_or(DEFAULT_NODE_COUNT, |o| o.len());
    }
    best.and_then(OrderingSource::ordering).map_or(0, |o| o.len())
}

/// Animated, interactive tour display.
#[derive(Debug, Clone)]
pub struct TourView {
    config: VizConfig,
    driver: AnimationDriver,
    layouts: TourLayoutCache,
    hover: HoverState,
    nodes: usize,
}

impl TourView {
    /// Idle view.
    #[must_use]
    pub fn new(config: VizConfig) -> Self {
        let driver = AnimationDriver::new(&config.animation);
        let layouts = TourLayoutCache::new(Circle::from_config(&config.tour));
        Self {
            config,
            driver,
            layouts,
            hover: HoverState::new(),
            nodes: 0,
        }
    }

    /// Hand the view a run's data.
    ///
    /// A history different from the current one restarts playback; the
    /// same history with a new best only updates the best.
    pub fn load(&mut self, history: History, best: Option<BestSolution>) {
        let same = self.driver.state() != DriverState::Idle
            && !history.is_empty()
            && history.same_run(self.driver.history());
        if same {
            self.driver.set_best(best);
            if self.nodes == 0 {
                self.nodes = node_count(self.driver.history(), self.driver.best());
            }
            return;
        }
        self.nodes = node_count(&history, best.as_ref());
        self.driver.start(history, best);
    }

    /// Replace the best solution without restarting playback.
    pub fn set_best(&mut self, best: Option<BestSolution>) {
        if self.driver.history().is_empty() {
            self.nodes = node_count(self.driver.history(), best.as_ref());
        }
        self.driver.set_best(best);
    }

    /// Tear down: stop playback and return to the placeholder.
    pub fn cancel(&mut self) {
        self.driver.cancel();
        self.hover = HoverState::new();
        self.nodes = 0;
    }

    /// Advance the clock to `now`.
    pub fn advance_to(&mut self, now: FrameTime) -> Vec<DriverEvent> {
        self.driver.advance_to(now)
    }

    /// Advance the clock by `millis`.
    pub fn advance_by(&mut self, millis: u64) -> Vec<DriverEvent> {
        self.driver.advance_by(millis)
    }

    /// Pointer moved onto `node`, or off every node with `None`.
    pub fn hover(&mut self, node: Option<usize>) {
        let node = node.filter(|n| *n < self.nodes);
        self.hover
            .set(node, self.driver.now(), self.config.animation.hover_transition_ms);
    }

    /// Paint the current frame.
    #[must_use]
    pub fn render(&mut self) -> Scene {
        if self.driver.state() == DriverState::Idle || self.nodes == 0 {
            return render_placeholder();
        }
        let layout = self.layouts.get(self.nodes);
        let frame = TourFrame {
            layout,
            ordering: self.driver.current_ordering(),
            hover: &self.hover,
            now: self.driver.now(),
            reveal_started: self.driver.ordering_changed_at(),
            iterations: self.driver.history().len(),
            cost: self.driver.best().and_then(BestSolution::cost),
            animating: self.driver.is_animating(),
        };
        render_tour(&self.config, &frame)
    }

    /// Whether the next [`render`](Self::render) shows the placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.driver.state() == DriverState::Idle || self.nodes == 0
    }

    /// Ordering on display.
    #[must_use]
    pub const fn current_ordering(&self) -> Option<&Ordering> {
        self.driver.current_ordering()
    }

    /// Playback state.
    #[must_use]
    pub const fn state(&self) -> DriverState {
        self.driver.state()
    }

    /// Number of nodes laid out.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.nodes
    }

    /// Number of live timers: 0 or 1.
    #[must_use]
    pub const fn live_timers(&self) -> usize {
        self.driver.live_timers()
    }

    /// The underlying driver.
    #[must_use]
    pub const fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &VizConfig {
        &self.config
    }
}
