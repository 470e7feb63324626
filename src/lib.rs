//! # optiviz
//!
//! Animated visualization of combinatorial-optimization traces.
//!
//! An external optimizer (tabu search, simulated annealing, genetic search,
//! scheduling heuristics) records a history of solution snapshots. optiviz
//! turns that history into scenes:
//! - **Tour**: nodes on a circle, the closed tour through the displayed
//!   ordering, revealed along its true perimeter, stepped through the
//!   history on a fixed cadence and settled on the best solution
//! - **Schedule**: task chips and a proportionally scaled single-machine
//!   timeline, colored by tardiness
//!
//! Scenes are platform-agnostic command lists that serialize to SVG or
//! JSON. Malformed or incomplete input never fails a render; it degrades to
//! a placeholder scene.
//!
//! ## Example
//!
//! ```rust
//! use optiviz::prelude::*;
//! use serde_json::json;
//!
//! let trace = Trace::from_json(&json!({
//!     "best_solution": [0, 2, 1, 3],
//!     "best_cost": 812.5,
//!     "history": [{ "current_solution": [0, 1, 2, 3] }]
//! }).to_string()).unwrap();
//!
//! let config = VizConfig::builder().step_interval_ms(100).build();
//! let mut view = TourView::new(config);
//! view.load(trace.history, trace.best);
//! view.advance_to(FrameTime::from_millis(100));
//!
//! let svg = view.render().to_svg();
//! assert!(svg.contains("SOLUTION READY"));
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,
    clippy::missing_const_for_fn,
)]

pub mod animation;
pub mod cli;
pub mod config;
pub mod error;
pub mod scene;
pub mod schedule;
pub mod snapshot;
pub mod tour;
pub mod trace;

#[cfg(feature = "wasm")]
pub mod wasm;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::animation::{FrameTime, HoverState, StrokeReveal, TimerSlot};
    pub use crate::config::{DueDatePolicy, VizConfig, VizConfigBuilder};
    pub use crate::error::{VizError, VizResult};
    pub use crate::scene::{Color, RenderCommand, Scene};
    pub use crate::schedule::{Scale, ScheduleLayout, Segment};
    pub use crate::snapshot::{
        normalize, BestSolution, History, Ordering, OrderingSource, Snapshot, TaskData,
    };
    pub use crate::tour::{AnimationDriver, DriverState, TourLayout, TourView};
    pub use crate::trace::Trace;
}

/// Re-export for public API
pub use error::{VizError, VizResult};
