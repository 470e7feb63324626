//! Schedule visualization.
//!
//! The schedule is not animated: it always shows the latest state of the
//! run. That is the last history snapshot, or the best solution when there
//! is no history.

pub mod layout;
pub mod scene;

use crate::config::VizConfig;
use crate::scene::Scene;
use crate::snapshot::{BestSolution, History, Ordering, OrderingSource, TaskData};

pub use layout::{Scale, ScheduleLayout, Segment};
pub use scene::{render_placeholder, render_schedule, ScheduleFrame};

/// Ordering and task data picked from a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleInput {
    pub ordering: Ordering,
    pub tasks: Option<TaskData>,
}

/// Pick what to show from a run, or `None` when nothing is displayable.
#[must_use]
pub fn select_input(history: &History, best: Option<&BestSolution>) -> Option<ScheduleInput> {
    if let Some(last) = history.last() {
        let Some(ordering) = last.ordering() else {
            tracing::warn!(steps = history.len(), "last snapshot has no ordering");
            return None;
        };
        let tasks = last
            .task_data()
            .or_else(|| best.and_then(BestSolution::task_data));
        return Some(ScheduleInput { ordering, tasks });
    }
    let best = best?;
    Some(ScheduleInput {
        ordering: best.ordering()?,
        tasks: best.task_data(),
    })
}

/// Timeline for a run, if there is anything to lay out.
#[must_use]
pub fn layout_for(
    config: &VizConfig,
    history: &History,
    best: Option<&BestSolution>,
) -> Option<ScheduleLayout> {
    let input = select_input(history, best)?;
    Some(ScheduleLayout::compute(
        &input.ordering,
        input.tasks.as_ref(),
        &config.schedule,
    ))
}

/// Paint a run's schedule, or the placeholder when nothing is displayable.
#[must_use]
pub fn render(config: &VizConfig, history: &History, best: Option<&BestSolution>) -> Scene {
    match select_input(history, best) {
        Some(input) => render_schedule(
            config,
            &ScheduleFrame {
                ordering: &input.ordering,
                tasks: input.tasks.as_ref(),
                iterations: history.len(),
            },
        ),
        None => render_placeholder(),
    }
}
