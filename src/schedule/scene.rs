//! Schedule scene building: task chips, Gantt track, time axis, summary.

use crate::config::VizConfig;
use crate::scene::{fmt_num, Color, RenderCommand, Scene, TextAnchor};
use crate::snapshot::{Ordering, TaskData};

use super::layout::{ScheduleLayout, Segment};

/// Schedule surface width.
pub const SCHEDULE_WIDTH: f64 = 640.0;
/// Schedule surface height.
pub const SCHEDULE_HEIGHT: f64 = 300.0;

const MARGIN: f64 = 16.0;
const CHIP_Y: f64 = 44.0;
const CHIP_HEIGHT: f64 = 24.0;
const CHIP_GAP: f64 = 6.0;
const CHIP_MAX_WIDTH: f64 = 72.0;
const TRACK_Y: f64 = 110.0;
const BAR_HEIGHT: f64 = 36.0;
const AXIS_Y: f64 = 172.0;
const SUMMARY_Y: f64 = 210.0;
const CARD_HEIGHT: f64 = 56.0;
const TRACK_WIDTH: f64 = SCHEDULE_WIDTH - 2.0 * MARGIN;

/// What a schedule frame shows.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleFrame<'a> {
    pub ordering: &'a Ordering,
    pub tasks: Option<&'a TaskData>,
    /// History length.
    pub iterations: usize,
}

/// Paint the schedule.
#[must_use]
pub fn render_schedule(config: &VizConfig, frame: &ScheduleFrame<'_>) -> Scene {
    let layout = ScheduleLayout::compute(frame.ordering, frame.tasks, &config.schedule);
    let mut scene = Scene::new(SCHEDULE_WIDTH, SCHEDULE_HEIGHT);

    scene.text(
        MARGIN,
        24.0,
        format!("ITERATION: {}", frame.iterations),
        Color::SLATE,
        11.0,
    );

    chips(&mut scene, frame, &layout);
    for segment in layout.segments() {
        bar(&mut scene, &layout, segment);
    }
    axis(&mut scene, &layout, config.schedule.time_marker_interval);
    summary(&mut scene, &layout);
    scene
}

fn chips(scene: &mut Scene, frame: &ScheduleFrame<'_>, layout: &ScheduleLayout) {
    let n = frame.ordering.len();
    if n == 0 {
        return;
    }
    let slot = (TRACK_WIDTH / n as f64).min(CHIP_MAX_WIDTH + CHIP_GAP);
    let width = (slot - CHIP_GAP).max(1.0);

    for (position, &index) in frame.ordering.as_slice().iter().enumerate() {
        let x = MARGIN + slot * position as f64;
        let duration = layout
            .segments()
            .iter()
            .find(|s| s.index == index)
            .map_or_else(|| "n/a".to_string(), |s| fmt_num(s.duration));

        scene.push(RenderCommand::DrawRect {
            x,
            y: CHIP_Y,
            width,
            height: CHIP_HEIGHT,
            color: Color::PURPLE.with_alpha(60),
        });
        scene.text_anchored(
            x + width / 2.0,
            CHIP_Y + 16.0,
            format!("TASK_{index}"),
            Color::WHITE,
            9.0,
            TextAnchor::Middle,
        );
        scene.push(RenderCommand::Tooltip {
            x,
            y: CHIP_Y,
            width,
            height: CHIP_HEIGHT,
            lines: vec![format!("Duration: {duration} | Position: {}", position + 1)],
        });
    }
}

fn bar(scene: &mut Scene, layout: &ScheduleLayout, segment: &Segment) {
    let scale = layout.scale();
    let x = MARGIN + scale.percent(segment.start) / 100.0 * TRACK_WIDTH;
    let width = scale.percent(segment.duration) / 100.0 * TRACK_WIDTH;
    let color = if segment.is_late() {
        Color::LATE
    } else {
        Color::ON_TIME
    };

    scene.push(RenderCommand::DrawRect {
        x,
        y: TRACK_Y,
        width,
        height: BAR_HEIGHT,
        color,
    });
    let cx = x + width / 2.0;
    scene.text_anchored(
        cx,
        TRACK_Y + 16.0,
        format!("T{}", segment.index),
        Color::WHITE,
        10.0,
        TextAnchor::Middle,
    );
    scene.text_anchored(
        cx,
        TRACK_Y + 30.0,
        format!("{}u", fmt_num(segment.duration)),
        Color::WHITE,
        8.0,
        TextAnchor::Middle,
    );

    let mut lines = vec![
        format!("Task {}", segment.index),
        format!("Start: {}", fmt_num(segment.start)),
        format!("End: {}", fmt_num(segment.end)),
    ];
    if segment.is_late() {
        lines.push(format!("Tardiness: +{}", fmt_num(segment.tardiness)));
    }
    scene.push(RenderCommand::Tooltip {
        x,
        y: TRACK_Y,
        width,
        height: BAR_HEIGHT,
        lines,
    });
}

fn axis(scene: &mut Scene, layout: &ScheduleLayout, interval: f64) {
    for marker in layout.time_markers(interval) {
        let x = MARGIN + layout.scale().percent(marker) / 100.0 * TRACK_WIDTH;
        scene.push(RenderCommand::DrawRect {
            x,
            y: TRACK_Y + BAR_HEIGHT + 4.0,
            width: 1.0,
            height: 6.0,
            color: Color::SLATE,
        });
    }
    scene.text(MARGIN, AXIS_Y, "TIME 0", Color::SLATE, 9.0);
    scene.text_anchored(
        SCHEDULE_WIDTH - MARGIN,
        AXIS_Y,
        format!("TIME {}", fmt_num(layout.total_time())),
        Color::SLATE,
        9.0,
        TextAnchor::End,
    );
}

fn summary(scene: &mut Scene, layout: &ScheduleLayout) {
    let cards = [
        ("TOTAL TIME", fmt_num(layout.total_time()), Color::NODE),
        ("TASKS", layout.task_count().to_string(), Color::PURPLE),
        ("TARDINESS", layout.late_count().to_string(), Color::LATE),
    ];
    let gap = 12.0;
    let width = (TRACK_WIDTH - 2.0 * gap) / 3.0;

    for (i, (label, value, accent)) in cards.into_iter().enumerate() {
        let x = MARGIN + (width + gap) * i as f64;
        scene.push(RenderCommand::DrawRect {
            x,
            y: SUMMARY_Y,
            width,
            height: CARD_HEIGHT,
            color: accent.with_alpha(40),
        });
        scene.text_anchored(
            x + width / 2.0,
            SUMMARY_Y + 20.0,
            label,
            Color::SLATE,
            9.0,
            TextAnchor::Middle,
        );
        scene.text_anchored(
            x + width / 2.0,
            SUMMARY_Y + 44.0,
            value,
            accent,
            18.0,
            TextAnchor::Middle,
        );
    }
}

/// The "awaiting data" scene.
#[must_use]
pub fn render_placeholder() -> Scene {
    let mut scene = Scene::placeholder(SCHEDULE_WIDTH, SCHEDULE_HEIGHT);
    scene.text_anchored(
        SCHEDULE_WIDTH / 2.0,
        SCHEDULE_HEIGHT / 2.0 - 8.0,
        "AWAITING SCHEDULE",
        Color::PURPLE,
        16.0,
        TextAnchor::Middle,
    );
    scene.text_anchored(
        SCHEDULE_WIDTH / 2.0,
        SCHEDULE_HEIGHT / 2.0 + 14.0,
        "Run a scheduling optimization to see the timeline",
        Color::SLATE,
        10.0,
        TextAnchor::Middle,
    );
    scene
}
