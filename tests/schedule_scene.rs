//! End-to-end schedule layout and rendering through the public API.

use optiviz::prelude::*;
use optiviz::scene::RenderCommand;
use optiviz::schedule;
use serde_json::json;

fn run(snapshot: serde_json::Value) -> History {
    vec![Snapshot::new(snapshot)].into()
}

fn tooltip_lines(scene: &Scene) -> Vec<Vec<String>> {
    scene
        .commands
        .iter()
        .filter_map(|c| match c {
            RenderCommand::Tooltip { lines, .. } => Some(lines.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_reference_segments() {
    let history = run(json!({ "current_solution": [0, 1, 2, 3], "durations": [3, 1, 4, 1] }));
    let layout = schedule::layout_for(&VizConfig::default(), &history, None).unwrap();

    let spans: Vec<(f64, f64)> = layout.segments().iter().map(|s| (s.start, s.end)).collect();
    assert_eq!(spans, vec![(0.0, 3.0), (3.0, 4.0), (4.0, 8.0), (8.0, 9.0)]);
    assert!((layout.total_time() - 9.0).abs() < 1e-12);
    assert_eq!(layout.scale(), Scale::Proportional(100.0 / 9.0));
}

#[test]
fn test_tardiness_scenario() {
    let history = run(json!({
        "current_solution": [0, 1],
        "durations": [5, 5],
        "due_dates": [4, 100]
    }));
    let config = VizConfig::default();
    let layout = schedule::layout_for(&config, &history, None).unwrap();
    assert!((layout.segments()[0].tardiness - 1.0).abs() < 1e-12);
    assert!(layout.segments()[1].tardiness.abs() < 1e-12);
    assert_eq!(layout.late_count(), 1);

    let scene = schedule::render(&config, &history, None);
    let texts: Vec<&str> = scene.texts().collect();
    let at = texts.iter().position(|t| *t == "TARDINESS").unwrap();
    assert_eq!(texts[at + 1], "1");
    let at = texts.iter().position(|t| *t == "TOTAL TIME").unwrap();
    assert_eq!(texts[at + 1], "10");
    let at = texts.iter().position(|t| *t == "TASKS").unwrap();
    assert_eq!(texts[at + 1], "2");

    let tips = tooltip_lines(&scene);
    assert!(tips.iter().any(|l| l.last().is_some_and(|t| t == "Tardiness: +1")));
}

#[test]
fn test_due_date_policy_is_configurable() {
    let history = run(json!({ "current_solution": [0, 1], "durations": [2, 2] }));

    let zero = VizConfig::default();
    assert_eq!(schedule::layout_for(&zero, &history, None).unwrap().late_count(), 2);

    let lenient = VizConfig::builder()
        .due_date_policy(DueDatePolicy::NoDueDateNoTardiness)
        .build();
    assert_eq!(schedule::layout_for(&lenient, &history, None).unwrap().late_count(), 0);
}

#[test]
fn test_zero_total_time_is_degenerate() {
    let history = run(json!({ "current_solution": [0], "durations": [0] }));
    let config = VizConfig::default();
    let layout = schedule::layout_for(&config, &history, None).unwrap();
    assert!(layout.scale().is_degenerate());

    let svg = schedule::render(&config, &history, None).to_svg();
    assert!(!svg.contains("NaN"));
    assert!(!svg.contains("inf"));

    let empty = run(json!({ "current_solution": [], "durations": [] }));
    let layout = schedule::layout_for(&config, &empty, None).unwrap();
    assert!(layout.scale().is_degenerate());
    assert_eq!(layout.task_count(), 0);
}

#[test]
fn test_empty_history_without_best_is_placeholder() {
    let scene = schedule::render(&VizConfig::default(), &History::empty(), None);
    assert!(scene.placeholder);
    assert!(scene.has_text("AWAITING SCHEDULE"));
}

#[test]
fn test_trace_file_round_trip() {
    let trace = Trace::from_json(
        &json!({
            "best_solution": [2, 0, 1],
            "best_cost": 4.0,
            "history": [
                { "iter": 0, "current_solution": [0, 1, 2], "durations": { "durations": [2, 3, 1], "due": [2, 4, 9] } },
                { "iter": 1, "current_solution": [2, 0, 1], "durations": { "durations": [2, 3, 1], "due": [2, 4, 9] } }
            ],
            "metadata": { "algorithm": "schedule_tabu" }
        })
        .to_string(),
    )
    .unwrap();
    assert_eq!(trace.algorithm(), Some("schedule_tabu"));

    let scene = schedule::render(&VizConfig::default(), &trace.history, trace.best.as_ref());
    assert!(scene.has_text("ITERATION: 2"));
    // last snapshot: task 2 [0,1], task 0 [1,3] late by 1, task 1 [3,6] late by 2
    assert!(scene.has_text("TIME 6"));
    let chips: Vec<&str> = scene.texts().filter(|t| t.starts_with("TASK_")).collect();
    assert_eq!(chips, vec!["TASK_2", "TASK_0", "TASK_1"]);
}
