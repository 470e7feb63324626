//! CLI command handlers.

use std::process::ExitCode;

use crate::config::VizConfig;
use crate::error::VizResult;
use crate::scene::Scene;
use crate::schedule;
use crate::tour::TourView;
use crate::trace::Trace;

use super::args::{Args, Command, RenderOptions};
use super::output::{encode_scene, print_help, print_version, write_output};

/// Exit code for a bad invocation.
const EXIT_USAGE: u8 = 2;

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    let result = match args.command {
        Command::Tour(opts) => render_tour(&opts).and_then(|scene| emit(&scene, &opts)),
        Command::Schedule(opts) => render_schedule(&opts).and_then(|scene| emit(&scene, &opts)),
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
        Command::Usage { message } => {
            eprintln!("Error: {message}\n");
            print_help();
            return ExitCode::from(EXIT_USAGE);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(if e.is_usage() { EXIT_USAGE } else { 1 })
        }
    }
}

/// Load the configuration named in `opts`, or the defaults.
///
/// # Errors
///
/// Returns error if the configuration file cannot be loaded.
pub fn load_config(opts: &RenderOptions) -> VizResult<VizConfig> {
    opts.config_path
        .as_ref()
        .map_or_else(|| Ok(VizConfig::default()), VizConfig::load)
}

/// Play a trace's tour to `--at-ms` (or to the end) and paint it.
///
/// # Errors
///
/// Returns error if the configuration or trace cannot be loaded.
pub fn render_tour(opts: &RenderOptions) -> VizResult<Scene> {
    let config = load_config(opts)?;
    let trace = Trace::load(&opts.trace_path)?;
    tracing::info!(
        trace = %opts.trace_path.display(),
        algorithm = trace.algorithm().unwrap_or("unknown"),
        steps = trace.history.len(),
        "rendering tour"
    );

    // Past the last step and the reveal that follows it.
    let settled_at = (trace.history.len() as u64)
        .saturating_mul(config.animation.step_interval_ms)
        .saturating_add(config.animation.reveal_duration_ms);
    let at = opts.at_ms.unwrap_or(settled_at);

    let mut view = TourView::new(config);
    view.load(trace.history, trace.best);
    view.advance_to(crate::animation::FrameTime::from_millis(at));

    tracing::info!(at_ms = at, state = ?view.state(), nodes = view.node_count(), "tour frame ready");
    Ok(view.render())
}

/// Paint a trace's schedule.
///
/// # Errors
///
/// Returns error if the configuration or trace cannot be loaded.
pub fn render_schedule(opts: &RenderOptions) -> VizResult<Scene> {
    let config = load_config(opts)?;
    let trace = Trace::load(&opts.trace_path)?;
    tracing::info!(
        trace = %opts.trace_path.display(),
        algorithm = trace.algorithm().unwrap_or("unknown"),
        steps = trace.history.len(),
        "rendering schedule"
    );
    if opts.at_ms.is_some() {
        tracing::debug!("--at-ms has no effect on the schedule scene");
    }
    Ok(schedule::render(&config, &trace.history, trace.best.as_ref()))
}

fn emit(scene: &Scene, opts: &RenderOptions) -> VizResult<()> {
    let encoded = encode_scene(scene, opts.format)?;
    write_output(&encoded, opts.out.as_deref())?;
    if let Some(path) = &opts.out {
        tracing::info!(out = %path.display(), commands = scene.len(), "scene written");
    }
    Ok(())
}
