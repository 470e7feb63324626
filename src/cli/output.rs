//! CLI output: help text, version, and scene emission.

use std::io::Write;
use std::path::Path;

use crate::error::VizResult;
use crate::scene::Scene;

use super::args::OutputFormat;

/// Print version information.
pub fn print_version() {
    match option_env!("GIT_HASH").filter(|h| !h.is_empty()) {
        Some(hash) => println!("optiviz {} ({hash})", env!("CARGO_PKG_VERSION")),
        None => println!("optiviz {}", env!("CARGO_PKG_VERSION")),
    }
}

/// Print help message.
pub fn print_help() {
    println!(
        r"optiviz - Optimization trace visualizer

USAGE:
    optiviz <COMMAND> [OPTIONS]

COMMANDS:
    tour <trace.json>           Render the tour of a routing trace
    schedule <trace.json>       Render the timeline of a scheduling trace
        --at-ms <N>             Render the animation at N milliseconds
                                (default: after playback has settled)
        --config <cfg.yaml>     Load visual and timing settings
        --json                  Emit render commands as JSON instead of SVG
        -o, --out <path>        Write to a file instead of stdout
        -v, --verbose           Enable debug logging

    help                        Show this help message
    version                     Show version information

EXAMPLES:
    optiviz tour runs/tabu.json > tabu.svg
    optiviz tour runs/tabu.json --at-ms 600 --json
    optiviz schedule runs/jobs.json --config viz.yaml -o jobs.svg

LOGGING:
    RUST_LOG controls log output (default: optiviz=info). Logs go to stderr.
"
    );
}

/// Serialize `scene` in `format`.
///
/// # Errors
///
/// Returns error if JSON serialization fails.
pub fn encode_scene(scene: &Scene, format: OutputFormat) -> VizResult<String> {
    Ok(match format {
        OutputFormat::Svg => scene.to_svg(),
        OutputFormat::Json => scene.to_json()?,
    })
}

/// Write an encoded scene to `out`, or stdout when `None`.
///
/// # Errors
///
/// Returns error if the destination cannot be written.
pub fn write_output(encoded: &str, out: Option<&Path>) -> VizResult<()> {
    match out {
        Some(path) => std::fs::write(path, encoded)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(encoded.as_bytes())?;
            if !encoded.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
        }
    }
    Ok(())
}
