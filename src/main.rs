//! optiviz CLI - optimization trace visualizer
//!
//! Renders tour and schedule scenes from optimizer trace files.

use std::process::ExitCode;

use optiviz::cli::{run_cli, Args};
use tracing_subscriber::EnvFilter;

/// `--verbose` wins over `RUST_LOG`; otherwise `RUST_LOG`, then info.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("optiviz=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("optiviz=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose());
    run_cli(args)
}
