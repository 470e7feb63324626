//! CLI module for optiviz.
//!
//! All CLI logic lives here rather than in main.rs so it can be tested.
//! The entry point `run_cli` is called from main.rs with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, Command, OutputFormat, RenderOptions};
pub use commands::{load_config, render_schedule, render_tour, run_cli};
pub use output::{encode_scene, print_help, print_version, write_output};
