//! CLI argument parsing.
//!
//! Hand-rolled so it can be driven from any iterator of strings in tests.
//! Parsing never fails: bad input becomes [`Command::Usage`], which the
//! command layer reports with a non-zero exit code.

use std::path::PathBuf;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Scene serialization format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Standalone SVG document.
    #[default]
    Svg,
    /// Render-command list as JSON.
    Json,
}

/// Options shared by the rendering commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Optimizer trace to render.
    pub trace_path: PathBuf,
    /// Clock position to render at; `None` renders the settled scene.
    pub at_ms: Option<u64>,
    /// YAML configuration file.
    pub config_path: Option<PathBuf>,
    pub format: OutputFormat,
    /// Output file; stdout when absent.
    pub out: Option<PathBuf>,
    pub verbose: bool,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Render the tour scene of a trace.
    Tour(RenderOptions),
    /// Render the schedule scene of a trace.
    Schedule(RenderOptions),
    /// Show help
    Help,
    /// Show version
    Version,
    /// The invocation could not be understood.
    Usage {
        /// What was wrong.
        message: String,
    },
}

impl Args {
    /// Parse command-line arguments from an iterator.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    /// Whether debug logging was requested.
    #[must_use]
    pub fn verbose(&self) -> bool {
        match &self.command {
            Command::Tour(opts) | Command::Schedule(opts) => opts.verbose,
            _ => false,
        }
    }

    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            return Self {
                command: Command::Help,
            };
        }

        let command = match args[1].as_str() {
            "tour" => Self::parse_render_options("tour", args).map_or_else(usage, Command::Tour),
            "schedule" => {
                Self::parse_render_options("schedule", args).map_or_else(usage, Command::Schedule)
            }
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => usage(format!("unknown command: {unknown}")),
        };

        Self { command }
    }

    fn parse_render_options(name: &str, args: &[String]) -> Result<RenderOptions, String> {
        let Some(trace) = args.get(2).filter(|a| !a.starts_with('-')) else {
            return Err(format!("'{name}' requires a trace file path"));
        };

        let mut opts = RenderOptions {
            trace_path: PathBuf::from(trace),
            ..RenderOptions::default()
        };

        let mut i = 3;
        while i < args.len() {
            match args[i].as_str() {
                "--at-ms" => {
                    let value = flag_value(args, i, "--at-ms")?;
                    let ms = value
                        .parse()
                        .map_err(|_| format!("--at-ms expects milliseconds, got '{value}'"))?;
                    opts.at_ms = Some(ms);
                    i += 2;
                }
                "--config" => {
                    opts.config_path = Some(PathBuf::from(flag_value(args, i, "--config")?));
                    i += 2;
                }
                "--out" | "-o" => {
                    opts.out = Some(PathBuf::from(flag_value(args, i, "--out")?));
                    i += 2;
                }
                "--json" => {
                    opts.format = OutputFormat::Json;
                    i += 1;
                }
                "--svg" => {
                    opts.format = OutputFormat::Svg;
                    i += 1;
                }
                "-v" | "--verbose" => {
                    opts.verbose = true;
                    i += 1;
                }
                other => return Err(format!("unexpected argument: {other}")),
            }
        }

        Ok(opts)
    }
}

fn usage(message: String) -> Command {
    Command::Usage { message }
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}
