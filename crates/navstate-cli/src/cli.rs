//! CLI argument definitions for the navigation state tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "navstate",
    version,
    about = "Navigation history and page-state restoration engine",
    long_about = "Replay navigation scripts against a session, resolve back targets,\n\
                  and inspect persisted navigation state."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Navigation config file (TOML). Defaults apply when omitted.
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a JSON navigation script and print the state after each step.
    Replay(ReplayArgs),

    /// Resolve the back target for a route.
    Resolve(ResolveArgs),

    /// Print the navigation state persisted in a session file.
    Inspect(InspectArgs),

    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Parser)]
pub struct ReplayArgs {
    /// JSON array of navigation steps.
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Session file to resume from and persist into.
    ///
    /// Without it the replay runs against in-memory storage.
    #[arg(long = "session", value_name = "FILE")]
    pub session: Option<PathBuf>,

    /// Location to start from (default: the session's last route, or the root path).
    #[arg(long = "start", value_name = "HREF")]
    pub start: Option<String>,
}

#[derive(Parser)]
pub struct ResolveArgs {
    /// Current route path.
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Source pointer tag (e.g. client-details).
    #[arg(long = "source", value_name = "TAG")]
    pub source: Option<String>,

    /// Source pointer entity id.
    #[arg(long = "source-id", value_name = "ID")]
    pub source_id: Option<String>,

    /// Routes visited before PATH, oldest first.
    #[arg(long = "history", value_name = "PATH", num_args = 1..)]
    pub history: Vec<String>,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Session file to read.
    #[arg(long = "session", value_name = "FILE")]
    pub session: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
