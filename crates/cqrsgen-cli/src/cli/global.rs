//! Flags shared by every `cqrsgen` subcommand.
//!
//! Flattened into [`super::Cli`] with `global = true`, so
//! `cqrsgen scaffold invoice crud -vv` and `cqrsgen -vv scaffold invoice crud`
//! behave the same.

use clap::Args;
use clap::builder::FalseyValueParser;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Show what a scaffold run decides per artifact.
    ///
    /// `-v` logs the plan and the run summary, `-vv` every skip, write and
    /// merge, `-vvv` template rendering and filesystem probes.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Log scaffold decisions (-v plan, -vv per file, -vvv everything)",
        long_help = "Log what the scaffolder decides:
    (none)  - Warnings and errors only
    -v      - Plan built, run summary
    -vv     - Each created, skipped or merged file
    -vvv    - Template rendering and filesystem probes"
    )]
    pub verbose: u8,

    /// Print only errors; the per-file report is not shown.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Print errors only, no per-file report"
    )]
    pub quiet: bool,

    /// Plain report output.
    ///
    /// Any non-empty `NO_COLOR` other than `0`/`false`/`no`/`off` turns colour
    /// off (<https://no-color.org>).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        action = clap::ArgAction::SetTrue,
        value_parser = FalseyValueParser::new(),
        help = "Disable colored report output"
    )]
    pub no_color: bool,

    /// Settings file; defaults to the per-user `cqrsgen/config.toml`.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Settings file (domains root, defaults, templates)"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "How the scaffold report is printed"
    )]
    pub output_format: OutputFormat,

    /// Mirror logs into FILE, appended, never coloured.
    #[arg(
        long = "log-file",
        global = true,
        value_name = "FILE",
        help = "Mirror logs into a file"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "log-format",
        global = true,
        value_enum,
        default_value = "text",
        help = "Log line format for stderr and --log-file"
    )]
    pub log_format: LogFormat,
}

/// Rendering of the scaffold report and listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human when stdout is a terminal, plain otherwise.
    #[default]
    Auto,
    /// Coloured, one line per artifact.
    Human,
    /// One line per artifact, no colour.
    Plain,
    /// The report envelope as JSON.
    Json,
}

/// Rendering of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}
