//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use cqrsgen_core::domain::{CommandOp, GenerationMode};

pub mod global;
pub use global::{GlobalArgs, LogFormat, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "cqrsgen",
    bin_name = "cqrsgen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Idempotent CQRS domain scaffolding",
    long_about = "cqrsgen generates commands, queries, events, handlers, sagas \
                  and module wiring for a CQRS domain. Re-running it never \
                  overwrites a file; registration lists are merged in place.",
    after_help = "EXAMPLES:\n\
        \x20 cqrsgen scaffold invoice crud\n\
        \x20 cqrsgen scaffold invoice create --right invoice.write\n\
        \x20 cqrsgen scaffold invoice saga --saga-step reserve:compensate --saga-step notify\n\
        \x20 cqrsgen completions bash > /usr/share/bash-completion/completions/cqrsgen",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate artifacts for a domain.
    #[command(
        visible_alias = "s",
        alias = "generate",
        about = "Scaffold CQRS artifacts for a domain",
        after_help = "EXAMPLES:\n\
            \x20 cqrsgen scaffold invoice crud\n\
            \x20 cqrsgen scaffold invoice query --dry-run\n\
            \x20 cqrsgen scaffold                # interactive"
    )]
    Scaffold(ScaffoldArgs),

    /// List artifact templates.
    #[command(
        visible_alias = "ls",
        about = "List artifact templates",
        after_help = "EXAMPLES:\n\
            \x20 cqrsgen list\n\
            \x20 cqrsgen list --format json"
    )]
    List(ListArgs),

    /// Initialise a cqrsgen configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 cqrsgen init           # default location\n\
            \x20 cqrsgen init --force   # overwrite"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 cqrsgen completions bash > ~/.local/share/bash-completion/completions/cqrsgen\n\
            \x20 cqrsgen completions zsh  > ~/.zfunc/_cqrsgen\n\
            \x20 cqrsgen completions fish > ~/.config/fish/completions/cqrsgen.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the cqrsgen configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 cqrsgen config get layout.domains_dir\n\
            \x20 cqrsgen config set defaults.security_right admin\n\
            \x20 cqrsgen config list"
    )]
    Config(ConfigCommands),
}

// ── scaffold ──────────────────────────────────────────────────────────────────

/// Arguments for `cqrsgen scaffold`.
#[derive(Debug, Args)]
pub struct ScaffoldArgs {
    /// Domain name, e.g. `invoice` or `purchaseOrder`.
    #[arg(value_name = "DOMAIN", help = "Domain name (prompted when omitted)")]
    pub domain: Option<String>,

    /// What to generate.
    #[arg(
        value_name = "TYPE",
        value_enum,
        requires = "domain",
        help = "Generation type (prompted when omitted)"
    )]
    pub kind: Option<ScaffoldType>,

    /// Security right guarding generated handlers.
    #[arg(long = "right", value_name = "RIGHT", help = "Security right for handlers")]
    pub right: Option<String>,

    /// Entity type tag used by query handlers.
    #[arg(long = "entity-type", value_name = "TAG", help = "Entity type tag")]
    pub entity_type: Option<String>,

    /// Repository injection token.
    #[arg(
        long = "repository-token",
        value_name = "TOKEN",
        help = "Repository injection token"
    )]
    pub repository_token: Option<String>,

    /// Saga step, optionally with a compensation handler.
    #[arg(
        long = "saga-step",
        value_name = "NAME[:compensate]",
        help = "Saga step (repeatable)"
    )]
    pub saga_steps: Vec<String>,

    /// Service injected into command handlers.
    #[arg(long = "service", value_name = "NAME", help = "Service dependency (repeatable)")]
    pub services: Vec<String>,

    /// Domains root directory.
    #[arg(long = "root", value_name = "DIR", help = "Domains root directory")]
    pub root: Option<PathBuf>,

    /// Parent module file, relative to the domains root.
    #[arg(
        long = "parent-module",
        value_name = "FILE",
        help = "Parent module file relative to the root"
    )]
    pub parent_module: Option<String>,

    /// Directory of `<kind>.tmpl` override files.
    #[arg(
        long = "templates",
        value_name = "DIR",
        env = "CQRSGEN_TEMPLATES_DIR",
        help = "Template override directory"
    )]
    pub templates: Option<PathBuf>,

    /// Show the plan without writing any files.
    #[arg(long = "dry-run", help = "Show what would be generated without writing")]
    pub dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation")]
    pub yes: bool,
}

/// Generation types accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ScaffoldType {
    /// Everything for a domain.
    Crud,
    Create,
    Update,
    Delete,
    Query,
    Event,
    Saga,
}

impl ScaffoldType {
    pub const ALL: [ScaffoldType; 7] = [
        Self::Crud,
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::Query,
        Self::Event,
        Self::Saga,
    ];
}

impl From<ScaffoldType> for GenerationMode {
    fn from(t: ScaffoldType) -> Self {
        match t {
            ScaffoldType::Crud => GenerationMode::Crud,
            ScaffoldType::Create => GenerationMode::SingleCommand(CommandOp::Create),
            ScaffoldType::Update => GenerationMode::SingleCommand(CommandOp::Update),
            ScaffoldType::Delete => GenerationMode::SingleCommand(CommandOp::Delete),
            ScaffoldType::Query => GenerationMode::SingleQuery,
            ScaffoldType::Event => GenerationMode::SingleEvent,
            ScaffoldType::Saga => GenerationMode::Saga,
        }
    }
}

impl std::fmt::Display for ScaffoldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(GenerationMode::from(*self).as_str())
    }
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `cqrsgen list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Include overrides from this directory in the listing.
    #[arg(
        long = "templates",
        value_name = "DIR",
        env = "CQRSGEN_TEMPLATES_DIR",
        help = "Template override directory"
    )]
    pub templates: Option<PathBuf>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One kind per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `cqrsgen init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `cqrsgen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `cqrsgen config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `layout.domains_dir`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
