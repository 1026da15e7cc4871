//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "strata",
    bin_name = "strata",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Layered Go service scaffolding that never clobbers your edits",
    long_about = "Strata generates the layers of a Go backend service (models, \
                  repositories, use cases, interceptors, events, tracing) from a \
                  project manifest. Files that already exist and still parse are \
                  left exactly as they are.",
    after_help = "EXAMPLES:\n\
        \x20 strata init\n\
        \x20 strata plan --format list\n\
        \x20 strata generate --output ./svc\n\
        \x20 strata completions bash > /usr/share/bash-completion/completions/strata",
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
    /// Generate (or top up) the project described by a manifest.
    #[command(
        visible_alias = "gen",
        about = "Generate project files",
        after_help = "EXAMPLES:\n\
            \x20 strata generate\n\
            \x20 strata generate --manifest api.toml --output ./api"
    )]
    Generate(GenerateArgs),

    /// Show the generator units a run would execute.
    #[command(
        about = "List generator units without writing",
        after_help = "EXAMPLES:\n\
            \x20 strata plan\n\
            \x20 strata plan --format json"
    )]
    Plan(PlanArgs),

    /// Write a starter manifest.
    #[command(
        about = "Create a starter strata.toml",
        after_help = "EXAMPLES:\n\
            \x20 strata init\n\
            \x20 strata init --manifest api.toml --force"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 strata completions bash > ~/.local/share/bash-completion/completions/strata\n\
            \x20 strata completions zsh  > ~/.zfunc/_strata\n\
            \x20 strata completions fish > ~/.config/fish/completions/strata.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Strata configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 strata config get defaults.output_dir\n\
            \x20 strata config list\n\
            \x20 strata config path"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `strata generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Project manifest (defaults to `defaults.manifest`).
    #[arg(
        short = 'm',
        long = "manifest",
        value_name = "FILE",
        help = "Project manifest (TOML or JSON)"
    )]
    pub manifest: Option<PathBuf>,

    /// Output root (defaults to `defaults.output_dir`).
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Directory to generate into"
    )]
    pub output: Option<PathBuf>,
}

// ── plan ──────────────────────────────────────────────────────────────────────

/// Arguments for `strata plan`.
#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Project manifest (defaults to `defaults.manifest`).
    #[arg(
        short = 'm',
        long = "manifest",
        value_name = "FILE",
        help = "Project manifest (TOML or JSON)"
    )]
    pub manifest: Option<PathBuf>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: PlanFormat,
}

/// Output format for the `plan` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    /// Unit labels aligned with their paths.
    Table,
    /// One path per line.
    List,
    /// JSON array.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `strata init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Where to write the manifest (defaults to `defaults.manifest`).
    #[arg(
        short = 'm',
        long = "manifest",
        value_name = "FILE",
        help = "Manifest path to create"
    )]
    pub manifest: Option<PathBuf>,

    /// Overwrite an existing manifest.
    #[arg(short = 'f', long = "force", help = "Overwrite an existing manifest")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `strata completions`.
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

/// Subcommands for `strata config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.manifest`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
