//! Flags shared by every `strata` subcommand.
//!
//! Flattened into [`super::Cli`] with `global = true`, so `strata plan -v`
//! and `strata -v plan` mean the same thing.

use clap::Args;
use std::path::PathBuf;

/// Verbosity, colour, config file and report format.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log level for the run. Repeat for more detail.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Log more (-v run summary, -vv each unit, -vvv parser)",
        long_help = "Raise the log level written to stderr:
    (none)  - warnings and errors
    -v      - one line per run (module, unit count)
    -vv     - one event per generator unit and reconcile outcome
    -vvv    - parser decisions and filesystem writes
RUST_LOG overrides all of these."
    )]
    pub verbose: u8,

    /// Print errors only; hides the per-file report and progress bar.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Only print errors"
    )]
    pub quiet: bool,

    /// Plain output without ANSI colour.
    ///
    /// Any non-empty `NO_COLOR` other than a falsey value (`0`, `false`,
    /// `no`, `off`) turns this on, per <https://no-color.org>.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new(),
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Tool configuration file; replaces the default location.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Read tool settings from FILE"
    )]
    pub config: Option<PathBuf>,

    /// How reports are printed. Overrides `output.format`.
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Report format for generate"
    )]
    pub output_format: OutputFormat,
}

/// Rendering of command reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `output.format` from config, else Human on a TTY and Plain when piped.
    #[default]
    Auto,
    /// Coloured status marks per artifact.
    Human,
    /// Same lines, no colour.
    Plain,
    /// One JSON document on stdout.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn no_color_flag_takes_no_value() {
        let cli = Cli::parse_from(["strata", "--no-color", "plan"]);
        assert!(cli.global.no_color);
    }

    #[test]
    fn output_format_flag_parses() {
        let cli = Cli::parse_from(["strata", "--output-format", "json", "generate"]);
        assert_eq!(cli.global.output_format, OutputFormat::Json);
    }
}
