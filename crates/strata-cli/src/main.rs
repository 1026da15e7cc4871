//! `strata`: lay out a Go service from a project manifest.
//!
//! `strata generate` reads `strata.toml`, plans one generator unit per
//! artifact (shared layout first, then each entity, then every enabled
//! feature family) and writes the results under the output root. A file
//! that already exists and still parses is left exactly as it is, so the
//! command can be re-run after editing the manifest or the generated code.
//!
//! Reports go to stdout; logs and errors go to stderr.
//!
//! | Exit | Cause                                             |
//! |------|---------------------------------------------------|
//! |  0   | Done                                              |
//! |  1   | A write failed or a generator unit broke          |
//! |  2   | Bad arguments or an invalid project description   |
//! |  3   | Manifest not found                                |
//! |  4   | Unreadable manifest or tool configuration         |

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // STRATA_* and RUST_LOG may come from a `.env` next to the manifest.
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version arrive as errors that belong on stdout.
        Err(e) if !e.use_stderr() => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}", e.render().ansi());
            return ExitCode::from(2);
        }
    };

    if let Err(e) = init_logging(&cli.global) {
        eprintln!("strata: {e}");
        return ExitCode::from(1);
    }

    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load tool configuration: {e:#}");
            return ExitCode::from(4);
        }
    };
    debug!(
        command = ?cli.command,
        manifest = %config.defaults.manifest.display(),
        output_dir = %config.defaults.output_dir.display(),
        "Starting"
    );

    let output = OutputManager::new(&cli.global, &config);
    let verbose = cli.global.verbose > 0;

    match dispatch(cli.command, config, output) {
        Ok(()) => {
            info!("Finished");
            ExitCode::SUCCESS
        }
        Err(e) => report(e, verbose),
    }
}

#[instrument(skip_all)]
fn dispatch(command: Commands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match command {
        Commands::Generate(args) => commands::generate::execute(args, config, output),
        Commands::Plan(args) => commands::plan::execute(args, config, output),
        Commands::Init(args) => commands::init::execute(args, config, output),
        Commands::Completions(args) => commands::completions::execute(args),
        Commands::Config(cmd) => commands::config::execute(cmd, config, output),
    }
}

/// Log the failure, print it with its suggestions on stderr, and map it to
/// the exit code in the table above.
fn report(err: CliError, verbose: bool) -> ExitCode {
    err.log();

    let text = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{text}");

    ExitCode::from(err.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn version_comes_from_the_package() {
        assert_eq!(Cli::command().get_version(), Some(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn every_subcommand_is_registered() {
        let cmd = Cli::command();
        for name in ["generate", "plan", "init", "config", "completions"] {
            assert!(cmd.find_subcommand(name).is_some(), "{name}");
        }
    }
}
