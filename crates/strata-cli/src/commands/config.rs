//! `strata config`: show the settings that steer `generate` and `plan`.
//!
//! Read-only. Edit the file printed by `strata config path`, or export
//! `STRATA_*` variables, to change a value.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Every key `config get` understands.
const KEYS: [&str; 4] = [
    "defaults.manifest",
    "defaults.output_dir",
    "output.no_color",
    "output.format",
];

pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = lookup(&config, &key).ok_or_else(|| unknown_key(&key))?;
            output.print(&format!("{key} = {value:?}"))?;
        }
        ConfigCommands::List => {
            // Printed as TOML so it can be pasted into the config file as is.
            let document = toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                message: format!("Cannot render settings as TOML: {e}"),
                source: Some(Box::new(e)),
            })?;
            output.header(&format!("# {}", AppConfig::config_path().display()))?;
            output.print(document.trim_end())?;
        }
        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
    }
    Ok(())
}

fn lookup(config: &AppConfig, key: &str) -> Option<String> {
    let value = match key {
        "defaults.manifest" => config.defaults.manifest.display().to_string(),
        "defaults.output_dir" => config.defaults.output_dir.display().to_string(),
        "output.no_color" => config.output.no_color.to_string(),
        "output.format" => config.output.format.clone(),
        _ => return None,
    };
    Some(value)
}

fn unknown_key(key: &str) -> CliError {
    CliError::ConfigError {
        message: format!("Unknown config key: '{key}' (known: {})", KEYS.join(", ")),
        source: None,
    }
}
