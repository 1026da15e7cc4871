//! Subcommand handlers.
//!
//! Each module translates parsed arguments into calls on `strata-core` and
//! renders the result. No business logic lives here.

pub mod completions;
pub mod config;
pub mod generate;
pub mod init;
pub mod plan;

use std::path::PathBuf;

use crate::config::AppConfig;

/// Explicit `--manifest`, or the configured default.
pub(crate) fn manifest_path(explicit: Option<PathBuf>, config: &AppConfig) -> PathBuf {
    explicit.unwrap_or_else(|| config.defaults.manifest.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_manifest_wins() {
        let cfg = AppConfig::default();
        let path = manifest_path(Some(PathBuf::from("api.json")), &cfg);
        assert_eq!(path, PathBuf::from("api.json"));
    }

    #[test]
    fn falls_back_to_configured_manifest() {
        let cfg = AppConfig::default();
        assert_eq!(manifest_path(None, &cfg), PathBuf::from("strata.toml"));
    }
}
