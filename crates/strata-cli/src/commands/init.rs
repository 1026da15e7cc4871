//! `strata init`: write a starter manifest.

use tracing::{info, instrument};

use strata_adapters::STARTER_MANIFEST;

use crate::{
    cli::InitArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Create a starter `strata.toml` (or the path given with `--manifest`).
#[instrument(skip_all)]
pub fn execute(args: InitArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let path = super::manifest_path(args.manifest, &config);

    if path.exists() && !args.force {
        return Err(CliError::ManifestExists { path });
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }

    std::fs::write(&path, STARTER_MANIFEST)
        .with_cli_context(|| format!("Failed to write manifest to '{}'", path.display()))?;

    info!(path = %path.display(), "Manifest written");
    output.success(&format!("Manifest created at {}", path.display()))?;

    if !output.is_quiet() {
        output.print("")?;
        output.print("Next steps:")?;
        output.print("  # edit the module path and entities, then")?;
        output.print("  strata generate")?;
    }

    Ok(())
}
