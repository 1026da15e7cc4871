//! `strata generate`: load a manifest and reconcile every artifact on disk.

use serde_json::json;
use tracing::{info, instrument};

use strata_adapters::{LocalFilesystem, manifest};
use strata_core::prelude::{GenerationReport, GenerationService, ReconcileOutcome};

use crate::{
    cli::{GenerateArgs, OutputFormat},
    config::AppConfig,
    error::CliResult,
    output::{OutputManager, ProgressReporter},
};

/// Execute `strata generate`.
///
/// 1. Resolve manifest and output root (flags, then config defaults)
/// 2. Load and validate the manifest
/// 3. Run every generator unit against the local filesystem
/// 4. Report one line per artifact plus a summary
#[instrument(skip_all)]
pub fn execute(args: GenerateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let manifest_path = super::manifest_path(args.manifest, &config);
    let root = args
        .output
        .unwrap_or_else(|| config.defaults.output_dir.clone());

    let project = manifest::load(&manifest_path)?;
    info!(
        manifest = %manifest_path.display(),
        module = project.module(),
        entities = project.entities().len(),
        "Manifest loaded"
    );

    let service = GenerationService::new(Box::new(LocalFilesystem::new()));
    let mut progress = ProgressReporter::new(&output);
    let result = service.run_with_progress(&project, &root, &mut progress);
    progress.finish();
    let report = result?;

    render(&report, &output)
}

fn render(report: &GenerationReport, output: &OutputManager) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        let records: Vec<_> = report
            .records
            .iter()
            .map(|r| {
                json!({
                    "unit": r.unit,
                    "kind": r.kind.as_str(),
                    "path": r.path.to_string(),
                    "outcome": r.outcome.as_str(),
                })
            })
            .collect();
        let doc = json!({
            "root": report.root.display().to_string(),
            "artifacts": records,
        });
        println!("{doc:#}");
        return Ok(());
    }

    for record in &report.records {
        let line = format!("{:<12} {}", record.outcome.as_str(), record.path);
        match record.outcome {
            ReconcileOutcome::Created => output.success(&line)?,
            ReconcileOutcome::Regenerated => output.warning(&line)?,
            ReconcileOutcome::Preserved => output.print(&format!("  {line}"))?,
        }
    }

    output.print("")?;
    output.header(&summary(report))?;
    Ok(())
}

fn summary(report: &GenerationReport) -> String {
    format!(
        "{} artifacts in {}: {} created, {} regenerated, {} preserved",
        report.len(),
        report.root.display(),
        report.count(ReconcileOutcome::Created),
        report.count(ReconcileOutcome::Regenerated),
        report.count(ReconcileOutcome::Preserved),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn summary_of_empty_report() {
        let report = GenerationReport {
            root: PathBuf::from("out"),
            records: Vec::new(),
        };
        assert_eq!(
            summary(&report),
            "0 artifacts in out: 0 created, 0 regenerated, 0 preserved"
        );
    }
}
