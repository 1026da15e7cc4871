//! `strata plan`: show the generator units a run would execute.

use serde_json::json;

use strata_adapters::{MemoryFilesystem, manifest};
use strata_core::prelude::{GenerationService, GeneratorUnit};

use crate::{
    cli::{PlanArgs, PlanFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Execute `strata plan`. Nothing is written.
pub fn execute(args: PlanArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let manifest_path = super::manifest_path(args.manifest, &config);
    let project = manifest::load(&manifest_path)?;

    // Planning never touches the filesystem port.
    let service = GenerationService::new(Box::new(MemoryFilesystem::new()));
    let units = service.plan(&project)?;

    match args.format {
        PlanFormat::Table => {
            output.header(&format!("{} generator units:", units.len()))?;
            for line in table_lines(&units) {
                output.print(&line)?;
            }
        }
        PlanFormat::List => {
            for unit in &units {
                println!("{}", unit.path);
            }
        }
        PlanFormat::Json => {
            let doc: Vec<_> = units
                .iter()
                .map(|u| {
                    json!({
                        "unit": u.label(),
                        "kind": u.kind.as_str(),
                        "entity": u.entity.as_ref().map(|e| e.name.clone()),
                        "path": u.path.to_string(),
                    })
                })
                .collect();
            println!("{:#}", serde_json::Value::Array(doc));
        }
    }

    Ok(())
}

/// Labels padded to the widest one, followed by the path.
fn table_lines(units: &[GeneratorUnit]) -> Vec<String> {
    let labels: Vec<String> = units.iter().map(GeneratorUnit::label).collect();
    let width = labels.iter().map(String::len).max().unwrap_or(0);
    labels
        .iter()
        .zip(units)
        .map(|(label, unit)| format!("  {label:<width$}  {}", unit.path))
        .collect()
}
