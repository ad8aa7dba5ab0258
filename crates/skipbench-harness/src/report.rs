//! JSON export of a completed run.

use serde::Serialize;
use skipbench_core::{CONTRACT_VERSION, RunId, VariantTable};
use std::path::Path;

/// Top-level JSON document.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub metadata: ReportMetadata,
    pub tables: &'a [VariantTable],
}

#[derive(Debug, Serialize)]
pub struct ReportMetadata {
    /// Run directory name.
    pub run_id: String,
    /// Start time, RFC 3339.
    pub timestamp: String,
    pub platform: String,
    pub skipbench_version: String,
    /// Layout version of the engine contract the harness was built against.
    pub contract_version: u32,
    pub basedir: String,
}

impl<'a> RunReport<'a> {
    pub fn new(run: &RunId, basedir: &Path, tables: &'a [VariantTable]) -> Self {
        Self {
            metadata: ReportMetadata {
                run_id: run.to_string(),
                timestamp: run.started_at().to_rfc3339(),
                platform: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
                skipbench_version: env!("CARGO_PKG_VERSION").to_string(),
                contract_version: CONTRACT_VERSION,
                basedir: basedir.display().to_string(),
            },
            tables,
        }
    }
}

/// Export results to JSON file
pub fn export_json(
    run: &RunId,
    basedir: &Path,
    tables: &[VariantTable],
    path: &Path,
) -> anyhow::Result<()> {
    let report = RunReport::new(run, basedir, tables);
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(path, json)?;
    Ok(())
}
