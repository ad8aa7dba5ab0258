//! Benchmark suite configuration.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use skipbench_core::{
    BenchmarkDefinition, Delimiter, ImplementationVariant, KeyOverlap, KeyRange, OperationsMix,
    RunParameters, SelectionStrategy,
};
use std::path::{Path, PathBuf};

/// Thread counts swept by the built-in parallel definition.
pub const DEFAULT_THREADS: [u16; 7] = [1, 2, 4, 8, 10, 20, 64];

/// Repetitions per axis value in the built-in suite.
pub const DEFAULT_REPETITIONS: usize = 3;

/// Resolved configuration for one harness invocation.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Definitions to run, in order.
    pub definitions: Vec<BenchmarkDefinition>,
    /// Root under which `data/<run-id>/` is created.
    pub basedir: PathBuf,
    pub delimiter: Delimiter,
    /// Validate and print the plan without calling the engine.
    pub dry_run: bool,
    pub color: bool,
    pub json: Option<PathBuf>,
}

/// On-disk suite format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteFile {
    pub benchmarks: Vec<BenchmarkDefinition>,
}

/// Load a suite from a JSON file.
pub fn load_suite(path: &Path) -> Result<Vec<BenchmarkDefinition>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read suite file {}", path.display()))?;
    let suite: SuiteFile = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse suite file {}", path.display()))?;
    if suite.benchmarks.is_empty() {
        bail!("Suite file {} defines no benchmarks", path.display());
    }
    Ok(suite.benchmarks)
}

/// Parameter block shared by the built-in definitions.
pub fn default_parameters() -> RunParameters {
    RunParameters {
        duration_secs: 1,
        prefill: 1000,
        mix: OperationsMix {
            insert_probability: 0.1,
            contains_probability: 0.8,
        },
        strategy: SelectionStrategy::Unique,
        overlap: KeyOverlap::Common,
        seed: 12345,
        key_range: KeyRange { min: 0, max: 100_000 },
        levels: 4,
        level_probability: 0.5,
    }
}

/// Sequential baseline followed by the three concurrent variants.
pub fn default_suite() -> Vec<BenchmarkDefinition> {
    vec![
        BenchmarkDefinition::sequential("sequential", default_parameters(), DEFAULT_REPETITIONS),
        BenchmarkDefinition::parallel(
            "skiplists",
            DEFAULT_THREADS.to_vec(),
            vec![
                ImplementationVariant::Coarse,
                ImplementationVariant::Fine,
                ImplementationVariant::LockFree,
            ],
            default_parameters(),
            DEFAULT_REPETITIONS,
        ),
    ]
}

/// Keep only the named definitions, preserving suite order.
///
/// An empty `only` keeps everything. Unknown names are an error.
pub fn select(definitions: Vec<BenchmarkDefinition>, only: &[String]) -> Result<Vec<BenchmarkDefinition>> {
    if only.is_empty() {
        return Ok(definitions);
    }

    for name in only {
        if !definitions.iter().any(|d| &d.name == name) {
            let known: Vec<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
            bail!("Unknown benchmark: {name}. Available: {}", known.join(", "));
        }
    }

    Ok(definitions
        .into_iter()
        .filter(|d| only.contains(&d.name))
        .collect())
}
