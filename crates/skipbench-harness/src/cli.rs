//! Command-line interface for the sweep harness.

use crate::config::{HarnessConfig, default_suite, load_suite, select};
use anyhow::{Result, bail};
use clap::Parser;
use skipbench_core::Delimiter;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Thread-count sweep harness for concurrent skip list engines.
///
/// Runs each benchmark definition against the native engine, averages the
/// repetitions at every thread count, and writes one data table per
/// implementation variant under `<BASEDIR>/data/<run-id>/`.
#[derive(Parser, Debug)]
#[command(name = "skipbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON suite file (`{ "benchmarks": [...] }`).
    ///
    /// Without it the built-in suite runs: a sequential baseline and the
    /// COARSE, FINE and LOCK_FREE variants over 1-64 threads.
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory under which `data/` is created.
    #[arg(short = 'b', long, default_value = ".", env = "SKIPBENCH_BASEDIR")]
    pub basedir: PathBuf,

    /// Column separator of the data files.
    ///
    /// Valid values: space, comma
    #[arg(short = 'd', long, default_value = "space")]
    pub delimiter: Delimiter,

    /// Run only the named benchmark(s).
    ///
    /// Can be specified multiple times.
    #[arg(short = 'o', long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    /// Export results to JSON file.
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Validate the suite and print the sweep plan without running anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Verbose output.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the suite and output settings.
    pub fn into_config(self) -> Result<HarnessConfig> {
        let definitions = match &self.config {
            Some(path) => load_suite(path)?,
            None => default_suite(),
        };
        let definitions = select(definitions, &self.only)?;
        if definitions.is_empty() {
            bail!("No benchmarks selected");
        }

        if self.basedir.exists() && !self.basedir.is_dir() {
            bail!("Base directory {} is not a directory", self.basedir.display());
        }

        let missing_parent = self
            .json
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty() && !p.is_dir());
        if let Some(parent) = missing_parent {
            bail!("Invalid --json path: directory {} does not exist", parent.display());
        }

        Ok(HarnessConfig {
            definitions,
            basedir: self.basedir,
            delimiter: self.delimiter,
            dry_run: self.dry_run,
            color: !self.no_color && std::io::stdout().is_terminal(),
            json: self.json,
        })
    }
}
