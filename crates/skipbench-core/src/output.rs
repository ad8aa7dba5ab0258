//! Data file output.
//!
//! One table per (run, variant), laid out as
//!
//! ```text
//! <basedir>/data/<run-id>/<benchmark>/<variant>.data   parallel definitions
//! <basedir>/data/<run-id>/avg/<benchmark>.data         sequential definitions
//! ```
//!
//! Each table has a header naming [`COLUMNS`] and one row per axis value,
//! in the order the axis was swept.

use crate::aggregate::{AggregatedRow, aggregate_buckets};
use crate::error::{HarnessError, HarnessResult};
use crate::params::ImplementationVariant;
use crate::run::RunId;
use crate::sweep::{BenchmarkDefinition, RunBucket, SweepSink};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Header of every data file, in column order.
pub const COLUMNS: [&str; 10] = [
    "n_threads",
    "successful_adds",
    "failed_adds",
    "successful_contains",
    "failed_contains",
    "successful_removes",
    "failed_removes",
    "total_ops",
    "time",
    "throughput",
];

/// Directory under the run directory that holds sequential tables.
const SEQUENTIAL_DIR: &str = "avg";

/// File extension of data tables.
const DATA_EXTENSION: &str = "data";

/// Column separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Single space (what the plotting scripts read).
    #[default]
    Space,
    Comma,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Space => b' ',
            Self::Comma => b',',
        }
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "space" | " " => Ok(Self::Space),
            "comma" | "," => Ok(Self::Comma),
            _ => Err(format!("Unknown delimiter: {s}. Valid options: space, comma")),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space => write!(f, "space"),
            Self::Comma => write!(f, "comma"),
        }
    }
}

/// A table that has been written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantTable {
    pub benchmark: String,
    pub variant: ImplementationVariant,
    pub path: PathBuf,
    pub rows: Vec<AggregatedRow>,
}

/// Sink that aggregates each variant's buckets and writes its table.
#[derive(Debug)]
pub struct DataWriter {
    basedir: PathBuf,
    delimiter: Delimiter,
    tables: Vec<VariantTable>,
}

impl DataWriter {
    pub fn new(basedir: impl Into<PathBuf>) -> Self {
        Self {
            basedir: basedir.into(),
            delimiter: Delimiter::default(),
            tables: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn basedir(&self) -> &Path {
        &self.basedir
    }

    /// `<basedir>/data/<run-id>`
    pub fn run_dir(&self, run: &RunId) -> PathBuf {
        self.basedir.join("data").join(run.as_str())
    }

    /// Where the table for `variant` of `definition` goes.
    pub fn table_path(
        &self,
        run: &RunId,
        definition: &BenchmarkDefinition,
        variant: ImplementationVariant,
    ) -> PathBuf {
        let run_dir = self.run_dir(run);
        if definition.is_sequential() {
            run_dir
                .join(SEQUENTIAL_DIR)
                .join(format!("{}.{DATA_EXTENSION}", definition.name))
        } else {
            run_dir
                .join(&definition.name)
                .join(format!("{}.{DATA_EXTENSION}", variant.label()))
        }
    }

    /// Tables written so far, in write order.
    pub fn tables(&self) -> &[VariantTable] {
        &self.tables
    }

    pub fn into_tables(self) -> Vec<VariantTable> {
        self.tables
    }

    /// Write `rows` to `path`, creating parent directories as needed.
    ///
    /// Existing directories are reused; an existing file is replaced.
    pub fn write_table(&self, path: &Path, rows: &[AggregatedRow]) -> HarnessResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| HarnessError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let write_err = |source: csv::Error| HarnessError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter.as_byte())
            .has_headers(false)
            .from_path(path)
            .map_err(write_err)?;

        writer.write_record(COLUMNS).map_err(write_err)?;
        for row in rows {
            writer.write_record(format_row(row)).map_err(write_err)?;
        }
        writer
            .flush()
            .map_err(|e| write_err(csv::Error::from(e)))?;

        Ok(())
    }
}

impl SweepSink for DataWriter {
    fn variant_complete(
        &mut self,
        run: &RunId,
        definition: &BenchmarkDefinition,
        variant: ImplementationVariant,
        buckets: &[RunBucket],
    ) -> HarnessResult<()> {
        let rows = aggregate_buckets(buckets).map_err(|source| HarnessError::Aggregate {
            benchmark: definition.name.clone(),
            variant,
            source,
        })?;

        let path = self.table_path(run, definition, variant);
        self.write_table(&path, &rows)?;
        tracing::info!("Wrote {} rows to {}", rows.len(), path.display());

        self.tables.push(VariantTable {
            benchmark: definition.name.clone(),
            variant,
            path,
            rows,
        });
        Ok(())
    }
}

/// Row fields in [`COLUMNS`] order.
fn format_row(row: &AggregatedRow) -> [String; 10] {
    [
        row.threads.to_string(),
        row.successful_adds.to_string(),
        row.failed_adds.to_string(),
        row.successful_contains.to_string(),
        row.failed_contains.to_string(),
        row.successful_removes.to_string(),
        row.failed_removes.to_string(),
        row.total_operations.to_string(),
        row.elapsed_secs.to_string(),
        row.throughput.to_string(),
    ]
}
