//! Error types for the benchmark harness.
//!
//! Each stage has its own error enum so callers can tell a rejected
//! configuration from a failed engine call or an undefined metric.
//! [`HarnessError`] carries the benchmark/variant context the sweep was in
//! when the failure happened.

use crate::params::ImplementationVariant;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A benchmark definition or parameter block that must not reach the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Benchmark name is empty or would escape the output directory.
    #[error("invalid benchmark name '{0}'")]
    InvalidName(String),

    /// A probability is NaN or outside [0, 1].
    #[error("{field} must be within [0, 1], got {value}")]
    InvalidProbability {
        /// Which probability was rejected
        field: &'static str,
        /// Offending value
        value: f64,
    },

    /// Insert and contains probabilities leave a negative remove share.
    #[error("insert + contains probability is {sum}, which exceeds 1")]
    MixExceedsOne {
        /// insert_probability + contains_probability
        sum: f64,
    },

    /// Key range with min > max.
    #[error("key range min {min} is greater than max {max}")]
    InvalidKeyRange {
        /// Lower bound
        min: i32,
        /// Upper bound
        max: i32,
    },

    /// UNIQUE selection needs at least one key to permute.
    #[error("UNIQUE selection requires a key range wider than a single key")]
    EmptyUniqueRange,

    /// Zero-second measurement window.
    #[error("duration must be at least one second")]
    ZeroDuration,

    /// Skip list without any level.
    #[error("levels must be at least 1")]
    ZeroLevels,

    /// Nothing to average.
    #[error("repetitions per point must be at least 1")]
    ZeroRepetitions,

    /// Parallel sweep with no axis values.
    #[error("thread axis is empty")]
    EmptyThreadAxis,

    /// Thread count of zero on the axis.
    #[error("thread counts must be positive")]
    ZeroThreadCount,

    /// Same thread count listed twice.
    #[error("thread count {0} appears more than once")]
    DuplicateThreadCount(u16),

    /// Parallel sweep with no implementation variants.
    #[error("variant list is empty")]
    EmptyVariantList,

    /// Same variant listed twice.
    #[error("variant {0} appears more than once")]
    DuplicateVariant(ImplementationVariant),
}

/// Failures reported by, or detected at the boundary of, the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The entry point returned NULL instead of a result.
    #[error("{entry_point} returned no result")]
    NullResult {
        /// Symbol that was called
        entry_point: &'static str,
    },

    /// The returned block does not satisfy the result contract.
    #[error("result violates the binary contract: {reason}")]
    ContractViolation {
        /// What was wrong with the block
        reason: String,
    },

    /// Thread count not accepted by the parallel entry point.
    #[error("thread count must be positive")]
    InvalidThreadCount,

    /// Engine-specific failure (non-native engines).
    #[error("engine failed: {0}")]
    Failed(String),
}

/// Derived metrics that cannot be computed from a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    /// No repetitions were recorded for this axis value.
    #[error("no results recorded for {threads} threads")]
    EmptyBucket {
        /// Axis value
        threads: u16,
    },

    /// Elapsed times sum to zero, so throughput is undefined.
    #[error("total elapsed time for {threads} threads is zero; throughput is undefined")]
    ZeroElapsed {
        /// Axis value
        threads: u16,
    },
}

/// Top-level harness error with sweep context attached.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Definition rejected before any engine call.
    #[error("invalid benchmark '{benchmark}': {source}")]
    Config {
        /// Benchmark name
        benchmark: String,
        /// Validation failure
        source: ConfigError,
    },

    /// Engine call failed; the sweep stops here.
    #[error(
        "benchmark '{benchmark}' failed on {variant} with {threads} threads (repetition {repetition}): {source}"
    )]
    Invocation {
        /// Benchmark name
        benchmark: String,
        /// Variant being swept
        variant: ImplementationVariant,
        /// Axis value
        threads: u16,
        /// Zero-based repetition index
        repetition: usize,
        /// Engine failure
        source: EngineError,
    },

    /// A bucket could not be reduced to a row.
    #[error("cannot aggregate benchmark '{benchmark}' ({variant}): {source}")]
    Aggregate {
        /// Benchmark name
        benchmark: String,
        /// Variant being written
        variant: ImplementationVariant,
        /// Aggregation failure
        source: AggregateError,
    },

    /// Output directory could not be created.
    #[error("failed to create output directory {}: {source}", path.display())]
    CreateDir {
        /// Directory path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Data file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// File path
        path: PathBuf,
        /// Underlying writer error
        source: csv::Error,
    },
}

/// Result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;
