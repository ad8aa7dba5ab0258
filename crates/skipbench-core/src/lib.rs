//! Sweep and aggregation engine for skip list benchmarks.
//!
//! The concurrent data structures under test live in a native engine that
//! exports two entry points (see [`contract`]). This crate drives that
//! engine: it validates [`BenchmarkDefinition`]s, sweeps the thread-count
//! axis one blocking call at a time, reduces repeated runs into averaged
//! rows, and writes one data table per implementation variant.
//!
//! ```no_run
//! # #[cfg(feature = "native-engine")]
//! # fn demo(def: &skipbench_core::BenchmarkDefinition) -> skipbench_core::HarnessResult<()> {
//! use skipbench_core::{DataWriter, NativeEngine, RunId, SweepController};
//!
//! let run = RunId::now();
//! let mut writer = DataWriter::new(".");
//! let mut controller = SweepController::new(NativeEngine::linked());
//! controller.run(def, &run, &mut writer, None)?;
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod contract;
pub mod engine;
pub mod error;
pub mod measurement;
pub mod output;
pub mod params;
pub mod run;
pub mod sweep;

pub use aggregate::{AggregatedRow, aggregate_bucket, aggregate_buckets};
pub use contract::CONTRACT_VERSION;
pub use engine::{Engine, EntryPoints, NativeEngine};
pub use error::{AggregateError, ConfigError, EngineError, HarnessError, HarnessResult};
pub use measurement::{BenchCounters, BenchResult};
pub use output::{COLUMNS, DataWriter, Delimiter, VariantTable};
pub use params::{
    ImplementationVariant, KeyOverlap, KeyRange, OperationsMix, RunParameters, SelectionStrategy,
};
pub use run::RunId;
pub use sweep::{
    BenchmarkDefinition, RunBucket, SweepController, SweepMode, SweepProgress,
    SweepProgressCallback, SweepSink,
};
