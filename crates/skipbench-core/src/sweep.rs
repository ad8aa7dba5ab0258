//! Sweep execution.
//!
//! A [`BenchmarkDefinition`] fixes one parameter block and sweeps the
//! thread-count axis, optionally for several implementation variants:
//!
//! ```text
//! for variant in variants:
//!     for threads in axis:
//!         repeat repetitions_per_point times: engine call -> bucket[threads]
//!     sink.variant_complete(buckets); buckets.clear()
//! ```
//!
//! Invocations never overlap. Each engine call gets the machine to itself,
//! so harness-level contention cannot leak into the measurements.

use crate::engine::Engine;
use crate::error::{ConfigError, HarnessError, HarnessResult};
use crate::measurement::BenchResult;
use crate::params::{ImplementationVariant, RunParameters};
use crate::run::RunId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Axis of a sequential sweep.
const SEQUENTIAL_AXIS: [u16; 1] = [1];

/// Which entry point a definition drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepMode {
    /// Sequential baseline; the axis is fixed to one thread.
    Sequential,
    /// Parallel entry point over every (variant, thread count) pair.
    Parallel {
        /// Thread counts, swept in the given order.
        threads: Vec<u16>,
        /// Variants, swept in the given order.
        variants: Vec<ImplementationVariant>,
    },
}

/// One benchmark: fixed parameters, a swept axis, and a repetition count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkDefinition {
    /// Name used for the output location.
    pub name: String,
    pub mode: SweepMode,
    pub parameters: RunParameters,
    pub repetitions_per_point: usize,
}

impl BenchmarkDefinition {
    /// Sequential baseline definition.
    pub fn sequential(
        name: impl Into<String>,
        parameters: RunParameters,
        repetitions_per_point: usize,
    ) -> Self {
        Self {
            name: name.into(),
            mode: SweepMode::Sequential,
            parameters,
            repetitions_per_point,
        }
    }

    /// Parallel definition over `threads` x `variants`.
    pub fn parallel(
        name: impl Into<String>,
        threads: Vec<u16>,
        variants: Vec<ImplementationVariant>,
        parameters: RunParameters,
        repetitions_per_point: usize,
    ) -> Self {
        Self {
            name: name.into(),
            mode: SweepMode::Parallel { threads, variants },
            parameters,
            repetitions_per_point,
        }
    }

    pub fn is_sequential(&self) -> bool {
        matches!(self.mode, SweepMode::Sequential)
    }

    /// Thread counts swept for every variant.
    pub fn thread_axis(&self) -> &[u16] {
        match &self.mode {
            SweepMode::Sequential => &SEQUENTIAL_AXIS,
            SweepMode::Parallel { threads, .. } => threads,
        }
    }

    /// Variants swept, outermost loop.
    pub fn variants(&self) -> &[ImplementationVariant] {
        match &self.mode {
            SweepMode::Sequential => &[ImplementationVariant::Sequential],
            SweepMode::Parallel { variants, .. } => variants,
        }
    }

    /// Number of engine calls a full sweep makes.
    pub fn invocation_count(&self) -> usize {
        self.variants().len() * self.thread_axis().len() * self.repetitions_per_point
    }

    /// Reject anything that must not reach the engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_name(&self.name)?;
        if self.repetitions_per_point == 0 {
            return Err(ConfigError::ZeroRepetitions);
        }
        if let SweepMode::Parallel { threads, variants } = &self.mode {
            if threads.is_empty() {
                return Err(ConfigError::EmptyThreadAxis);
            }
            let mut seen = HashSet::new();
            for &t in threads {
                if t == 0 {
                    return Err(ConfigError::ZeroThreadCount);
                }
                if !seen.insert(t) {
                    return Err(ConfigError::DuplicateThreadCount(t));
                }
            }

            if variants.is_empty() {
                return Err(ConfigError::EmptyVariantList);
            }
            let mut seen = HashSet::new();
            for &v in variants {
                if !seen.insert(v) {
                    return Err(ConfigError::DuplicateVariant(v));
                }
            }
        }
        self.parameters.validate()
    }

    fn check(&self) -> HarnessResult<()> {
        self.validate().map_err(|source| HarnessError::Config {
            benchmark: self.name.clone(),
            source,
        })
    }
}

fn validate_name(name: &str) -> Result<(), ConfigError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_control);
    if bad {
        Err(ConfigError::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}

/// Raw results for one axis value, in repetition order.
#[derive(Debug, Clone, PartialEq)]
pub struct RunBucket {
    pub threads: u16,
    pub results: Vec<BenchResult>,
}

impl RunBucket {
    pub fn new(threads: u16) -> Self {
        Self {
            threads,
            results: Vec::new(),
        }
    }

    pub fn with_capacity(threads: u16, capacity: usize) -> Self {
        Self {
            threads,
            results: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, result: BenchResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Receives the buckets of each variant once its sweep completes.
pub trait SweepSink {
    /// `buckets` holds one bucket per axis value, in sweep order.
    fn variant_complete(
        &mut self,
        run: &RunId,
        definition: &BenchmarkDefinition,
        variant: ImplementationVariant,
        buckets: &[RunBucket],
    ) -> HarnessResult<()>;
}

impl<S: SweepSink + ?Sized> SweepSink for &mut S {
    fn variant_complete(
        &mut self,
        run: &RunId,
        definition: &BenchmarkDefinition,
        variant: ImplementationVariant,
        buckets: &[RunBucket],
    ) -> HarnessResult<()> {
        (**self).variant_complete(run, definition, variant, buckets)
    }
}

/// Progress update after each engine call.
#[derive(Debug, Clone)]
pub struct SweepProgress<'a> {
    pub benchmark: &'a str,
    pub variant: ImplementationVariant,
    pub threads: u16,
    /// Zero-based repetition just completed.
    pub repetition: usize,
    /// Calls completed so far in this definition.
    pub completed: usize,
    /// Calls this definition makes in total.
    pub total: usize,
}

/// Callback for receiving progress updates.
pub type SweepProgressCallback<'a> = &'a dyn Fn(&SweepProgress<'_>);

/// Drives definitions through an engine, one blocking call at a time.
pub struct SweepController<E> {
    engine: E,
}

impl<E: Engine> SweepController<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Sweep `definition` and hand each variant's buckets to `sink`.
    ///
    /// The definition is validated before the first engine call. The first
    /// failing call aborts the sweep; variants already handed to the sink
    /// stay written, the failing variant produces nothing.
    pub fn run<S: SweepSink + ?Sized>(
        &mut self,
        definition: &BenchmarkDefinition,
        run: &RunId,
        sink: &mut S,
        progress: Option<SweepProgressCallback<'_>>,
    ) -> HarnessResult<()> {
        definition.check()?;

        let axis = definition.thread_axis();
        let repetitions = definition.repetitions_per_point;
        let total = definition.invocation_count();
        let mut completed = 0;
        let mut buckets: Vec<RunBucket> = Vec::with_capacity(axis.len());

        tracing::info!(
            "Running '{}' ({} variants x {} points x {} repetitions)",
            definition.name,
            definition.variants().len(),
            axis.len(),
            repetitions
        );

        for &variant in definition.variants() {
            tracing::info!("Sweeping {} for '{}'", variant, definition.name);

            for &threads in axis {
                let mut bucket = RunBucket::with_capacity(threads, repetitions);

                for repetition in 0..repetitions {
                    let result = self
                        .invoke(definition, variant, threads)
                        .map_err(|source| HarnessError::Invocation {
                            benchmark: definition.name.clone(),
                            variant,
                            threads,
                            repetition,
                            source,
                        })?;

                    tracing::debug!(
                        "{} threads={} rep={}: {} ops in {:.3}s",
                        variant,
                        threads,
                        repetition,
                        result.total_operations(),
                        result.elapsed_secs
                    );

                    bucket.push(result);
                    completed += 1;

                    if let Some(callback) = progress {
                        callback(&SweepProgress {
                            benchmark: &definition.name,
                            variant,
                            threads,
                            repetition,
                            completed,
                            total,
                        });
                    }
                }

                buckets.push(bucket);
            }

            sink.variant_complete(run, definition, variant, &buckets)?;
            buckets.clear();
        }

        Ok(())
    }

    fn invoke(
        &mut self,
        definition: &BenchmarkDefinition,
        variant: ImplementationVariant,
        threads: u16,
    ) -> Result<BenchResult, crate::error::EngineError> {
        match definition.mode {
            SweepMode::Sequential => self.engine.run_sequential(&definition.parameters),
            SweepMode::Parallel { .. } => {
                self.engine
                    .run_parallel(threads, variant, &definition.parameters)
            }
        }
    }
}
