//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use chrono::{Local, TimeZone};
use skipbench_core::{
    BenchCounters, BenchResult, Engine, EngineError, ImplementationVariant, KeyOverlap, KeyRange,
    OperationsMix, RunId, RunParameters, SelectionStrategy,
};

/// One recorded engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Sequential,
    Parallel {
        threads: u16,
        variant: ImplementationVariant,
    },
}

/// Engine double that returns deterministic results and records every call.
///
/// Each result takes one second and performs `100 * threads + call index`
/// successful adds, so rows can be told apart by axis value.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    pub calls: Vec<Call>,
    /// Fail the call with this zero-based index.
    pub fail_at: Option<usize>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(index: usize) -> Self {
        Self {
            calls: Vec::new(),
            fail_at: Some(index),
        }
    }

    fn respond(&mut self, call: Call, threads: u16) -> Result<BenchResult, EngineError> {
        let index = self.calls.len();
        self.calls.push(call);
        if self.fail_at == Some(index) {
            return Err(EngineError::Failed(format!("scripted failure at call {index}")));
        }
        let adds = 100 * u32::from(threads) + index as u32;
        Ok(BenchResult::new(
            1.0,
            BenchCounters {
                successful_adds: adds,
                failed_contains: 1,
                ..BenchCounters::default()
            },
        ))
    }
}

impl Engine for ScriptedEngine {
    fn run_sequential(&mut self, _params: &RunParameters) -> Result<BenchResult, EngineError> {
        self.respond(Call::Sequential, 1)
    }

    fn run_parallel(
        &mut self,
        threads: u16,
        variant: ImplementationVariant,
        _params: &RunParameters,
    ) -> Result<BenchResult, EngineError> {
        self.respond(Call::Parallel { threads, variant }, threads)
    }
}

/// Small valid parameter block.
pub fn test_params() -> RunParameters {
    RunParameters {
        duration_secs: 1,
        prefill: 100,
        mix: OperationsMix::new(0.1, 0.8).unwrap(),
        strategy: SelectionStrategy::Random,
        overlap: KeyOverlap::Common,
        seed: 12345,
        key_range: KeyRange::new(0, 1000).unwrap(),
        levels: 8,
        level_probability: 0.5,
    }
}

/// Fixed run id so paths are predictable.
pub fn test_run_id() -> RunId {
    RunId::from_datetime(Local.with_ymd_and_hms(2024, 5, 17, 14, 30, 0).unwrap())
}

pub fn run_id_at(second: u32) -> RunId {
    RunId::from_datetime(Local.with_ymd_and_hms(2024, 5, 17, 14, 30, second).unwrap())
}

/// Read a data file into its header and rows, split on `delimiter`.
pub fn read_table(path: &std::path::Path, delimiter: char) -> (Vec<String>, Vec<Vec<String>>) {
    let text = std::fs::read_to_string(path).unwrap();
    let mut lines = text.lines().map(|line| {
        line.split(delimiter)
            .map(str::to_string)
            .collect::<Vec<_>>()
    });
    let header = lines.next().unwrap();
    (header, lines.collect())
}
