//! Binary contract with the skip list engine.
//!
//! These types mirror the engine's C header field for field. The engine is
//! built separately, so a reordered field or a changed width would not fail
//! to compile on either side; it would silently shift every counter. The
//! layout is therefore pinned by [`CONTRACT_VERSION`] and by the
//! compile-time assertions at the bottom of this module.
//!
//! C layout (version 1):
//!
//! ```text
//! struct counters       { int failed_adds; int successfull_adds;
//!                         int failed_removes; int successfull_removes;
//!                         int failed_contains; int successfull_contains; }
//! struct bench_result   { float time; struct counters counters; }
//! operations_mix_t      { float insert_p; float contain_p; }
//! keyrange_t            { int min; int max; }
//! selection_strategy    { RANDOM, UNIQUE, SUCCESSIVE }        (int)
//! key_overlap           { COMMON, DISJOINT, PER_THREAD }      (int)
//! implementation        { SEQUENTIAL, COARSE, FINE, LOCK_FREE } (int)
//! ```

use crate::error::EngineError;
use crate::measurement::{BenchCounters, BenchResult};
use crate::params::{
    ImplementationVariant, KeyOverlap, KeyRange, OperationsMix, RunParameters, SelectionStrategy,
};
use std::ffi::{c_double, c_float, c_int, c_uint};
use std::mem::{align_of, offset_of, size_of};

/// Version of the layout described in this module.
///
/// Bump whenever any struct, enum or entry point signature changes.
pub const CONTRACT_VERSION: u32 = 1;

/// Symbol of the sequential entry point.
pub const SEQUENTIAL_SYMBOL: &str = "seq_skiplist_benchmark";

/// Symbol of the parallel entry point.
pub const PARALLEL_SYMBOL: &str = "par_skiplist_benchmark";

/// `struct counters`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CBenchCounters {
    pub failed_adds: c_int,
    pub successful_adds: c_int,
    pub failed_removes: c_int,
    pub successful_removes: c_int,
    pub failed_contains: c_int,
    pub successful_contains: c_int,
}

/// `struct bench_result`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CBenchResult {
    pub time: c_float,
    pub counters: CBenchCounters,
}

/// `operations_mix_t`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct COperationsMix {
    pub insert_p: c_float,
    pub contain_p: c_float,
}

/// `keyrange_t`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CKeyRange {
    pub min: c_int,
    pub max: c_int,
}

/// `selection_strategy`, passed as its underlying `int`.
pub type CSelectionStrategy = c_int;
/// `key_overlap`, passed as its underlying `int`.
pub type CKeyOverlap = c_int;
/// `implementation`, passed as its underlying `int`.
pub type CImplementation = c_int;

/// `struct bench_result* seq_skiplist_benchmark(uint16_t time_interval,
/// uint16_t n_prefill, operations_mix_t, selection_strategy, unsigned int seed,
/// keyrange_t, uint8_t levels, double prob)`
pub type SequentialEntryPoint = unsafe extern "C" fn(
    time_interval: u16,
    n_prefill: u16,
    operations_mix: COperationsMix,
    strategy: CSelectionStrategy,
    seed: c_uint,
    keyrange: CKeyRange,
    levels: u8,
    prob: c_double,
) -> *mut CBenchResult;

/// `struct bench_result* par_skiplist_benchmark(uint16_t num_threads,
/// uint16_t time_interval, uint16_t n_prefill, operations_mix_t,
/// selection_strategy, key_overlap, unsigned int seed, keyrange_t,
/// uint8_t levels, double prob, implementation)`
pub type ParallelEntryPoint = unsafe extern "C" fn(
    num_threads: u16,
    time_interval: u16,
    n_prefill: u16,
    operations_mix: COperationsMix,
    strategy: CSelectionStrategy,
    overlap: CKeyOverlap,
    seed: c_uint,
    keyrange: CKeyRange,
    levels: u8,
    prob: c_double,
    implementation: CImplementation,
) -> *mut CBenchResult;

/// Parameter block marshalled into contract types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CRunArgs {
    pub time_interval: u16,
    pub n_prefill: u16,
    pub operations_mix: COperationsMix,
    pub strategy: CSelectionStrategy,
    pub overlap: CKeyOverlap,
    pub seed: c_uint,
    pub keyrange: CKeyRange,
    pub levels: u8,
    pub prob: c_double,
}

impl From<&RunParameters> for CRunArgs {
    fn from(params: &RunParameters) -> Self {
        Self {
            time_interval: params.duration_secs,
            n_prefill: params.prefill,
            operations_mix: params.mix.into(),
            strategy: params.strategy.as_raw(),
            overlap: params.overlap.as_raw(),
            seed: params.seed,
            keyrange: params.key_range.into(),
            levels: params.levels,
            prob: params.level_probability,
        }
    }
}

impl From<OperationsMix> for COperationsMix {
    fn from(mix: OperationsMix) -> Self {
        Self {
            insert_p: mix.insert_probability,
            contain_p: mix.contains_probability,
        }
    }
}

impl From<KeyRange> for CKeyRange {
    fn from(range: KeyRange) -> Self {
        Self {
            min: range.min,
            max: range.max,
        }
    }
}

/// Enum discriminant not defined by the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownDiscriminant {
    pub kind: &'static str,
    pub value: c_int,
}

impl std::fmt::Display for UnknownDiscriminant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} value {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownDiscriminant {}

macro_rules! contract_enum {
    ($ty:ty, $kind:literal, [$($variant:path),+ $(,)?]) => {
        impl $ty {
            /// Underlying integer passed to the engine.
            pub fn as_raw(self) -> c_int {
                self as c_int
            }
        }

        impl TryFrom<c_int> for $ty {
            type Error = UnknownDiscriminant;

            fn try_from(value: c_int) -> Result<Self, Self::Error> {
                $(
                    if value == $variant as c_int {
                        return Ok($variant);
                    }
                )+
                Err(UnknownDiscriminant { kind: $kind, value })
            }
        }
    };
}

contract_enum!(
    SelectionStrategy,
    "selection_strategy",
    [SelectionStrategy::Random, SelectionStrategy::Unique, SelectionStrategy::Successive]
);
contract_enum!(
    KeyOverlap,
    "key_overlap",
    [KeyOverlap::Common, KeyOverlap::Disjoint, KeyOverlap::PerThread]
);
contract_enum!(
    ImplementationVariant,
    "implementation",
    [
        ImplementationVariant::Sequential,
        ImplementationVariant::Coarse,
        ImplementationVariant::Fine,
        ImplementationVariant::LockFree,
    ]
);

impl TryFrom<CBenchResult> for BenchResult {
    type Error = EngineError;

    /// Unmarshal a result block, rejecting values the engine cannot produce.
    fn try_from(raw: CBenchResult) -> Result<Self, Self::Error> {
        if !raw.time.is_finite() || raw.time < 0.0 {
            return Err(EngineError::ContractViolation {
                reason: format!("elapsed time {} is not a finite non-negative value", raw.time),
            });
        }

        let c = raw.counters;
        let counters = BenchCounters {
            successful_adds: counter("successful_adds", c.successful_adds)?,
            failed_adds: counter("failed_adds", c.failed_adds)?,
            successful_removes: counter("successful_removes", c.successful_removes)?,
            failed_removes: counter("failed_removes", c.failed_removes)?,
            successful_contains: counter("successful_contains", c.successful_contains)?,
            failed_contains: counter("failed_contains", c.failed_contains)?,
        };

        Ok(BenchResult::new(f64::from(raw.time), counters))
    }
}

fn counter(field: &'static str, value: c_int) -> Result<u32, EngineError> {
    u32::try_from(value).map_err(|_| EngineError::ContractViolation {
        reason: format!("counter {field} is negative ({value})"),
    })
}

// Layout pins. A failure here means the mirror no longer matches version 1.
const _: () = {
    assert!(size_of::<c_int>() == 4);
    assert!(size_of::<c_float>() == 4);

    assert!(size_of::<CBenchCounters>() == 24);
    assert!(align_of::<CBenchCounters>() == 4);
    assert!(offset_of!(CBenchCounters, failed_adds) == 0);
    assert!(offset_of!(CBenchCounters, successful_adds) == 4);
    assert!(offset_of!(CBenchCounters, failed_removes) == 8);
    assert!(offset_of!(CBenchCounters, successful_removes) == 12);
    assert!(offset_of!(CBenchCounters, failed_contains) == 16);
    assert!(offset_of!(CBenchCounters, successful_contains) == 20);

    assert!(size_of::<CBenchResult>() == 28);
    assert!(align_of::<CBenchResult>() == 4);
    assert!(offset_of!(CBenchResult, time) == 0);
    assert!(offset_of!(CBenchResult, counters) == 4);

    assert!(size_of::<COperationsMix>() == 8);
    assert!(offset_of!(COperationsMix, insert_p) == 0);
    assert!(offset_of!(COperationsMix, contain_p) == 4);

    assert!(size_of::<CKeyRange>() == 8);
    assert!(offset_of!(CKeyRange, min) == 0);
    assert!(offset_of!(CKeyRange, max) == 4);

    assert!(size_of::<SelectionStrategy>() == size_of::<c_int>());
    assert!(size_of::<KeyOverlap>() == size_of::<c_int>());
    assert!(size_of::<ImplementationVariant>() == size_of::<c_int>());
};
