//! Native engine bound through the C ABI.

use super::Engine;
use crate::contract::{
    CBenchResult, CRunArgs, PARALLEL_SYMBOL, ParallelEntryPoint, SEQUENTIAL_SYMBOL,
    SequentialEntryPoint,
};
use crate::error::EngineError;
use crate::measurement::BenchResult;
use crate::params::{ImplementationVariant, RunParameters};
use std::ptr::NonNull;

// Link to the engine's entry points. The library name and search path come
// from build.rs (SKIPBENCH_ENGINE_LIB / SKIPBENCH_ENGINE_DIR).
#[cfg(feature = "native-engine")]
unsafe extern "C" {
    fn seq_skiplist_benchmark(
        time_interval: u16,
        n_prefill: u16,
        operations_mix: crate::contract::COperationsMix,
        strategy: crate::contract::CSelectionStrategy,
        seed: std::ffi::c_uint,
        keyrange: crate::contract::CKeyRange,
        levels: u8,
        prob: std::ffi::c_double,
    ) -> *mut CBenchResult;

    fn par_skiplist_benchmark(
        num_threads: u16,
        time_interval: u16,
        n_prefill: u16,
        operations_mix: crate::contract::COperationsMix,
        strategy: crate::contract::CSelectionStrategy,
        overlap: crate::contract::CKeyOverlap,
        seed: std::ffi::c_uint,
        keyrange: crate::contract::CKeyRange,
        levels: u8,
        prob: std::ffi::c_double,
        implementation: crate::contract::CImplementation,
    ) -> *mut CBenchResult;
}

/// The pair of functions a native engine exports.
#[derive(Debug, Clone, Copy)]
pub struct EntryPoints {
    pub sequential: SequentialEntryPoint,
    pub parallel: ParallelEntryPoint,
}

/// Engine that marshals parameters into the contract layout and calls
/// the C entry points.
#[derive(Debug)]
pub struct NativeEngine {
    entry: EntryPoints,
}

impl NativeEngine {
    /// Wrap arbitrary entry points.
    ///
    /// # Safety
    ///
    /// Both functions must have exactly the signatures documented in
    /// [`crate::contract`], and must return either NULL or a pointer to a
    /// `struct bench_result` allocated with the C allocator. Ownership of a
    /// non-NULL result passes to the caller, which frees it with `free`.
    pub unsafe fn from_entry_points(entry: EntryPoints) -> Self {
        Self { entry }
    }

    /// Engine bound to the symbols linked into this binary.
    #[cfg(feature = "native-engine")]
    pub fn linked() -> Self {
        // SAFETY: the extern declarations above mirror the engine header
        // under CONTRACT_VERSION, and the engine mallocs every result.
        unsafe {
            Self::from_entry_points(EntryPoints {
                sequential: seq_skiplist_benchmark,
                parallel: par_skiplist_benchmark,
            })
        }
    }
}

impl Engine for NativeEngine {
    fn run_sequential(&mut self, params: &RunParameters) -> Result<BenchResult, EngineError> {
        let args = CRunArgs::from(params);
        // SAFETY: guaranteed by the from_entry_points contract.
        let raw = unsafe {
            (self.entry.sequential)(
                args.time_interval,
                args.n_prefill,
                args.operations_mix,
                args.strategy,
                args.seed,
                args.keyrange,
                args.levels,
                args.prob,
            )
        };
        // SAFETY: raw comes straight from the entry point and is not used again.
        unsafe { take_result(raw, SEQUENTIAL_SYMBOL) }
    }

    fn run_parallel(
        &mut self,
        threads: u16,
        variant: ImplementationVariant,
        params: &RunParameters,
    ) -> Result<BenchResult, EngineError> {
        if threads == 0 {
            return Err(EngineError::InvalidThreadCount);
        }
        let args = CRunArgs::from(params);
        // SAFETY: guaranteed by the from_entry_points contract.
        let raw = unsafe {
            (self.entry.parallel)(
                threads,
                args.time_interval,
                args.n_prefill,
                args.operations_mix,
                args.strategy,
                args.overlap,
                args.seed,
                args.keyrange,
                args.levels,
                args.prob,
                variant.as_raw(),
            )
        };
        // SAFETY: raw comes straight from the entry point and is not used again.
        unsafe { take_result(raw, PARALLEL_SYMBOL) }
    }
}

/// Copy the result out of an engine-owned block and free the block.
///
/// # Safety
///
/// `raw` must be NULL or a uniquely owned, `malloc`ed `CBenchResult`.
unsafe fn take_result(
    raw: *mut CBenchResult,
    entry_point: &'static str,
) -> Result<BenchResult, EngineError> {
    // SAFETY: forwarded from the caller.
    let block = unsafe { EngineResult::from_raw(raw) }
        .ok_or(EngineError::NullResult { entry_point })?;
    BenchResult::try_from(block.read())
}

/// Owning handle to a result block allocated by the engine.
///
/// Freed exactly once on drop.
struct EngineResult(NonNull<CBenchResult>);

impl EngineResult {
    /// # Safety
    ///
    /// See [`take_result`].
    unsafe fn from_raw(raw: *mut CBenchResult) -> Option<Self> {
        NonNull::new(raw).map(Self)
    }

    fn read(&self) -> CBenchResult {
        // SAFETY: non-null, aligned by malloc, and owned by self.
        unsafe { self.0.as_ptr().read() }
    }
}

impl Drop for EngineResult {
    fn drop(&mut self) {
        // SAFETY: allocated with malloc by the engine and never freed elsewhere.
        unsafe { libc::free(self.0.as_ptr().cast()) }
    }
}
