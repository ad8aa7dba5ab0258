//! Engine invocation.
//!
//! The sweep talks to the engine only through the [`Engine`] trait. Each
//! call is synchronous and blocks for roughly the configured duration; all
//! concurrency under test lives inside the engine.

mod native;

pub use native::{EntryPoints, NativeEngine};

use crate::error::EngineError;
use crate::measurement::BenchResult;
use crate::params::{ImplementationVariant, RunParameters};

/// A benchmark engine for an ordered key set.
pub trait Engine {
    /// Run the sequential baseline once.
    fn run_sequential(&mut self, params: &RunParameters) -> Result<BenchResult, EngineError>;

    /// Run `variant` once with `threads` worker threads.
    ///
    /// `threads` must be positive.
    fn run_parallel(
        &mut self,
        threads: u16,
        variant: ImplementationVariant,
        params: &RunParameters,
    ) -> Result<BenchResult, EngineError>;
}

impl<E: Engine + ?Sized> Engine for &mut E {
    fn run_sequential(&mut self, params: &RunParameters) -> Result<BenchResult, EngineError> {
        (**self).run_sequential(params)
    }

    fn run_parallel(
        &mut self,
        threads: u16,
        variant: ImplementationVariant,
        params: &RunParameters,
    ) -> Result<BenchResult, EngineError> {
        (**self).run_parallel(threads, variant, params)
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn run_sequential(&mut self, params: &RunParameters) -> Result<BenchResult, EngineError> {
        (**self).run_sequential(params)
    }

    fn run_parallel(
        &mut self,
        threads: u16,
        variant: ImplementationVariant,
        params: &RunParameters,
    ) -> Result<BenchResult, EngineError> {
        (**self).run_parallel(threads, variant, params)
    }
}
