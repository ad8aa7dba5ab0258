//! Benchmark parameters.
//!
//! A [`RunParameters`] block is built once per benchmark definition and
//! reused unchanged for every repetition and axis point. Only the thread
//! count and the implementation variant vary during a sweep.
//!
//! The enum discriminants are the integer values the engine expects; see
//! [`crate::contract`] for the wire layout.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Slack allowed when checking that two `f32` probabilities sum to at most 1.
///
/// `0.1f32 + 0.9f32` widened to `f64` is slightly above 1.0.
const MIX_SUM_TOLERANCE: f64 = 1e-6;

/// Share of insert and contains operations. Remove takes the rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperationsMix {
    /// Probability that an operation is an insert.
    pub insert_probability: f32,
    /// Probability that an operation is a contains.
    pub contains_probability: f32,
}

impl OperationsMix {
    /// Create a validated mix.
    pub fn new(insert_probability: f32, contains_probability: f32) -> Result<Self, ConfigError> {
        let mix = Self {
            insert_probability,
            contains_probability,
        };
        mix.validate()?;
        Ok(mix)
    }

    /// Implied remove probability.
    pub fn remove_probability(&self) -> f32 {
        (1.0 - self.insert_probability - self.contains_probability).max(0.0)
    }

    /// Check both probabilities and their sum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("insert_probability", f64::from(self.insert_probability))?;
        check_probability("contains_probability", f64::from(self.contains_probability))?;

        let sum = f64::from(self.insert_probability) + f64::from(self.contains_probability);
        if sum > 1.0 + MIX_SUM_TOLERANCE {
            return Err(ConfigError::MixExceedsOne { sum });
        }
        Ok(())
    }
}

/// Inclusive key domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRange {
    /// Smallest key.
    pub min: i32,
    /// Largest key.
    pub max: i32,
}

impl KeyRange {
    /// Create a validated range.
    pub fn new(min: i32, max: i32) -> Result<Self, ConfigError> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    /// Distance between the bounds (`max - min`).
    pub fn span(&self) -> i64 {
        i64::from(self.max) - i64::from(self.min)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvalidKeyRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// How a worker picks its next key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum SelectionStrategy {
    /// Uniformly random key.
    Random = 0,
    /// Walk a random permutation of the range.
    Unique = 1,
    /// Increment, wrapping at the top of the range.
    Successive = 2,
}

/// Whether concurrent workers share, partition or privatize the key domain.
///
/// Only meaningful for parallel sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum KeyOverlap {
    /// All threads draw from the same range.
    #[default]
    Common = 0,
    /// The range is split between threads.
    Disjoint = 1,
    /// Each thread gets its own full-size range.
    PerThread = 2,
}

/// Concurrency strategy exercised by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum ImplementationVariant {
    /// Single-threaded baseline.
    Sequential = 0,
    /// One global lock.
    Coarse = 1,
    /// Per-node locks.
    Fine = 2,
    /// CAS-based.
    LockFree = 3,
}

impl ImplementationVariant {
    /// Engine-side name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sequential => "SEQUENTIAL",
            Self::Coarse => "COARSE",
            Self::Fine => "FINE",
            Self::LockFree => "LOCK_FREE",
        }
    }

    /// Lowercase label used for output file names.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Coarse => "coarse",
            Self::Fine => "fine",
            Self::LockFree => "lock_free",
        }
    }

    /// All variants, in engine order.
    pub fn all() -> [Self; 4] {
        [Self::Sequential, Self::Coarse, Self::Fine, Self::LockFree]
    }
}

impl fmt::Display for ImplementationVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the engine needs for one run, minus thread count and variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParameters {
    /// Measurement window in seconds.
    pub duration_secs: u16,
    /// Keys inserted before measuring.
    pub prefill: u16,
    /// Operation mix.
    pub mix: OperationsMix,
    /// Key selection policy.
    pub strategy: SelectionStrategy,
    /// Key overlap policy (ignored by the sequential entry point).
    #[serde(default)]
    pub overlap: KeyOverlap,
    /// Engine RNG seed.
    pub seed: u32,
    /// Key domain.
    pub key_range: KeyRange,
    /// Skip list height.
    pub levels: u8,
    /// Probability that a node is promoted to the next level.
    pub level_probability: f64,
}

impl RunParameters {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration_secs == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        self.mix.validate()?;
        self.key_range.validate()?;
        if self.strategy == SelectionStrategy::Unique && self.key_range.span() == 0 {
            return Err(ConfigError::EmptyUniqueRange);
        }
        if self.levels == 0 {
            return Err(ConfigError::ZeroLevels);
        }
        check_probability("level_probability", self.level_probability)
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { field, value })
    }
}
