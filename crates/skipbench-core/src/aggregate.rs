//! Reduction of run buckets into averaged rows.

use crate::error::AggregateError;
use crate::measurement::BenchResult;
use crate::sweep::RunBucket;
use serde::Serialize;

/// Averages of one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregatedRow {
    /// Axis value.
    pub threads: u16,
    /// Number of results averaged.
    pub repetitions: usize,
    pub successful_adds: f64,
    pub failed_adds: f64,
    pub successful_contains: f64,
    pub failed_contains: f64,
    pub successful_removes: f64,
    pub failed_removes: f64,
    /// Mean of the per-run totals.
    pub total_operations: f64,
    /// Mean elapsed time in seconds.
    pub elapsed_secs: f64,
    /// Total operations over total elapsed time.
    pub throughput: f64,
}

/// Reduce a bucket to its averaged row.
///
/// Every counter is averaged from its own field. Throughput is the ratio
/// of sums (`Σ ops / Σ time`), not the mean of per-run ratios, so runs that
/// took longer weigh proportionally more. The result does not depend on the
/// order of the bucket.
pub fn aggregate_bucket(bucket: &RunBucket) -> Result<AggregatedRow, AggregateError> {
    let results = &bucket.results;
    if results.is_empty() {
        return Err(AggregateError::EmptyBucket {
            threads: bucket.threads,
        });
    }

    let n = results.len() as f64;
    let sum = |field: fn(&BenchResult) -> u32| -> u64 {
        results.iter().map(|r| u64::from(field(r))).sum()
    };

    let total_ops: u64 = results.iter().map(BenchResult::total_operations).sum();
    let elapsed = ordered_sum(results.iter().map(|r| r.elapsed_secs));

    if elapsed <= 0.0 {
        return Err(AggregateError::ZeroElapsed {
            threads: bucket.threads,
        });
    }

    Ok(AggregatedRow {
        threads: bucket.threads,
        repetitions: results.len(),
        successful_adds: sum(|r| r.counters.successful_adds) as f64 / n,
        failed_adds: sum(|r| r.counters.failed_adds) as f64 / n,
        successful_contains: sum(|r| r.counters.successful_contains) as f64 / n,
        failed_contains: sum(|r| r.counters.failed_contains) as f64 / n,
        successful_removes: sum(|r| r.counters.successful_removes) as f64 / n,
        failed_removes: sum(|r| r.counters.failed_removes) as f64 / n,
        total_operations: total_ops as f64 / n,
        elapsed_secs: elapsed / n,
        throughput: total_ops as f64 / elapsed,
    })
}

/// Reduce every bucket, keeping sweep order.
pub fn aggregate_buckets(buckets: &[RunBucket]) -> Result<Vec<AggregatedRow>, AggregateError> {
    buckets.iter().map(aggregate_bucket).collect()
}

/// Sum floats in ascending order so the result is independent of input order.
fn ordered_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::BenchCounters;
    use proptest::prelude::*;

    fn result(elapsed: f64, adds: u32, contains: u32) -> BenchResult {
        BenchResult::new(
            elapsed,
            BenchCounters {
                successful_adds: adds,
                successful_contains: contains,
                ..BenchCounters::default()
            },
        )
    }

    fn bucket(threads: u16, results: Vec<BenchResult>) -> RunBucket {
        RunBucket { threads, results }
    }

    #[test]
    fn test_throughput_is_ratio_of_sums() {
        // Mean of per-run ratios would be (100/1 + 100/4) / 2 = 62.5.
        let b = bucket(2, vec![result(1.0, 100, 0), result(4.0, 100, 0)]);
        let row = aggregate_bucket(&b).unwrap();
        assert!((row.throughput - 40.0).abs() < 1e-9);
        assert!((row.elapsed_secs - 2.5).abs() < 1e-9);
        assert!((row.total_operations - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_counters_averaged_from_own_fields() {
        let b = bucket(
            1,
            vec![
                BenchResult::new(
                    1.0,
                    BenchCounters {
                        successful_adds: 10,
                        failed_adds: 20,
                        successful_removes: 30,
                        failed_removes: 40,
                        successful_contains: 50,
                        failed_contains: 60,
                    },
                ),
                BenchResult::new(
                    1.0,
                    BenchCounters {
                        successful_adds: 12,
                        failed_adds: 22,
                        successful_removes: 32,
                        failed_removes: 42,
                        successful_contains: 52,
                        failed_contains: 62,
                    },
                ),
            ],
        );
        let row = aggregate_bucket(&b).unwrap();
        assert_eq!(row.repetitions, 2);
        assert!((row.successful_adds - 11.0).abs() < 1e-9);
        assert!((row.failed_adds - 21.0).abs() < 1e-9);
        assert!((row.successful_removes - 31.0).abs() < 1e-9);
        assert!((row.failed_removes - 41.0).abs() < 1e-9);
        assert!((row.successful_contains - 51.0).abs() < 1e-9);
        assert!((row.failed_contains - 61.0).abs() < 1e-9);
        assert!((row.total_operations - 216.0).abs() < 1e-9);
        assert!((row.throughput - 216.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_bucket_is_an_error() {
        assert_eq!(
            aggregate_bucket(&bucket(8, vec![])),
            Err(AggregateError::EmptyBucket { threads: 8 })
        );
    }

    #[test]
    fn test_zero_elapsed_is_an_error() {
        let b = bucket(4, vec![result(0.0, 5, 5), result(0.0, 0, 0)]);
        assert_eq!(
            aggregate_bucket(&b),
            Err(AggregateError::ZeroElapsed { threads: 4 })
        );
    }

    #[test]
    fn test_partial_zero_elapsed_is_fine() {
        let b = bucket(4, vec![result(0.0, 0, 0), result(2.0, 10, 0)]);
        let row = aggregate_bucket(&b).unwrap();
        assert!((row.throughput - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_buckets_keeps_order() {
        let buckets = vec![
            bucket(8, vec![result(1.0, 8, 0)]),
            bucket(1, vec![result(1.0, 1, 0)]),
            bucket(4, vec![result(1.0, 4, 0)]),
        ];
        let rows = aggregate_buckets(&buckets).unwrap();
        let axis: Vec<u16> = rows.iter().map(|r| r.threads).collect();
        assert_eq!(axis, vec![8, 1, 4]);
    }

    #[test]
    fn test_aggregate_buckets_stops_at_first_error() {
        let buckets = vec![bucket(1, vec![result(1.0, 1, 0)]), bucket(2, vec![])];
        assert_eq!(
            aggregate_buckets(&buckets),
            Err(AggregateError::EmptyBucket { threads: 2 })
        );
    }

    fn arb_result() -> impl Strategy<Value = BenchResult> {
        (
            0.001f64..100.0,
            any::<[u16; 6]>(),
        )
            .prop_map(|(elapsed, c)| {
                BenchResult::new(
                    elapsed,
                    BenchCounters {
                        successful_adds: u32::from(c[0]),
                        failed_adds: u32::from(c[1]),
                        successful_removes: u32::from(c[2]),
                        failed_removes: u32::from(c[3]),
                        successful_contains: u32::from(c[4]),
                        failed_contains: u32::from(c[5]),
                    },
                )
            })
    }

    proptest! {
        #[test]
        fn prop_order_independent(
            (results, shuffled) in prop::collection::vec(arb_result(), 1..12)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            let a = aggregate_bucket(&bucket(3, results)).unwrap();
            let b = aggregate_bucket(&bucket(3, shuffled)).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_total_is_sum_of_counter_means(results in prop::collection::vec(arb_result(), 1..12)) {
            let row = aggregate_bucket(&bucket(1, results)).unwrap();
            let parts = row.successful_adds + row.failed_adds
                + row.successful_removes + row.failed_removes
                + row.successful_contains + row.failed_contains;
            prop_assert!((parts - row.total_operations).abs() <= 1e-6 * row.total_operations.max(1.0));
        }
    }
}
