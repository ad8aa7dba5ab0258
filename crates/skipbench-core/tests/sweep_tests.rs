//! Sweep controller behavior against a scripted engine.

mod common;

use common::{Call, ScriptedEngine, read_table, test_params, test_run_id};
use skipbench_core::{
    BenchmarkDefinition, ConfigError, DataWriter, EngineError, HarnessError,
    ImplementationVariant, SweepController, SweepProgress,
};
use std::cell::RefCell;
use tempfile::TempDir;

// =============================================================================
// Sweep shape
// =============================================================================

#[test]
fn test_parallel_sweep_one_row_per_axis_value() {
    let tmp = TempDir::new().unwrap();
    let run = test_run_id();
    let def = BenchmarkDefinition::parallel(
        "skiplists",
        vec![1, 2, 4],
        vec![ImplementationVariant::Coarse],
        test_params(),
        2,
    );

    let mut writer = DataWriter::new(tmp.path());
    let mut controller = SweepController::new(ScriptedEngine::new());
    controller.run(&def, &run, &mut writer, None).unwrap();

    let tables = writer.tables();
    assert_eq!(tables.len(), 1);
    let rows = &tables[0].rows;
    assert_eq!(rows.len(), 3);
    for (row, threads) in rows.iter().zip([1u16, 2, 4]) {
        assert_eq!(row.threads, threads);
        assert_eq!(row.repetitions, 2);
        assert!((row.failed_contains - 1.0).abs() < 1e-9);
    }

    // Calls 0,1 at 1 thread: adds 100 and 101, mean 100.5.
    assert!((rows[0].successful_adds - 100.5).abs() < 1e-9);
    // Calls 4,5 at 4 threads: adds 404 and 405.
    assert!((rows[2].successful_adds - 404.5).abs() < 1e-9);
    assert!((rows[2].throughput - 405.5).abs() < 1e-9);

    assert_eq!(controller.engine().calls.len(), 6);
}

#[test]
fn test_variants_are_outer_loop() {
    let tmp = TempDir::new().unwrap();
    let def = BenchmarkDefinition::parallel(
        "order",
        vec![2, 1],
        vec![ImplementationVariant::Fine, ImplementationVariant::LockFree],
        test_params(),
        1,
    );

    let mut writer = DataWriter::new(tmp.path());
    let mut controller = SweepController::new(ScriptedEngine::new());
    controller
        .run(&def, &test_run_id(), &mut writer, None)
        .unwrap();

    let calls = controller.into_engine().calls;
    assert_eq!(
        calls,
        vec![
            Call::Parallel { threads: 2, variant: ImplementationVariant::Fine },
            Call::Parallel { threads: 1, variant: ImplementationVariant::Fine },
            Call::Parallel { threads: 2, variant: ImplementationVariant::LockFree },
            Call::Parallel { threads: 1, variant: ImplementationVariant::LockFree },
        ]
    );

    let variants: Vec<_> = writer.tables().iter().map(|t| t.variant).collect();
    assert_eq!(
        variants,
        vec![ImplementationVariant::Fine, ImplementationVariant::LockFree]
    );
    // Each variant's rows start from an empty bucket set.
    for table in writer.tables() {
        let axis: Vec<u16> = table.rows.iter().map(|r| r.threads).collect();
        assert_eq!(axis, vec![2, 1]);
    }
}

#[test]
fn test_sequential_mode_uses_sequential_entry_point() {
    let tmp = TempDir::new().unwrap();
    let run = test_run_id();
    let def = BenchmarkDefinition::sequential("sequential", test_params(), 3);

    let mut writer = DataWriter::new(tmp.path());
    let mut controller = SweepController::new(ScriptedEngine::new());
    controller.run(&def, &run, &mut writer, None).unwrap();

    assert_eq!(controller.engine().calls, vec![Call::Sequential; 3]);

    let table = &writer.tables()[0];
    assert_eq!(table.variant, ImplementationVariant::Sequential);
    assert_eq!(
        table.path,
        tmp.path()
            .join("data")
            .join(run.as_str())
            .join("avg")
            .join("sequential.data")
    );

    let (_, rows) = read_table(&table.path, ' ');
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "1");
}

#[test]
fn test_progress_reports_every_call() {
    let tmp = TempDir::new().unwrap();
    let def = BenchmarkDefinition::parallel(
        "progress",
        vec![1, 2],
        vec![ImplementationVariant::Coarse],
        test_params(),
        3,
    );

    let seen = RefCell::new(Vec::new());
    let callback = |p: &SweepProgress<'_>| {
        seen.borrow_mut()
            .push((p.threads, p.repetition, p.completed, p.total));
    };

    let mut writer = DataWriter::new(tmp.path());
    let mut controller = SweepController::new(ScriptedEngine::new());
    controller
        .run(&def, &test_run_id(), &mut writer, Some(&callback))
        .unwrap();

    let seen = seen.into_inner();
    assert_eq!(seen.len(), 6);
    assert_eq!(seen[0], (1, 0, 1, 6));
    assert_eq!(seen[5], (2, 2, 6, 6));
}

// =============================================================================
// Rejections before the engine is touched
// =============================================================================

#[test]
fn test_zero_repetitions_rejected_without_calls() {
    let tmp = TempDir::new().unwrap();
    let def = BenchmarkDefinition::parallel(
        "empty",
        vec![1, 2],
        vec![ImplementationVariant::Coarse],
        test_params(),
        0,
    );

    let mut writer = DataWriter::new(tmp.path());
    let mut controller = SweepController::new(ScriptedEngine::new());
    let err = controller
        .run(&def, &test_run_id(), &mut writer, None)
        .unwrap_err();

    assert!(matches!(
        err,
        HarnessError::Config {
            source: ConfigError::ZeroRepetitions,
            ..
        }
    ));
    assert!(controller.engine().calls.is_empty());
    assert!(!tmp.path().join("data").exists());
}

#[test]
fn test_empty_axis_rejected_without_calls() {
    let tmp = TempDir::new().unwrap();
    let def = BenchmarkDefinition::parallel(
        "empty",
        vec![],
        vec![ImplementationVariant::Coarse],
        test_params(),
        1,
    );

    let mut writer = DataWriter::new(tmp.path());
    let mut controller = SweepController::new(ScriptedEngine::new());
    let err = controller
        .run(&def, &test_run_id(), &mut writer, None)
        .unwrap_err();

    assert!(matches!(
        err,
        HarnessError::Config {
            source: ConfigError::EmptyThreadAxis,
            ..
        }
    ));
    assert!(controller.engine().calls.is_empty());
}

#[test]
fn test_invalid_parameters_rejected_without_calls() {
    let tmp = TempDir::new().unwrap();
    let mut params = test_params();
    params.duration_secs = 0;
    let def = BenchmarkDefinition::sequential("sequential", params, 1);

    let mut writer = DataWriter::new(tmp.path());
    let mut controller = SweepController::new(ScriptedEngine::new());
    let err = controller
        .run(&def, &test_run_id(), &mut writer, None)
        .unwrap_err();

    assert!(matches!(
        err,
        HarnessError::Config {
            source: ConfigError::ZeroDuration,
            ..
        }
    ));
    assert!(controller.engine().calls.is_empty());
}

// =============================================================================
// Engine failures
// =============================================================================

#[test]
fn test_engine_failure_aborts_and_skips_variant_output() {
    let tmp = TempDir::new().unwrap();
    let run = test_run_id();
    let def = BenchmarkDefinition::parallel(
        "abort",
        vec![1, 2],
        vec![ImplementationVariant::Coarse, ImplementationVariant::Fine],
        test_params(),
        1,
    );

    // Calls 0,1 finish COARSE; call 3 is FINE at 2 threads.
    let mut writer = DataWriter::new(tmp.path());
    let mut controller = SweepController::new(ScriptedEngine::failing_at(3));
    let err = controller.run(&def, &run, &mut writer, None).unwrap_err();

    match err {
        HarnessError::Invocation {
            benchmark,
            variant,
            threads,
            repetition,
            source,
        } => {
            assert_eq!(benchmark, "abort");
            assert_eq!(variant, ImplementationVariant::Fine);
            assert_eq!(threads, 2);
            assert_eq!(repetition, 0);
            assert!(matches!(source, EngineError::Failed(_)));
        }
        other => panic!("expected invocation error, got {other:?}"),
    }

    // Nothing after the failing call.
    assert_eq!(controller.engine().calls.len(), 4);

    let bench_dir = tmp.path().join("data").join(run.as_str()).join("abort");
    assert!(bench_dir.join("coarse.data").exists());
    assert!(!bench_dir.join("fine.data").exists());
    assert_eq!(writer.tables().len(), 1);
}

#[test]
fn test_zero_thread_count_never_reaches_engine() {
    let def = BenchmarkDefinition::parallel(
        "zero",
        vec![0],
        vec![ImplementationVariant::Coarse],
        test_params(),
        1,
    );
    let tmp = TempDir::new().unwrap();
    let mut writer = DataWriter::new(tmp.path());
    let mut controller = SweepController::new(ScriptedEngine::new());

    let err = controller
        .run(&def, &test_run_id(), &mut writer, None)
        .unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Config {
            source: ConfigError::ZeroThreadCount,
            ..
        }
    ));
    assert!(controller.engine().calls.is_empty());
}
