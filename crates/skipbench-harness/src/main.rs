//! skipbench - Thread-count sweep harness for concurrent skip list engines.

mod cli;
mod config;
mod progress;
mod report;
mod summary;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::HarnessConfig;
use owo_colors::OwoColorize;
use progress::SweepProgressBar;
use report::export_json;
use skipbench_core::{
    BenchmarkDefinition, CONTRACT_VERSION, DataWriter, NativeEngine, RunId, SweepController,
    SweepMode, SweepProgress,
};
use summary::render_summary;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Set up logging with indicatif integration so log lines render above
    // the progress bar. RUST_LOG wins over the verbose flag.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("info")
        } else {
            EnvFilter::new("warn")
        }
    });

    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(indicatif_layer.get_stderr_writer()),
        )
        .with(indicatif_layer)
        .with(filter)
        .init();

    let config = cli.into_config().context("Failed to create benchmark config")?;

    // Reject the whole suite before the first engine call.
    for definition in &config.definitions {
        definition
            .validate()
            .with_context(|| format!("Invalid benchmark '{}'", definition.name))?;
    }

    let run = RunId::now();
    print_banner(&config, &run);

    if config.dry_run {
        print_plan(&config.definitions);
        return Ok(());
    }

    let engine = open_engine()?;
    tracing::info!("Starting benchmark run at {}", run);

    let mut writer = DataWriter::new(&config.basedir).with_delimiter(config.delimiter);
    let mut controller = SweepController::new(engine);

    for definition in &config.definitions {
        let bar = SweepProgressBar::new(definition, config.color);
        let on_progress = |p: &SweepProgress<'_>| bar.update(p);
        let outcome = controller.run(definition, &run, &mut writer, Some(&on_progress));
        let elapsed = bar.finish();

        outcome.with_context(|| format!("Benchmark '{}' failed", definition.name))?;
        tracing::info!("'{}' finished in {:.1?}", definition.name, elapsed);
    }

    println!();
    let mut stdout = std::io::stdout();
    render_summary(&mut stdout, writer.tables(), config.color)?;

    if let Some(path) = &config.json {
        export_json(&run, &config.basedir, writer.tables(), path)
            .context("Failed to export JSON")?;
        println!("Results exported to: {}", path.display());
    }

    println!("Data written to: {}", writer.run_dir(&run).display());

    // Let the indicatif tick thread wind down before exit.
    std::thread::sleep(std::time::Duration::from_millis(100));

    Ok(())
}

#[cfg(feature = "native-engine")]
#[allow(clippy::unnecessary_wraps)]
fn open_engine() -> Result<NativeEngine> {
    Ok(NativeEngine::linked())
}

#[cfg(not(feature = "native-engine"))]
fn open_engine() -> Result<NativeEngine> {
    anyhow::bail!(
        "skipbench was built without the native engine; rebuild with `--features native-engine` \
         and SKIPBENCH_ENGINE_DIR pointing at the engine library (or use --dry-run)"
    )
}

/// Print the banner with configuration summary.
fn print_banner(config: &HarnessConfig, run: &RunId) {
    println!();
    if config.color {
        println!("{}", "skipbench - Skip List Benchmark".bold().cyan());
    } else {
        println!("skipbench - Skip List Benchmark");
    }
    println!();
    println!("Run: {run}");
    println!("Output: {}", config.basedir.join("data").join(run.as_str()).display());
    println!("Contract version: {CONTRACT_VERSION}");
    println!(
        "Benchmarks: {}",
        config
            .definitions
            .iter()
            .map(|d| d.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();
}

/// Print what a run would do, without doing it.
fn print_plan(definitions: &[BenchmarkDefinition]) {
    let mut total_secs = 0u64;
    for definition in definitions {
        let calls = definition.invocation_count();
        let secs = calls as u64 * u64::from(definition.parameters.duration_secs);
        total_secs += secs;

        let mode = match &definition.mode {
            SweepMode::Sequential => "sequential".to_string(),
            SweepMode::Parallel { variants, .. } => variants
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        };
        println!("{}: {mode}", definition.name);
        println!("  threads: {:?}", definition.thread_axis());
        println!(
            "  {} repetitions per point, {calls} engine calls, ~{secs}s",
            definition.repetitions_per_point
        );
    }
    println!();
    println!("Estimated measurement time: ~{total_secs}s");
}
