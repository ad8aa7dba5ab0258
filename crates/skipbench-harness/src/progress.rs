//! Live progress reporting during a sweep.
//!
//! Example output:
//! ```text
//! Benchmark: skiplists
//!   ⠋ LOCK_FREE  threads=20  rep 2/3   ██████████░░░░░░░░░░  41/63  ETA 00:00:22
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use skipbench_core::{BenchmarkDefinition, SweepProgress};
use std::time::Duration;

const TICK_STRINGS: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Progress bar over the engine calls of one definition.
pub struct SweepProgressBar {
    progress: ProgressBar,
    repetitions: usize,
}

impl SweepProgressBar {
    /// Print the benchmark header and start the bar.
    pub fn new(definition: &BenchmarkDefinition, color: bool) -> Self {
        if color {
            println!("{}: {}", "Benchmark".bold(), definition.name.cyan());
        } else {
            println!("Benchmark: {}", definition.name);
        }

        let progress = ProgressBar::new(definition.invocation_count() as u64);
        let template = if color {
            "  {spinner:.cyan} {msg:<32} {bar:20.cyan/dim}  {pos}/{len}  ETA {eta}"
        } else {
            "  {spinner} {msg:<32} {bar:20}  {pos}/{len}  ETA {eta}"
        };
        let style = ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░")
            .tick_strings(&TICK_STRINGS);

        progress.set_style(style);
        progress.set_message("starting...");
        progress.enable_steady_tick(Duration::from_millis(100));

        Self::with_bar(progress, definition.repetitions_per_point)
    }

    /// Bar that draws nothing.
    #[cfg(test)]
    pub fn hidden(definition: &BenchmarkDefinition) -> Self {
        let progress = ProgressBar::hidden();
        progress.set_length(definition.invocation_count() as u64);
        Self::with_bar(progress, definition.repetitions_per_point)
    }

    fn with_bar(progress: ProgressBar, repetitions: usize) -> Self {
        Self {
            progress,
            repetitions,
        }
    }

    /// Record a completed engine call.
    pub fn update(&self, p: &SweepProgress<'_>) {
        self.progress.set_position(p.completed as u64);
        self.progress
            .set_message(progress_message(p, self.repetitions));
    }

    #[cfg(test)]
    pub fn position(&self) -> u64 {
        self.progress.position()
    }

    /// Clear the bar. Returns the elapsed wall time.
    pub fn finish(self) -> Duration {
        self.progress.finish_and_clear();
        self.progress.elapsed()
    }
}

fn progress_message(p: &SweepProgress<'_>, repetitions: usize) -> String {
    format!(
        "{}  threads={}  rep {}/{}",
        p.variant,
        p.threads,
        p.repetition + 1,
        repetitions
    )
}
