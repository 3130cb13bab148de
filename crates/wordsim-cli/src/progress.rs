use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use wordsim_core::ProgressReporter;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif progress bars.
///
/// - Discovery phase: spinner (file count unknown until both pools drain)
/// - Compare phase: progress bar over the pair count
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        let mut guard = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(old) = guard.take() {
            old.finish_and_clear();
        }
        *guard = Some(pb);
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        let guard = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pb) = guard.as_ref() {
            f(pb);
        }
    }

    fn finish_bar(&self) {
        let mut guard = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }
}

fn styled(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸─")
        .tick_chars(TICK_CHARS)
}

impl ProgressReporter for CliReporter {
    fn on_discovery_start(&self) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(styled("{spinner:.cyan} {msg}"));
        pb.set_message("Discovering files...");
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_file_processed(&self, files_done: usize) {
        self.with_bar(|pb| pb.set_message(format!("Reading... {} files processed", files_done)));
    }

    fn on_discovery_complete(&self, total_files: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  {} Discovery complete: {} files in {:.2}s",
            style("✓").green(),
            total_files,
            duration_secs
        );
    }

    fn on_compare_start(&self, total_pairs: usize) {
        let pb = ProgressBar::new(total_pairs as u64);
        pb.set_style(styled(
            "  {spinner:.cyan} Comparing [{bar:30.cyan/dim}] {pos}/{len} pairs ({eta} remaining)",
        ));
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_pairs_computed(&self, pairs_done: usize, _total_pairs: usize) {
        // Ranges finish out of order; never move the bar backwards.
        self.with_bar(|pb| {
            if pairs_done as u64 > pb.position() {
                pb.set_position(pairs_done as u64);
            }
        });
    }

    fn on_compare_complete(&self, total_pairs: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  {} Comparison complete: {} pairs in {:.2}s",
            style("✓").green(),
            total_pairs,
            duration_secs
        );
    }
}
