/// Trait for reporting comparison progress.
///
/// The CLI implements it with tracing/indicatif. Methods are called from
/// worker threads. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_discovery_start(&self) {}
    fn on_file_processed(&self, _files_done: usize) {}
    fn on_discovery_complete(&self, _total_files: usize, _duration_secs: f64) {}
    fn on_compare_start(&self, _total_pairs: usize) {}
    /// Reported once per finished pair range, not per pair.
    fn on_pairs_computed(&self, _pairs_done: usize, _total_pairs: usize) {}
    fn on_compare_complete(&self, _total_pairs: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
