use super::queue::WorkQueue;
use super::PipelineCounters;
use crate::progress::ProgressReporter;
use crate::wfd::{build_wfd, WfdRecord};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Shared, append-only home for every WFD the file pool produces.
#[derive(Debug, Default)]
pub struct WfdCollection {
    records: Mutex<Vec<WfdRecord>>,
}

impl WfdCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, record: WfdRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    /// Finalize the collection once both pools have drained.
    pub fn into_records(self) -> Vec<WfdRecord> {
        self.records
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Body of one file-processor thread. Runs until the file pool drains, which
/// cannot happen before every directory walker has released its producer
/// handle on `files`.
pub(crate) fn process_files(
    id: usize,
    files: &WorkQueue<PathBuf>,
    results: &WfdCollection,
    counters: &PipelineCounters,
    reporter: &dyn ProgressReporter,
) {
    let mut member = files.member();
    let mut built = 0usize;
    while let Some(path) = member.next() {
        match build_wfd(&path) {
            Ok(record) => {
                results.append(record);
                built += 1;
                let done = counters.files_processed.fetch_add(1, Ordering::Relaxed) + 1;
                reporter.on_file_processed(done);
            }
            Err(err) => {
                warn!("Skipping unreadable file {}: {}", path.display(), err);
                counters.files_skipped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
    debug!(
        "File processor {} finished after {} files from queue '{}'",
        id,
        built,
        files.name()
    );
}
