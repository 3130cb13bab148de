//! The discovery pipeline: a directory-walker pool feeding a file-processor
//! pool through two [`WorkQueue`]s.

pub mod filter;
pub mod processor;
pub mod queue;
pub mod walker;

pub use filter::{DiscoveryFilter, SuffixFilter};
pub use processor::WfdCollection;
pub use queue::{PoolMember, ProducerHandle, QueueStats, WorkQueue};
pub use walker::SeedSummary;

use walker::VisitedDirs;

use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::wfd::WfdRecord;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, ScopedJoinHandle};
use tracing::{debug, info};

#[derive(Debug, Default)]
pub(crate) struct PipelineCounters {
    pub directories_expanded: AtomicUsize,
    pub files_enqueued: AtomicUsize,
    pub files_processed: AtomicUsize,
    pub files_skipped: AtomicUsize,
    pub entries_skipped: AtomicUsize,
}

/// What the discovery pipeline did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PipelineStats {
    pub seeded: SeedSummary,
    pub directories_expanded: usize,
    /// Files queued for processing, seeded roots included.
    pub files_enqueued: usize,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub entries_skipped: usize,
    pub directory_queue: QueueStats,
    pub file_queue: QueueStats,
}

pub struct PipelineOutput {
    pub records: Vec<WfdRecord>,
    pub stats: PipelineStats,
}

/// Worker pool sizes for the two discovery stages.
#[derive(Debug, Clone, Copy)]
pub struct PoolSizes {
    pub directory_threads: usize,
    pub file_threads: usize,
}

/// Discover and process every candidate file under `roots`.
///
/// Both pools run concurrently and this call returns only after both have
/// drained, so the returned records are final. Their order depends on
/// scheduling.
pub fn run_pipeline(
    roots: &[PathBuf],
    filter: &DiscoveryFilter,
    sizes: PoolSizes,
    reporter: &dyn ProgressReporter,
) -> Result<PipelineOutput, Error> {
    let directories: WorkQueue<PathBuf> = WorkQueue::new("directories");
    let files: WorkQueue<PathBuf> = WorkQueue::new("files");
    let counters = PipelineCounters::default();
    let results = WfdCollection::new();
    let visited = VisitedDirs::default();

    let seeded = walker::seed_roots(roots, &directories, &files, filter, &visited);
    info!(
        "Seeded {} directories and {} files ({} roots rejected)",
        seeded.directories, seeded.files, seeded.rejected
    );

    // Every walker is registered as a producer of the file queue before any
    // file processor can look at it.
    let producers: Vec<_> = (0..sizes.directory_threads)
        .map(|_| files.producer())
        .collect();

    thread::scope(|s| {
        let directories = &directories;
        let files = &files;
        let counters = &counters;
        let results = &results;
        let visited = &visited;
        let mut handles: Vec<(&'static str, ScopedJoinHandle<'_, ()>)> = Vec::new();

        let spawned = (|| -> Result<(), Error> {
            for (id, producer) in producers.into_iter().enumerate() {
                let handle = thread::Builder::new()
                    .name(format!("dir-walker-{}", id))
                    .spawn_scoped(s, move || {
                        walker::walk_directories(
                            id,
                            directories,
                            producer,
                            filter,
                            visited,
                            counters,
                        )
                    })?;
                handles.push(("directory", handle));
            }
            for id in 0..sizes.file_threads {
                let handle = thread::Builder::new()
                    .name(format!("file-proc-{}", id))
                    .spawn_scoped(s, move || {
                        processor::process_files(id, files, results, counters, reporter)
                    })?;
                handles.push(("file", handle));
            }
            Ok(())
        })();

        let mut joined = Ok(());
        for (pool, handle) in handles {
            if handle.join().is_err() && joined.is_ok() {
                joined = Err(Error::WorkerPanicked { pool });
            }
        }
        spawned.and(joined)
    })?;

    let records = results.into_records();
    let stats = PipelineStats {
        seeded,
        directories_expanded: counters.directories_expanded.load(Ordering::Relaxed),
        files_enqueued: counters.files_enqueued.load(Ordering::Relaxed) + seeded.files,
        files_processed: counters.files_processed.load(Ordering::Relaxed),
        files_skipped: counters.files_skipped.load(Ordering::Relaxed),
        entries_skipped: counters.entries_skipped.load(Ordering::Relaxed),
        directory_queue: directories.stats(),
        file_queue: files.stats(),
    };
    debug!("Pipeline stats: {:?}", stats);

    Ok(PipelineOutput { records, stats })
}
