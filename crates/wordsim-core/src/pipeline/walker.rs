use super::filter::DiscoveryFilter;
use super::queue::{ProducerHandle, WorkQueue};
use super::PipelineCounters;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, trace, warn};

/// What a directory entry turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Candidate {
    Directory,
    File,
    Skip,
}

/// Canonical paths of every directory queued so far. Directory symlinks are
/// followed, so the same directory can be reached by several names; only the
/// first one is walked, which also ends symlink cycles.
#[derive(Debug, Default)]
pub(crate) struct VisitedDirs {
    seen: Mutex<HashSet<PathBuf>>,
}

impl VisitedDirs {
    /// `true` the first time `dir` (under any name) is offered.
    pub(crate) fn first_visit(&self, dir: &Path) -> bool {
        let key = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key)
    }
}

/// Body of one directory-walker thread.
///
/// Expands directories one level at a time until the directory pool drains,
/// then returns, dropping `files` so the file pool learns this walker can no
/// longer produce.
pub(crate) fn walk_directories(
    id: usize,
    directories: &WorkQueue<PathBuf>,
    files: ProducerHandle<'_, PathBuf>,
    filter: &DiscoveryFilter,
    visited: &VisitedDirs,
    counters: &PipelineCounters,
) {
    let mut member = directories.member();
    let mut expanded = 0usize;
    while let Some(dir) = member.next() {
        expand_directory(&dir, directories, &files, filter, visited, counters);
        expanded += 1;
    }
    debug!(
        "Directory walker {} finished after {} entries from queue '{}'",
        id,
        expanded,
        directories.name()
    );
}

fn expand_directory(
    dir: &Path,
    directories: &WorkQueue<PathBuf>,
    files: &ProducerHandle<'_, PathBuf>,
    filter: &DiscoveryFilter,
    visited: &VisitedDirs,
    counters: &PipelineCounters,
) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Skipping unreadable directory {}: {}", dir.display(), err);
            counters.entries_skipped.fetch_add(1, Ordering::Relaxed);
            return;
        }
    };
    counters.directories_expanded.fetch_add(1, Ordering::Relaxed);

    for entry_result in entries {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                debug!("Error reading entry in directory {}: {}", dir.display(), err);
                counters.entries_skipped.fetch_add(1, Ordering::Relaxed);
                continue;
            }
        };

        let path = entry.path();
        match classify(&path, filter) {
            Candidate::Directory if visited.first_visit(&path) => {
                trace!("Queueing directory {}", path.display());
                directories.push(path);
            }
            Candidate::Directory => {
                debug!("Skipping already visited directory {}", path.display());
                counters.entries_skipped.fetch_add(1, Ordering::Relaxed);
            }
            Candidate::File => {
                trace!("Queueing file {}", path.display());
                counters.files_enqueued.fetch_add(1, Ordering::Relaxed);
                files.push(path);
            }
            Candidate::Skip => {
                counters.entries_skipped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Sort one directory child into subdirectory, candidate file, or neither.
///
/// Symbolic links are followed to whatever they point at. Only regular files
/// that can be opened for reading are candidates.
pub(crate) fn classify(path: &Path, filter: &DiscoveryFilter) -> Candidate {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) => {
            debug!("Error getting metadata for {}: {}", path.display(), err);
            return Candidate::Skip;
        }
    };

    if metadata.is_dir() {
        if filter.accepts_dir(path) {
            return Candidate::Directory;
        }
        return Candidate::Skip;
    }

    if metadata.is_file() && filter.accepts_file(path) && is_readable(path) {
        return Candidate::File;
    }

    Candidate::Skip
}

fn is_readable(path: &Path) -> bool {
    match File::open(path) {
        Ok(_) => true,
        Err(err) => {
            debug!("Cannot open {}: {}", path.display(), err);
            false
        }
    }
}

/// Counts of what the roots contributed to each queue.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub directories: usize,
    pub files: usize,
    pub rejected: usize,
}

/// Put the caller's roots on the queues before any worker starts.
///
/// Directories go to the directory queue. Regular files go straight to the
/// file queue when their name carries the suffix. Roots are taken as given:
/// the hidden-name rule applies only to entries found while walking.
pub(crate) fn seed_roots(
    roots: &[PathBuf],
    directories: &WorkQueue<PathBuf>,
    files: &WorkQueue<PathBuf>,
    filter: &DiscoveryFilter,
    visited: &VisitedDirs,
) -> SeedSummary {
    let mut summary = SeedSummary::default();

    for root in roots {
        match seed_root(root, filter) {
            Ok(Candidate::Directory) if !visited.first_visit(root) => {
                debug!("Root {} names an already seeded directory", root.display());
                summary.rejected += 1;
            }
            Ok(Candidate::Directory) => {
                directories.push(root.clone());
                summary.directories += 1;
            }
            Ok(Candidate::File) => {
                files.push(root.clone());
                summary.files += 1;
            }
            Ok(Candidate::Skip) => {
                debug!("Root {} does not match the file filter", root.display());
                summary.rejected += 1;
            }
            Err(err) => {
                warn!("Invalid input {}: {}", root.display(), err);
                summary.rejected += 1;
            }
        }
    }

    summary
}

fn seed_root(root: &Path, filter: &DiscoveryFilter) -> io::Result<Candidate> {
    let metadata = fs::metadata(root)?;
    if filter.is_ignored(root) {
        return Ok(Candidate::Skip);
    }
    if metadata.is_dir() {
        return Ok(Candidate::Directory);
    }

    let suffix_matches = root
        .file_name()
        .map_or(false, |name| filter.suffix().matches(name));
    if metadata.is_file() && suffix_matches {
        File::open(root)?;
        return Ok(Candidate::File);
    }

    Ok(Candidate::Skip)
}
