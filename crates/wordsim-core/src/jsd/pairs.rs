use super::merged::jensen_shannon;
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::wfd::WfdRecord;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, trace};

/// One unordered comparison. `file_a` and `file_b` index the finalized record
/// vector the pair was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairRecord {
    pub file_a: usize,
    pub file_b: usize,
    pub combined_word_count: usize,
    pub jsd: f64,
}

/// `n * (n - 1) / 2`, or 0 for fewer than two records.
pub fn pair_count(records: usize) -> usize {
    if records < 2 {
        0
    } else {
        records * (records - 1) / 2
    }
}

/// One pair for every `i < j` over `records`, JSD not yet computed.
pub fn build_pairs(records: &[WfdRecord]) -> Vec<PairRecord> {
    let mut pairs = Vec::with_capacity(pair_count(records.len()));
    for (i, a) in records.iter().enumerate() {
        for (j, b) in records.iter().enumerate().skip(i + 1) {
            pairs.push(PairRecord {
                file_a: i,
                file_b: j,
                combined_word_count: a.word_count() + b.word_count(),
                jsd: 0.0,
            });
        }
    }
    pairs
}

/// Split `[0, total)` into `workers` contiguous ranges. Each range gets
/// `total / workers` items and the first `total % workers` get one more.
/// Ranges are empty when there are more workers than items.
pub fn partition(total: usize, workers: usize) -> Vec<Range<usize>> {
    if workers == 0 {
        return Vec::new();
    }

    let quotient = total / workers;
    let remainder = total % workers;
    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for worker in 0..workers {
        let len = quotient + usize::from(worker < remainder);
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

/// Compute the JSD of every pair in place on a pool of `threads` workers, each
/// owning one contiguous range of `pairs`.
pub fn compute_pairs(
    records: &[WfdRecord],
    pairs: &mut [PairRecord],
    threads: usize,
    reporter: &dyn ProgressReporter,
) -> Result<(), Error> {
    if threads == 0 {
        return Err(Error::InvalidThreadCount { pool: "analysis" });
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("pair-worker-{}", i))
        .build()?;

    let total = pairs.len();
    let ranges = partition(total, threads);
    let done = AtomicUsize::new(0);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pool.scope(|s| {
            let done = &done;
            let mut rest: &mut [PairRecord] = pairs;
            for (worker, range) in ranges.into_iter().enumerate() {
                let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
                rest = tail;
                if chunk.is_empty() {
                    continue;
                }
                s.spawn(move |_| {
                    trace!("Pair worker {} computing pairs {:?}", worker, range);
                    for pair in chunk.iter_mut() {
                        pair.jsd = jensen_shannon(
                            records[pair.file_a].trie(),
                            records[pair.file_b].trie(),
                        );
                    }
                    let finished = done.fetch_add(chunk.len(), Ordering::Relaxed) + chunk.len();
                    reporter.on_pairs_computed(finished, total);
                });
            }
        })
    }));

    if outcome.is_err() {
        return Err(Error::WorkerPanicked { pool: "analysis" });
    }
    debug!("Computed {} pairs on {} threads", total, threads);
    Ok(())
}
