use crate::config::{self, AppConfig};
use crate::error::Error;
use crate::jsd::{self, OrderedResultList};
use crate::pipeline::{self, DiscoveryFilter, PipelineStats, PoolSizes, SuffixFilter};
use crate::progress::ProgressReporter;
use crate::wfd::WfdRecord;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct CompareEngine {
    config: AppConfig,
}

#[derive(Debug)]
pub struct CompareResult {
    pub results: OrderedResultList,
    pub records: Vec<WfdRecord>,
    pub discovery_duration: Duration,
    pub analysis_duration: Duration,
    pub stats: PipelineStats,
}

/// One output row with both file names resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonRow<'a> {
    pub file_a: &'a Path,
    pub file_b: &'a Path,
    pub jsd: f64,
    pub combined_word_count: usize,
}

impl CompareResult {
    /// Results in list order: descending combined word count.
    pub fn rows(&self) -> impl Iterator<Item = ComparisonRow<'_>> + '_ {
        self.results.iter().map(move |pair| ComparisonRow {
            file_a: self.records[pair.file_a].path(),
            file_b: self.records[pair.file_b].path(),
            jsd: pair.jsd,
            combined_word_count: pair.combined_word_count,
        })
    }

    pub fn pair_count(&self) -> usize {
        self.results.len()
    }
}

impl CompareEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Run the full comparison:
    /// 1. Seed the roots and run the directory and file pools to completion
    /// 2. Build every unordered pair and compute its JSD on the analysis pool
    /// 3. Collect the pairs into the ordered result list
    pub fn run(&self, reporter: &dyn ProgressReporter) -> Result<CompareResult, Error> {
        self.config.validate()?;

        let roots: Vec<PathBuf> = config::non_overlapping_paths(self.config.root_paths.clone())
            .into_iter()
            .map(PathBuf::from)
            .collect();
        info!("Processing paths: {:?}", roots);

        let filter = DiscoveryFilter::new(
            SuffixFilter::new(self.config.suffix.clone()),
            &self.config.ignore_patterns,
        );
        let sizes = PoolSizes {
            directory_threads: self.config.directory_threads,
            file_threads: self.config.file_threads,
        };

        // Phase 1: Discover and build WFDs
        info!("Discovering files...");
        reporter.on_discovery_start();
        let discovery_start = Instant::now();
        let output = pipeline::run_pipeline(&roots, &filter, sizes, reporter)?;
        let discovery_duration = discovery_start.elapsed();
        let records = output.records;
        reporter.on_discovery_complete(records.len(), discovery_duration.as_secs_f64());
        debug!(
            "Discovery completed in {:.2}s: {} files processed, {} skipped",
            discovery_duration.as_secs_f64(),
            output.stats.files_processed,
            output.stats.files_skipped,
        );

        if records.len() < 2 {
            return Err(Error::InsufficientInput {
                found: records.len(),
            });
        }

        // Phase 2: Pairwise JSD
        let total_pairs = jsd::pair_count(records.len());
        info!("Comparing {} files ({} pairs)...", records.len(), total_pairs);
        reporter.on_compare_start(total_pairs);
        let analysis_start = Instant::now();
        let mut pairs = jsd::build_pairs(&records);
        jsd::compute_pairs(&records, &mut pairs, self.config.analysis_threads, reporter)?;
        let results: OrderedResultList = pairs.into_iter().collect();
        let analysis_duration = analysis_start.elapsed();
        reporter.on_compare_complete(total_pairs, analysis_duration.as_secs_f64());
        debug!(
            "Analysis completed in {:.2}s on {} threads",
            analysis_duration.as_secs_f64(),
            self.config.analysis_threads,
        );

        Ok(CompareResult {
            results,
            records,
            discovery_duration,
            analysis_duration,
            stats: output.stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentReporter;
    use std::fs;
    use tempfile::tempdir;

    fn config_for(root: &Path) -> AppConfig {
        AppConfig {
            root_paths: vec![root.to_string_lossy().into_owned()],
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_rows_resolve_names_in_list_order() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("small.txt"), "one").unwrap();
        fs::write(tmp.path().join("mid.txt"), "one two").unwrap();
        fs::write(tmp.path().join("big.txt"), "one two three four").unwrap();

        let result = CompareEngine::new(config_for(tmp.path()))
            .run(&SilentReporter)
            .unwrap();
        let rows: Vec<ComparisonRow<'_>> = result.rows().collect();

        assert_eq!(rows.len(), 3);
        let counts: Vec<usize> = rows.iter().map(|r| r.combined_word_count).collect();
        assert_eq!(counts, vec![6, 5, 3]);

        let mut top = [rows[0].file_a.to_path_buf(), rows[0].file_b.to_path_buf()];
        top.sort();
        assert_eq!(top, [tmp.path().join("big.txt"), tmp.path().join("mid.txt")]);
    }

    #[test]
    fn test_single_file_is_insufficient() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("only.txt"), "lonely").unwrap();

        let err = CompareEngine::new(config_for(tmp.path()))
            .run(&SilentReporter)
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientInput { found: 1 }));
    }

    #[test]
    fn test_invalid_thread_count_fails_before_walking() {
        let config = AppConfig {
            directory_threads: 0,
            root_paths: vec!["/definitely/not/here".to_string()],
            ..AppConfig::default()
        };
        let err = CompareEngine::new(config).run(&SilentReporter).unwrap_err();
        assert!(matches!(err, Error::InvalidThreadCount { pool: "directory" }));
    }
}
