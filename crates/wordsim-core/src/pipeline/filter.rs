use glob::Pattern;
use std::ffi::OsStr;
use std::path::Path;
use tracing::error;

/// Accepts file names ending in a literal, case-sensitive suffix. The empty
/// suffix accepts every name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuffixFilter {
    suffix: String,
}

impl SuffixFilter {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn accept_all() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.suffix
    }

    pub fn matches(&self, name: &OsStr) -> bool {
        self.suffix.is_empty() || name.to_string_lossy().ends_with(self.suffix.as_str())
    }
}

/// Names starting with `.` are hidden and never walked or compared.
pub fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Everything the walkers need to decide whether a path takes part in the
/// comparison.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryFilter {
    suffix: SuffixFilter,
    ignore_patterns: Vec<Pattern>,
}

impl DiscoveryFilter {
    /// Invalid glob patterns are logged and left out.
    pub fn new(suffix: SuffixFilter, ignore_globs: &[String]) -> Self {
        let ignore_patterns = ignore_globs
            .iter()
            .filter_map(|glob| match Pattern::new(glob) {
                Ok(p) => Some(p),
                Err(e) => {
                    error!("Invalid glob pattern '{}': {}", glob, e);
                    None
                }
            })
            .collect();

        Self {
            suffix,
            ignore_patterns,
        }
    }

    pub fn suffix(&self) -> &SuffixFilter {
        &self.suffix
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignore_patterns
            .iter()
            .any(|pattern| pattern.matches_path(path))
    }

    /// A directory found while walking is descended into unless hidden or
    /// ignored.
    pub fn accepts_dir(&self, path: &Path) -> bool {
        let visible = path.file_name().map_or(true, |name| !is_hidden(name));
        visible && !self.is_ignored(path)
    }

    /// A file is a candidate when it is visible, not ignored, and its name
    /// carries the suffix.
    pub fn accepts_file(&self, path: &Path) -> bool {
        match path.file_name() {
            Some(name) => !is_hidden(name) && self.suffix.matches(name) && !self.is_ignored(path),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_suffix_is_case_sensitive_and_literal() {
        let filter = SuffixFilter::new(".txt");
        assert!(filter.matches(OsStr::new("a.txt")));
        assert!(!filter.matches(OsStr::new("b.log")));
        assert!(!filter.matches(OsStr::new("c.TXT")));
        assert!(!filter.matches(OsStr::new("txt")));
        assert!(filter.matches(OsStr::new("archive.tar.txt")));
    }

    #[test]
    fn test_empty_suffix_accepts_everything() {
        let filter = SuffixFilter::accept_all();
        for name in ["a.txt", "b.log", "c.TXT", "README"] {
            assert!(filter.matches(OsStr::new(name)));
        }
    }

    #[test]
    fn test_hidden_names() {
        assert!(is_hidden(OsStr::new(".git")));
        assert!(is_hidden(OsStr::new(".notes.txt")));
        assert!(!is_hidden(OsStr::new("notes.txt")));
        assert!(!is_hidden(OsStr::new("a.b")));
    }

    #[test]
    fn test_discovery_filter_files() {
        let filter = DiscoveryFilter::new(SuffixFilter::new(".txt"), &[]);
        assert!(filter.accepts_file(Path::new("/data/a.txt")));
        assert!(!filter.accepts_file(Path::new("/data/.a.txt")));
        assert!(!filter.accepts_file(Path::new("/data/a.md")));
    }

    #[test]
    fn test_discovery_filter_dirs() {
        let filter = DiscoveryFilter::new(SuffixFilter::accept_all(), &[]);
        assert!(filter.accepts_dir(Path::new("/data/docs")));
        assert!(!filter.accepts_dir(Path::new("/data/.git")));
    }

    #[test]
    fn test_ignore_patterns() {
        let filter = DiscoveryFilter::new(
            SuffixFilter::new(".txt"),
            &["*/drafts".to_string(), "*.tmp.txt".to_string()],
        );
        assert!(!filter.accepts_dir(&PathBuf::from("/data/drafts")));
        assert!(filter.accepts_dir(&PathBuf::from("/data/final")));
        assert!(!filter.accepts_file(Path::new("/data/x.tmp.txt")));
        assert!(filter.accepts_file(Path::new("/data/x.txt")));
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let filter = DiscoveryFilter::new(SuffixFilter::accept_all(), &["[".to_string()]);
        assert!(filter.accepts_file(Path::new("/data/anything")));
    }
}
