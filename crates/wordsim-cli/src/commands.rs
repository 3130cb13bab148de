use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use wordsim_core::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "wordsim")]
#[command(
    about = "Pairwise Jensen-Shannon distance between the word distributions of text files",
    long_about = None
)]
pub struct Cli {
    /// Files and directories to compare. Replaces the configured root paths.
    pub paths: Vec<PathBuf>,

    /// Directory walker threads
    #[arg(short = 'd', long, value_name = "N")]
    pub directory_threads: Option<NonZeroUsize>,

    /// File processor threads
    #[arg(short = 'f', long, value_name = "N")]
    pub file_threads: Option<NonZeroUsize>,

    /// Pair analysis threads
    #[arg(short = 'a', long, value_name = "N")]
    pub analysis_threads: Option<NonZeroUsize>,

    /// File name suffix to compare; `-s` alone compares every file.
    /// Attach the value (`-s.log`) so it is not taken from the next path.
    #[arg(short = 's', long, value_name = "SUFFIX", num_args = 0..=1, default_missing_value = "")]
    pub suffix: Option<String>,

    /// Also write the results to a CSV file
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Hide progress bars
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Flags override configured values.
    pub fn apply(&self, config: &mut AppConfig) {
        if !self.paths.is_empty() {
            config.root_paths = self
                .paths
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
        }
        if let Some(n) = self.directory_threads {
            config.directory_threads = n.get();
        }
        if let Some(n) = self.file_threads {
            config.file_threads = n.get();
        }
        if let Some(n) = self.analysis_threads {
            config.analysis_threads = n.get();
        }
        if let Some(suffix) = &self.suffix {
            config.suffix = suffix.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("wordsim").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_attached_short_values() {
        let cli = parse(&["-d4", "-f2", "-a8", "-s.log", "corpus"]);
        let mut config = AppConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.directory_threads, 4);
        assert_eq!(config.file_threads, 2);
        assert_eq!(config.analysis_threads, 8);
        assert_eq!(config.suffix, ".log");
        assert_eq!(config.root_paths, vec!["corpus"]);
    }

    #[test]
    fn test_bare_suffix_flag_is_empty_suffix() {
        let cli = parse(&["corpus", "-s"]);
        let mut config = AppConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.suffix, "");
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let cli = parse(&[]);
        let mut config = AppConfig {
            root_paths: vec!["from-config".to_string()],
            file_threads: 3,
            ..AppConfig::default()
        };
        cli.apply(&mut config);
        assert_eq!(config.root_paths, vec!["from-config"]);
        assert_eq!(config.file_threads, 3);
        assert_eq!(config.suffix, ".txt");
    }

    #[test]
    fn test_zero_and_garbage_thread_counts_rejected() {
        for bad in ["-d0", "-f-1", "-aabc"] {
            assert!(Cli::try_parse_from(["wordsim", bad, "corpus"]).is_err(), "{}", bad);
        }
    }
}
