use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Insufficient input: need at least 2 valid files, found {found}")]
    InsufficientInput { found: usize },

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("A {pool} worker panicked")]
    WorkerPanicked { pool: &'static str },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid thread count for the {pool} pool: must be at least 1")]
    InvalidThreadCount { pool: &'static str },
}
