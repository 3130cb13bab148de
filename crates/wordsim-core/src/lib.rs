pub mod config;
pub mod engine;
pub mod error;
pub mod jsd;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod wfd;

pub use config::AppConfig;
pub use engine::{CompareEngine, CompareResult, ComparisonRow};
pub use error::Error;
pub use jsd::{OrderedResultList, PairRecord};
pub use pipeline::PipelineStats;
pub use progress::{ProgressReporter, SilentReporter};
pub use wfd::WfdRecord;
