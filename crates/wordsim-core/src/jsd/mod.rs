//! Pairwise comparison: merged tries, Jensen-Shannon distance, pair
//! partitioning and the ordered result list.

pub mod merged;
pub mod ordered;
pub mod pairs;

pub use merged::{jensen_shannon, MergedTrie, Side};
pub use ordered::OrderedResultList;
pub use pairs::{build_pairs, compute_pairs, pair_count, partition, PairRecord};
