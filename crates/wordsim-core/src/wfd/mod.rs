pub mod alphabet;
pub mod builder;
pub mod trie;

pub use builder::{build_wfd, WfdRecord};
pub use trie::{TrieBuilder, WordEntry, WordTrie};
