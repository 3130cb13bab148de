//! Per-file word trie.
//!
//! Words are counted into a [`TrieBuilder`]; [`TrieBuilder::finish`] runs the
//! single normalisation pass and hands back an immutable [`WordTrie`]. There
//! is no way to add words to a finished trie, so frequencies are written
//! exactly once.
//!
//! All traversals use an explicit stack. Trie depth equals the longest token
//! in the file, which is unbounded for adversarial input.

use super::alphabet::{self, ALPHABET_SIZE};

pub(crate) struct TrieNode {
    children: [Option<Box<TrieNode>>; ALPHABET_SIZE],
    count: usize,
    frequency: f64,
    end_of_word: bool,
}

impl TrieNode {
    fn new() -> Self {
        Self {
            children: std::array::from_fn(|_| None),
            count: 0,
            frequency: 0.0,
            end_of_word: false,
        }
    }
}

/// A word occurrence table under construction.
pub struct TrieBuilder {
    root: TrieNode,
    total_words: usize,
    distinct_words: usize,
}

impl Default for TrieBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrieBuilder {
    pub fn new() -> Self {
        Self {
            root: TrieNode::new(),
            total_words: 0,
            distinct_words: 0,
        }
    }

    /// Count one occurrence of the word spelled by `symbols` (alphabet
    /// indices). Empty words are ignored and `false` is returned.
    pub fn insert(&mut self, symbols: &[u8]) -> bool {
        if symbols.is_empty() {
            return false;
        }

        let mut node = &mut self.root;
        for &symbol in symbols {
            node = &mut **node.children[symbol as usize]
                .get_or_insert_with(|| Box::new(TrieNode::new()));
        }

        if node.end_of_word {
            node.count += 1;
        } else {
            node.end_of_word = true;
            node.count = 1;
            self.distinct_words += 1;
        }
        self.total_words += 1;
        true
    }

    pub fn total_words(&self) -> usize {
        self.total_words
    }

    /// Set `frequency = count / total_words` on every word node (0 when the
    /// trie is empty) and freeze the trie.
    pub fn finish(mut self) -> WordTrie {
        let total = self.total_words;
        let root = std::mem::replace(&mut self.root, TrieNode::new());
        let mut trie = WordTrie {
            root,
            total_words: total,
            distinct_words: self.distinct_words,
        };

        let mut stack: Vec<&mut TrieNode> = vec![&mut trie.root];
        while let Some(node) = stack.pop() {
            if node.end_of_word {
                node.frequency = if total == 0 {
                    0.0
                } else {
                    node.count as f64 / total as f64
                };
            }
            stack.extend(node.children.iter_mut().flatten().map(|child| &mut **child));
        }

        trie
    }
}

impl Drop for TrieBuilder {
    fn drop(&mut self) {
        drop_children(&mut self.root);
    }
}

/// The normalised word-frequency distribution of one file.
pub struct WordTrie {
    root: TrieNode,
    total_words: usize,
    distinct_words: usize,
}

/// One word of a [`WordTrie`], as yielded by [`WordTrie::entries`].
#[derive(Debug, Clone, PartialEq)]
pub struct WordEntry {
    /// Alphabet indices spelling the word.
    pub symbols: Vec<u8>,
    pub count: usize,
    pub frequency: f64,
}

impl WordEntry {
    pub fn word(&self) -> String {
        alphabet::spell(&self.symbols)
    }
}

impl WordTrie {
    pub fn total_words(&self) -> usize {
        self.total_words
    }

    pub fn distinct_words(&self) -> usize {
        self.distinct_words
    }

    pub fn is_empty(&self) -> bool {
        self.total_words == 0
    }

    /// Occurrences of `word`; 0 when absent or when it contains a byte outside
    /// the alphabet.
    pub fn count(&self, word: &str) -> usize {
        self.find(word).map_or(0, |node| node.count)
    }

    pub fn frequency(&self, word: &str) -> f64 {
        self.find(word).map_or(0.0, |node| node.frequency)
    }

    fn find(&self, word: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for byte in word.bytes() {
            let index = alphabet::symbol_index(byte)?;
            node = node.children[index as usize].as_deref()?;
        }
        node.end_of_word.then_some(node)
    }

    /// Every word in alphabet order (depth first, hyphen < digits < letters).
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            stack: vec![(&self.root, 0, None)],
            path: Vec::new(),
        }
    }
}

impl Drop for WordTrie {
    fn drop(&mut self) {
        drop_children(&mut self.root);
    }
}

impl std::fmt::Debug for WordTrie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordTrie")
            .field("total_words", &self.total_words)
            .field("distinct_words", &self.distinct_words)
            .finish()
    }
}

pub struct Entries<'a> {
    stack: Vec<(&'a TrieNode, usize, Option<u8>)>,
    path: Vec<u8>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = WordEntry;

    fn next(&mut self) -> Option<WordEntry> {
        while let Some((node, depth, symbol)) = self.stack.pop() {
            if let Some(symbol) = symbol {
                self.path.truncate(depth - 1);
                self.path.push(symbol);
            }

            // Reverse so the lowest symbol is popped first.
            for (index, child) in node.children.iter().enumerate().rev() {
                if let Some(child) = child {
                    self.stack.push((&**child, depth + 1, Some(index as u8)));
                }
            }

            if node.end_of_word {
                return Some(WordEntry {
                    symbols: self.path.clone(),
                    count: node.count,
                    frequency: node.frequency,
                });
            }
        }
        None
    }
}

fn drop_children(root: &mut TrieNode) {
    let mut stack: Vec<Box<TrieNode>> = root.children.iter_mut().filter_map(Option::take).collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.children.iter_mut().filter_map(Option::take));
    }
}
