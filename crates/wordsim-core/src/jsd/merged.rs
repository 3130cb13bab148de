//! Combined vocabulary of two files and the divergences computed over it.

use crate::wfd::alphabet::{self, ALPHABET_SIZE};
use crate::wfd::WordTrie;

/// Which file of a pair a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

struct MergedNode {
    children: [Option<Box<MergedNode>>; ALPHABET_SIZE],
    count_a: usize,
    count_b: usize,
    frequency_a: f64,
    frequency_b: f64,
    avg_frequency: f64,
    end_of_word: bool,
}

impl MergedNode {
    fn new() -> Self {
        Self {
            children: std::array::from_fn(|_| None),
            count_a: 0,
            count_b: 0,
            frequency_a: 0.0,
            frequency_b: 0.0,
            avg_frequency: 0.0,
            end_of_word: false,
        }
    }

    fn frequency(&self, side: Side) -> f64 {
        match side {
            Side::A => self.frequency_a,
            Side::B => self.frequency_b,
        }
    }
}

/// Per-word view of a [`MergedTrie`] node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergedWord {
    pub count_a: usize,
    pub count_b: usize,
    pub frequency_a: f64,
    pub frequency_b: f64,
    pub avg_frequency: f64,
}

/// Trie holding the union of two files' vocabularies, each word tagged with
/// both files' counts and frequencies (zero on the side that lacks it).
/// Lives for one pair computation.
pub struct MergedTrie {
    root: MergedNode,
    distinct_words: usize,
}

impl MergedTrie {
    /// Insert every word of `a` as side A and every word of `b` as side B,
    /// then set each word's average frequency.
    pub fn merge(a: &WordTrie, b: &WordTrie) -> Self {
        let mut merged = Self {
            root: MergedNode::new(),
            distinct_words: 0,
        };
        for entry in a.entries() {
            merged.insert(&entry.symbols, Side::A, entry.count, entry.frequency);
        }
        for entry in b.entries() {
            merged.insert(&entry.symbols, Side::B, entry.count, entry.frequency);
        }
        merged.set_averages();
        merged
    }

    fn insert(&mut self, symbols: &[u8], side: Side, count: usize, frequency: f64) {
        let mut node = &mut self.root;
        for &symbol in symbols {
            node = &mut **node.children[symbol as usize]
                .get_or_insert_with(|| Box::new(MergedNode::new()));
        }

        if !node.end_of_word {
            node.end_of_word = true;
            self.distinct_words += 1;
        }
        match side {
            Side::A => {
                node.count_a = count;
                node.frequency_a = frequency;
            }
            Side::B => {
                node.count_b = count;
                node.frequency_b = frequency;
            }
        }
    }

    fn set_averages(&mut self) {
        let mut stack: Vec<&mut MergedNode> = vec![&mut self.root];
        while let Some(node) = stack.pop() {
            if node.end_of_word {
                node.avg_frequency = 0.5 * (node.frequency_a + node.frequency_b);
            }
            stack.extend(node.children.iter_mut().flatten().map(|child| &mut **child));
        }
    }

    pub fn distinct_words(&self) -> usize {
        self.distinct_words
    }

    pub fn word(&self, word: &str) -> Option<MergedWord> {
        let mut node = &self.root;
        for byte in word.bytes() {
            let index = alphabet::symbol_index(byte)?;
            node = node.children[index as usize].as_deref()?;
        }
        node.end_of_word.then(|| MergedWord {
            count_a: node.count_a,
            count_b: node.count_b,
            frequency_a: node.frequency_a,
            frequency_b: node.frequency_b,
            avg_frequency: node.avg_frequency,
        })
    }

    /// Kullback-Leibler divergence (base 2) of one side's distribution from
    /// the averaged distribution, summed over the words that side contains.
    ///
    /// Words are visited in alphabet order, so `kld(A)` of `merge(x, y)` and
    /// `kld(B)` of `merge(y, x)` add the same terms in the same order.
    pub fn kld(&self, side: Side) -> f64 {
        let mut sum = 0.0;
        let mut stack: Vec<&MergedNode> = vec![&self.root];
        while let Some(node) = stack.pop() {
            if node.end_of_word {
                let frequency = node.frequency(side);
                if frequency > 0.0 {
                    sum += frequency * (frequency / node.avg_frequency).log2();
                }
            }
            for child in node.children.iter().rev().flatten() {
                stack.push(child);
            }
        }
        sum
    }
}

impl Drop for MergedTrie {
    fn drop(&mut self) {
        let mut stack: Vec<Box<MergedNode>> =
            self.root.children.iter_mut().filter_map(Option::take).collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.children.iter_mut().filter_map(Option::take));
        }
    }
}

/// Jensen-Shannon distance between two word distributions:
/// `sqrt(0.5 * KLD_A + 0.5 * KLD_B)`, in `[0, 1]`.
///
/// Two empty files are identical by definition and score 0.
pub fn jensen_shannon(a: &WordTrie, b: &WordTrie) -> f64 {
    if a.total_words() + b.total_words() == 0 {
        return 0.0;
    }

    let merged = MergedTrie::merge(a, b);
    let kld_a = merged.kld(Side::A);
    let kld_b = merged.kld(Side::B);

    // Rounding can push the divergence a hair outside its bounds.
    (0.5 * kld_a + 0.5 * kld_b).clamp(0.0, 1.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wfd::builder::wfd_from_reader;
    use std::path::PathBuf;

    fn trie(text: &str) -> WordTrie {
        wfd_from_reader(PathBuf::from("mem"), text.as_bytes())
            .unwrap()
            .into_trie()
    }

    #[test]
    fn test_merge_tags_both_sides() {
        let a = trie("the cat sat");
        let b = trie("the dog the");
        let merged = MergedTrie::merge(&a, &b);

        assert_eq!(merged.distinct_words(), 4);

        let the = merged.word("the").unwrap();
        assert_eq!(the.count_a, 1);
        assert_eq!(the.count_b, 2);
        assert_eq!(the.frequency_a, 1.0 / 3.0);
        assert_eq!(the.frequency_b, 2.0 / 3.0);
        assert_eq!(the.avg_frequency, 0.5 * (1.0 / 3.0 + 2.0 / 3.0));

        let cat = merged.word("cat").unwrap();
        assert_eq!((cat.count_a, cat.count_b), (1, 0));
        assert_eq!(cat.frequency_b, 0.0);
        assert_eq!(cat.avg_frequency, 0.5 / 3.0);

        let dog = merged.word("dog").unwrap();
        assert_eq!((dog.count_a, dog.count_b), (0, 1));

        assert!(merged.word("th").is_none());
    }

    #[test]
    fn test_cat_dog_example() {
        let a = trie("the cat sat");
        let b = trie("the dog sat");
        let jsd = jensen_shannon(&a, &b);
        // Each side diverges by 1/3 bit: only its unique word contributes.
        assert!((jsd - (1.0f64 / 3.0).sqrt()).abs() < 1e-12, "jsd = {}", jsd);
        assert!(jsd > 0.0 && jsd < 1.0);
    }

    #[test]
    fn test_identical_is_zero() {
        let text = "a b b c c c some-words repeat repeat 42";
        assert_eq!(jensen_shannon(&trie(text), &trie(text)), 0.0);
    }

    #[test]
    fn test_disjoint_is_one() {
        let jsd = jensen_shannon(&trie("alpha beta gamma"), &trie("one two three four"));
        assert!((jsd - 1.0).abs() < 1e-12, "jsd = {}", jsd);
        assert!(jsd <= 1.0);
    }

    #[test]
    fn test_both_empty_is_zero() {
        assert_eq!(jensen_shannon(&trie(""), &trie("  \n ")), 0.0);
    }

    #[test]
    fn test_one_empty_is_bounded() {
        let jsd = jensen_shannon(&trie(""), &trie("something here"));
        assert!((0.0..=1.0).contains(&jsd));
    }

    #[test]
    fn test_symmetric_bit_for_bit() {
        let samples = [
            "the quick brown fox jumps over the lazy dog",
            "a a a b b c d e f g the fox",
            "Lorem ipsum dolor sit amet, consectetur adipiscing elit",
            "fox fox fox fox dog",
            "",
        ];
        for x in &samples {
            for y in &samples {
                let (a, b) = (trie(x), trie(y));
                let ab = jensen_shannon(&a, &b);
                let ba = jensen_shannon(&b, &a);
                assert_eq!(ab.to_bits(), ba.to_bits(), "{:?} vs {:?}", x, y);
                assert!((0.0..=1.0).contains(&ab));
            }
        }
    }
}
