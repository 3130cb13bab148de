//! Tokenizer and WFD record construction.

use super::alphabet::{is_separator, symbol_index};
use super::trie::{TrieBuilder, WordTrie};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::trace;

const READ_BUFFER_SIZE: usize = 64 * 1024; // 64KB

/// A processed file: its name, total word count and word-frequency trie.
#[derive(Debug)]
pub struct WfdRecord {
    path: PathBuf,
    trie: WordTrie,
}

impl WfdRecord {
    pub fn new(path: PathBuf, trie: WordTrie) -> Self {
        Self { path, trie }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn word_count(&self) -> usize {
        self.trie.total_words()
    }

    pub fn trie(&self) -> &WordTrie {
        &self.trie
    }

    pub fn into_trie(self) -> WordTrie {
        self.trie
    }
}

/// Open `path` and build its WFD. Any open or read error is returned to the
/// caller, which skips the file.
pub fn build_wfd(path: &Path) -> io::Result<WfdRecord> {
    let file = File::open(path)?;
    let record = wfd_from_reader(path.to_path_buf(), file)?;
    trace!(
        "Built WFD for {}: {} words, {} distinct",
        path.display(),
        record.word_count(),
        record.trie().distinct_words()
    );
    Ok(record)
}

pub fn wfd_from_reader<R: Read>(path: PathBuf, reader: R) -> io::Result<WfdRecord> {
    let mut builder = TrieBuilder::new();
    tokenize(reader, &mut builder)?;
    Ok(WfdRecord::new(path, builder.finish()))
}

/// Split `reader` on whitespace and count each word into `builder`.
///
/// Bytes outside the alphabet are dropped from the token they appear in; they
/// never end a token. A token left with no symbols is not a word. Returns the
/// number of words counted.
pub fn tokenize<R: Read>(reader: R, builder: &mut TrieBuilder) -> io::Result<usize> {
    let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, reader);
    let mut token: Vec<u8> = Vec::new();
    let mut words = 0;

    loop {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if buf.is_empty() {
            break;
        }

        for &byte in buf {
            if is_separator(byte) {
                if builder.insert(&token) {
                    words += 1;
                }
                token.clear();
            } else if let Some(symbol) = symbol_index(byte) {
                token.push(symbol);
            }
        }

        let consumed = buf.len();
        reader.consume(consumed);
    }

    if builder.insert(&token) {
        words += 1;
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wfd(text: &str) -> WfdRecord {
        wfd_from_reader(PathBuf::from("mem"), text.as_bytes()).unwrap()
    }

    #[test]
    fn test_basic_counts() {
        let record = wfd("the cat sat on the mat");
        assert_eq!(record.word_count(), 6);
        assert_eq!(record.trie().count("the"), 2);
        assert_eq!(record.trie().frequency("the"), 2.0 / 6.0);
        assert_eq!(record.trie().count("mat"), 1);
    }

    #[test]
    fn test_case_folding() {
        let record = wfd("Hello HELLO hello hElLo");
        assert_eq!(record.word_count(), 4);
        assert_eq!(record.trie().distinct_words(), 1);
        assert_eq!(record.trie().count("hello"), 4);
        assert_eq!(record.trie().frequency("hello"), 1.0);
    }

    #[test]
    fn test_punctuation_dropped_inside_token() {
        let record = wfd("don't re-use it's, (fine).");
        assert_eq!(record.word_count(), 4);
        assert_eq!(record.trie().count("dont"), 1);
        assert_eq!(record.trie().count("re-use"), 1);
        assert_eq!(record.trie().count("its"), 1);
        assert_eq!(record.trie().count("fine"), 1);
    }

    #[test]
    fn test_all_punctuation_token_is_not_a_word() {
        let record = wfd("alpha !!! beta ... --");
        // "--" survives filtering; "!!!" and "..." do not.
        assert_eq!(record.word_count(), 3);
        assert_eq!(record.trie().count("--"), 1);
    }

    #[test]
    fn test_whitespace_runs_and_edges() {
        let record = wfd("\n\t  one\r\n\x0btwo \x0c three   ");
        assert_eq!(record.word_count(), 3);
        assert_eq!(record.trie().count("one"), 1);
        assert_eq!(record.trie().count("two"), 1);
        assert_eq!(record.trie().count("three"), 1);
    }

    #[test]
    fn test_last_word_without_trailing_newline() {
        let record = wfd("first last");
        assert_eq!(record.trie().count("last"), 1);
    }

    #[test]
    fn test_empty_input() {
        let record = wfd("");
        assert_eq!(record.word_count(), 0);
        assert!(record.trie().is_empty());

        let record = wfd("   \n\n  ");
        assert_eq!(record.word_count(), 0);
    }

    #[test]
    fn test_non_ascii_bytes_dropped() {
        let record = wfd("caf\u{e9} na\u{ef}ve");
        assert_eq!(record.trie().count("caf"), 1);
        assert_eq!(record.trie().count("nave"), 1);
    }

    #[test]
    fn test_token_spanning_buffer_boundary() {
        let mut text = " ".repeat(READ_BUFFER_SIZE - 2);
        text.push_str("boundary word");
        let record = wfd(&text);
        assert_eq!(record.word_count(), 2);
        assert_eq!(record.trie().count("boundary"), 1);
    }

    #[test]
    fn test_build_wfd_missing_file() {
        let err = build_wfd(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
