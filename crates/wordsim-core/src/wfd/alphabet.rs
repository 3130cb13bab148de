//! The fixed symbol set words are built from.
//!
//! Every trie edge is labelled with one of 37 symbols: the hyphen, the ten
//! ASCII digits and the 26 lower-case ASCII letters, in that order. Upper-case
//! letters fold onto their lower-case symbol; every other byte is either a
//! word separator or is dropped from the word it appears in.

pub const ALPHABET_SIZE: usize = 37;

const SYMBOLS: &[u8; ALPHABET_SIZE] = b"-0123456789abcdefghijklmnopqrstuvwxyz";

/// Map a raw input byte to its symbol index, folding ASCII case.
/// Returns `None` for bytes that are not part of any word.
#[inline]
pub fn symbol_index(byte: u8) -> Option<u8> {
    match byte {
        b'-' => Some(0),
        b'0'..=b'9' => Some(byte - b'0' + 1),
        b'a'..=b'z' => Some(byte - b'a' + 11),
        b'A'..=b'Z' => Some(byte - b'A' + 11),
        _ => None,
    }
}

/// Inverse of [`symbol_index`]. Always yields the lower-case form.
#[inline]
pub fn symbol_byte(index: u8) -> u8 {
    SYMBOLS[index as usize]
}

/// Whitespace as the C locale's `isspace` sees it, vertical tab included.
#[inline]
pub fn is_separator(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Render a path of symbol indices back into the word it spells.
pub fn spell(path: &[u8]) -> String {
    path.iter().map(|&i| symbol_byte(i) as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_index_round_trips_every_symbol() {
        for (i, &b) in SYMBOLS.iter().enumerate() {
            assert_eq!(symbol_index(b), Some(i as u8));
            assert_eq!(symbol_byte(i as u8), b);
        }
    }

    #[test]
    fn test_upper_case_folds() {
        assert_eq!(symbol_index(b'Q'), symbol_index(b'q'));
        assert_eq!(symbol_byte(symbol_index(b'Z').unwrap()), b'z');
    }

    #[test]
    fn test_punctuation_and_non_ascii_rejected() {
        for b in [b'.', b',', b'\'', b'|', b'_', b'!', 0xc3, 0x80, 0x00] {
            assert_eq!(symbol_index(b), None, "byte {:#x} should be dropped", b);
        }
    }

    #[test]
    fn test_separators() {
        for b in [b' ', b'\t', b'\n', 0x0b, 0x0c, b'\r'] {
            assert!(is_separator(b));
        }
        assert!(!is_separator(b'a'));
        assert!(!is_separator(b'-'));
        assert!(!is_separator(0xa0));
    }

    #[test]
    fn test_spell() {
        let path: Vec<u8> = "co-op2".bytes().filter_map(symbol_index).collect();
        assert_eq!(spell(&path), "co-op2");
    }
}
