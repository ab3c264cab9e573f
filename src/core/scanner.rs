//! Byte scanner for the markup tokenizer
//!
//! Uses the memchr crate for fast delimiter searching with SIMD
//! acceleration where available.

use memchr::{memchr, memmem};

/// Cursor over raw markup input
pub struct Scanner<'a> {
    input: &'a [u8],
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given input
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input }
    }

    /// Total input length
    #[inline]
    pub fn len(&self) -> usize {
        self.input.len()
    }

    /// Check if the input is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Peek at the byte at an absolute position
    #[inline]
    pub fn byte_at(&self, pos: usize) -> Option<u8> {
        self.input.get(pos).copied()
    }

    /// Check if the input starts with a byte sequence at the given position
    #[inline]
    pub fn starts_with_at(&self, pos: usize, needle: &[u8]) -> bool {
        self.input[pos.min(self.input.len())..].starts_with(needle)
    }

    /// Find the next occurrence of `byte` at or after `from`
    #[inline]
    pub fn find_byte_from(&self, from: usize, byte: u8) -> Option<usize> {
        let from = from.min(self.input.len());
        memchr(byte, &self.input[from..]).map(|i| from + i)
    }

    /// Find the next occurrence of a byte sequence at or after `from`
    #[inline]
    pub fn find_sub_from(&self, from: usize, needle: &[u8]) -> Option<usize> {
        let from = from.min(self.input.len());
        memmem::find(&self.input[from..], needle).map(|i| from + i)
    }

    /// Find the next `>` at or after `from` that is not inside a quoted
    /// attribute value
    pub fn find_tag_end_quoted(&self, from: usize) -> Option<usize> {
        let mut pos = from;
        let mut in_single_quote = false;
        let mut in_double_quote = false;

        while pos < self.input.len() {
            match self.input[pos] {
                b'"' if !in_single_quote => in_double_quote = !in_double_quote,
                b'\'' if !in_double_quote => in_single_quote = !in_single_quote,
                b'>' if !in_single_quote && !in_double_quote => return Some(pos),
                _ => {}
            }
            pos += 1;
        }
        None
    }

    /// Read a tag name starting at `pos`, returning the position just past
    /// its last character, or None when no name character is present.
    pub fn read_name_at(&self, pos: usize) -> Option<usize> {
        let mut end = pos;
        while end < self.input.len() && is_name_char(self.input[end]) {
            end += 1;
        }
        if end == pos {
            None
        } else {
            Some(end)
        }
    }

    /// Skip whitespace forward from `pos`, returning the first
    /// non-whitespace position
    #[inline]
    pub fn skip_whitespace_at(&self, mut pos: usize) -> usize {
        while pos < self.input.len() && is_whitespace(self.input[pos]) {
            pos += 1;
        }
        pos
    }
}

/// Check if a byte is valid in a tag or attribute name
#[inline]
pub fn is_name_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-')
}

/// Check if a byte is markup whitespace
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_byte_from() {
        let scanner = Scanner::new(b"hello <world>");
        assert_eq!(scanner.find_byte_from(0, b'<'), Some(6));
        assert_eq!(scanner.find_byte_from(7, b'<'), None);
    }

    #[test]
    fn test_find_tag_end_quoted() {
        let scanner = Scanner::new(b"<a attr=\">test\">content");
        assert_eq!(scanner.find_tag_end_quoted(1), Some(15));
    }

    #[test]
    fn test_find_sub_from() {
        let scanner = Scanner::new(b"<!-- a --><b>");
        assert_eq!(scanner.find_sub_from(4, b"-->"), Some(7));
    }

    #[test]
    fn test_read_name_at() {
        let scanner = Scanner::new(b"element-name>");
        assert_eq!(scanner.read_name_at(0), Some(12));
        assert_eq!(scanner.read_name_at(12), None);
    }

    #[test]
    fn test_skip_whitespace_at() {
        let scanner = Scanner::new(b"  \t\n hello");
        assert_eq!(scanner.skip_whitespace_at(0), 5);
    }
}
