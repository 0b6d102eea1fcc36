// Source text as a char sequence.
//
// Matching walks `&[char]` with index arithmetic; results borrow `&str`
// slices of the caller's string, so every char index has to be mapped back
// to a byte offset. ASCII sources use the identity map.

use crate::error::{PatternError, Result};

/// Char index -> byte offset map: ASCII identity or precomputed table
#[derive(Debug, Clone)]
pub(crate) enum ByteMap {
    Ascii,
    /// `len + 1` entries, the last one is the source byte length.
    Map(Vec<usize>),
}

impl ByteMap {
    fn new(src: &str) -> Self {
        if src.is_ascii() {
            ByteMap::Ascii
        } else {
            ByteMap::Map(
                src.char_indices()
                    .map(|(i, _)| i)
                    .chain(std::iter::once(src.len()))
                    .collect(),
            )
        }
    }

    #[inline(always)]
    pub fn get(&self, i: usize) -> usize {
        match self {
            ByteMap::Ascii => i,
            ByteMap::Map(m) => m[i],
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Text<'s> {
    src: &'s str,
    chars: Vec<char>,
    bytes: ByteMap,
}

impl<'s> Text<'s> {
    pub fn new(src: &'s str) -> Result<Self> {
        let chars: Vec<char> = src.chars().collect();
        // capture offsets are bounded by the platform signed width
        if chars.len() >= isize::MAX as usize {
            return Err(PatternError::SourceTooLong);
        }
        Ok(Self {
            src,
            chars,
            bytes: ByteMap::new(src),
        })
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[inline(always)]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Char at `i`, `None` past the end.
    #[inline(always)]
    pub fn at(&self, i: usize) -> Option<char> {
        self.chars.get(i).copied()
    }

    /// Source slice for the char span `[start, end)`.
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'s str {
        &self.src[self.bytes.get(start)..self.bytes.get(end)]
    }

    /// Source from char `start` to the end.
    #[inline]
    pub fn tail(&self, start: usize) -> &'s str {
        self.slice(start, self.len())
    }

    /// Char index of the char starting at byte offset `byte`.
    pub fn char_index(&self, byte: usize) -> usize {
        match &self.bytes {
            ByteMap::Ascii => byte,
            ByteMap::Map(m) => m.partition_point(|&b| b < byte),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_slices() {
        let text = Text::new("hello").unwrap();
        assert_eq!(text.len(), 5);
        assert_eq!(text.slice(1, 3), "el");
        assert_eq!(text.tail(3), "lo");
        assert_eq!(text.at(5), None);
        assert_eq!(text.char_index(2), 2);
    }

    #[test]
    fn test_multibyte_slices() {
        let text = Text::new("áéí x").unwrap();
        assert_eq!(text.len(), 5);
        assert_eq!(text.at(1), Some('é'));
        assert_eq!(text.slice(1, 3), "éí");
        assert_eq!(text.slice(5, 5), "");
        assert_eq!(text.char_index(2), 1);
        assert_eq!(text.char_index("áéí x".len()), 5);
    }
}
