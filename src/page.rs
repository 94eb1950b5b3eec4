use std::fmt::{self, Debug};

use crate::{BuildErr, CODEPOINT_BITS};

pub const WORD_BITS: u32 = u32::BITS;

/// The base two logarithm of the number of code points covered by a page.
///
/// Pages must be word aligned and may not exceed the 21-bit code space, so the
/// accepted range is `5..=21`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageSize(u32);

impl PageSize {
    pub const MIN_BITS: u32 = WORD_BITS.trailing_zeros();
    pub const MAX_BITS: u32 = CODEPOINT_BITS;

    /// 1024 code points per page. Size analysis of the XML name character
    /// classes bottoms out here.
    pub const DEFAULT: Self = Self(10);

    pub fn new(bits: u32) -> Result<Self, BuildErr> {
        if (Self::MIN_BITS..=Self::MAX_BITS).contains(&bits) {
            Ok(Self(bits))
        } else {
            Err(BuildErr::InvalidPageSize(bits))
        }
    }

    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Number of code points covered by a page.
    #[inline]
    pub fn codepoints(self) -> usize {
        1 << self.0
    }

    /// Number of 32-bit words stored per page.
    #[inline]
    pub fn words(self) -> usize {
        self.codepoints() / WORD_BITS as usize
    }

    /// Number of page slots needed to cover the 21-bit code space.
    #[inline]
    pub fn slots(self) -> usize {
        1 << (CODEPOINT_BITS - self.0)
    }

    /// Number of bytes used to store a single page.
    #[inline]
    pub fn bytes(self) -> usize {
        self.codepoints() / 8
    }

    /// Splits a code point into its page number and offset within the page.
    #[inline]
    pub fn split(self, codepoint: u32) -> (usize, usize) {
        let page = (codepoint >> self.0) as usize;
        let offset = codepoint as usize & (self.codepoints() - 1);
        (page, offset)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for PageSize {
    type Error = BuildErr;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

impl Debug for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageSize({} bits, {} code points)", self.0, self.codepoints())
    }
}

/// The membership bitmap of one page. Word `i` bit `j` covers the code point
/// at offset `32 * i + j` within the page.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Page(Box<[u32]>);

impl Page {
    #[inline]
    pub fn words(&self) -> &[u32] {
        &self.0
    }

    /// Returns true if the bit at `offset` is set.
    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        word_contains(&self.0, offset)
    }

    #[inline]
    pub fn cardinality(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.0.iter().all(|&w| w == u32::MAX)
    }
}

impl From<&[u32]> for Page {
    fn from(words: &[u32]) -> Self {
        Self(words.into())
    }
}

impl From<Vec<u32>> for Page {
    fn from(words: Vec<u32>) -> Self {
        Self(words.into_boxed_slice())
    }
}

impl Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Page(empty)")
        } else if self.is_full() {
            write!(f, "Page(full)")
        } else {
            write!(f, "Page({})", self.cardinality())
        }
    }
}

/// Tests bit `offset` of a little-endian-bit-order word slice.
#[inline]
pub(crate) fn word_contains(words: &[u32], offset: usize) -> bool {
    let word = words[offset / WORD_BITS as usize];
    (word >> (offset % WORD_BITS as usize)) & 1 != 0
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_page_size_bounds() {
        for bits in 0..PageSize::MIN_BITS {
            assert_matches!(PageSize::new(bits), Err(BuildErr::InvalidPageSize(b)) if b == bits);
        }
        for bits in PageSize::MIN_BITS..=PageSize::MAX_BITS {
            let size = PageSize::new(bits).unwrap();
            assert_eq!(size.codepoints() % 32, 0);
            assert_eq!(size.codepoints() * size.slots(), 1 << CODEPOINT_BITS);
        }
        assert_matches!(PageSize::new(22), Err(BuildErr::InvalidPageSize(22)));
        assert_matches!(PageSize::try_from(64), Err(BuildErr::InvalidPageSize(64)));
    }

    #[test]
    fn test_page_size_geometry() {
        let size = PageSize::DEFAULT;
        assert_eq!(size.bits(), 10);
        assert_eq!(size.codepoints(), 1024);
        assert_eq!(size.words(), 32);
        assert_eq!(size.slots(), 2048);
        assert_eq!(size.bytes(), 128);

        assert_eq!(size.split(0x41), (0, 0x41));
        assert_eq!(size.split(0x400), (1, 0));
        assert_eq!(size.split(0x10FFFF), (0x43F, 0x3FF));

        let smallest = PageSize::new(5).unwrap();
        assert_eq!(smallest.words(), 1);
        assert_eq!(smallest.slots(), 1 << 16);
    }

    #[test]
    fn test_page_bits() {
        let page = Page::from(vec![0b1010, 0, 1 << 31]);
        assert!(!page.contains(0));
        assert!(page.contains(1));
        assert!(page.contains(3));
        assert!(!page.contains(32));
        assert!(page.contains(95));
        assert_eq!(page.cardinality(), 3);
        assert!(!page.is_empty());
        assert!(!page.is_full());

        assert!(Page::from(vec![0; 4]).is_empty());
        assert!(Page::from(vec![u32::MAX; 4]).is_full());
    }
}
