use std::fmt::{self, Debug};

use bitvec::{order::Lsb0, vec::BitVec};

use crate::CodepointSet;

/// One bit per code point in `[0, max_codepoint)`.
///
/// This is the baseline encoding, and the reference every paged encoding is
/// checked against.
#[derive(Clone, PartialEq, Eq)]
pub struct FlatBitmap {
    bits: BitVec<u32, Lsb0>,
}

impl FlatBitmap {
    /// Encodes `set` over `[0, max_codepoint)`. The result holds
    /// `ceil(max_codepoint / 32)` words; padding bits in the last word are
    /// zero.
    pub fn encode(set: &CodepointSet, max_codepoint: u32) -> Self {
        let mut bits = BitVec::repeat(false, max_codepoint as usize);
        for range in set.ranges() {
            let start = (*range.start()).min(max_codepoint) as usize;
            let end = (*range.end()).saturating_add(1).min(max_codepoint) as usize;
            if start < end {
                bits[start..end].fill(true);
            }
        }
        Self { bits }
    }

    /// The number of code points covered by this bitmap.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns true if `codepoint` is covered and set.
    #[inline]
    pub fn contains(&self, codepoint: u32) -> bool {
        self.bits
            .get(codepoint as usize)
            .is_some_and(|bit| *bit)
    }

    #[inline]
    pub fn cardinality(&self) -> usize {
        self.bits.count_ones()
    }

    /// The backing words. Word `i` bit `j` is set iff code point `32 * i + j`
    /// is a member.
    #[inline]
    pub fn words(&self) -> &[u32] {
        self.bits.as_raw_slice()
    }

    /// Size of the encoded table in bytes.
    #[inline]
    pub fn encoded_size(&self) -> usize {
        self.words().len() * size_of::<u32>()
    }
}

impl Debug for FlatBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FlatBitmap({}/{})", self.cardinality(), self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CODEPOINT_LIMIT, classes::NAME_CHAR, testutil::SetGen};

    #[test]
    fn test_flat_word_layout() {
        let set = CodepointSet::from_ranges([0..=0, 33..=34, 95..=95]);
        let flat = FlatBitmap::encode(&set, 96);
        assert_eq!(flat.words(), &[0b1, 0b110, 1 << 31]);
        assert_eq!(flat.cardinality(), 4);
    }

    #[test]
    fn test_flat_length_rounds_up() {
        let set = CodepointSet::from_ranges([0..=100]);
        for (max, words) in [(0, 0), (1, 1), (32, 1), (33, 2), (100, 4)] {
            let flat = FlatBitmap::encode(&set, max);
            assert_eq!(flat.words().len(), words, "max: {max}");
            assert_eq!(flat.len(), max as usize);
            // bits at or beyond max stay clear
            assert_eq!(flat.cardinality(), max as usize);
        }

        let flat = FlatBitmap::encode(&set, CODEPOINT_LIMIT);
        assert_eq!(flat.words().len(), 0x8800);
        assert_eq!(flat.encoded_size(), 0x8800 * 4);
        assert!(!flat.contains(CODEPOINT_LIMIT));
    }

    #[test]
    fn test_flat_matches_contains() {
        let set = CodepointSet::parse(NAME_CHAR).unwrap();
        let flat = FlatBitmap::encode(&set, CODEPOINT_LIMIT);
        for (i, word) in flat.words().iter().enumerate() {
            for j in 0..32 {
                let cp = (i * 32 + j) as u32;
                assert_eq!((word >> j) & 1 != 0, set.contains(cp), "U+{cp:04X}");
            }
        }
        assert_eq!(flat.cardinality(), set.cardinality());
    }

    #[test]
    fn test_flat_random_sets() {
        let mut setgen = SetGen::new(0xDEAD_BEEF);
        for _ in 0..8 {
            let set = setgen.ranges(64);
            let flat = FlatBitmap::encode(&set, CODEPOINT_LIMIT);
            let expected = set.to_range_set();
            assert_eq!(flat.cardinality(), set.cardinality());
            for range in expected.ranges() {
                let (lo, hi) = range.into_inner();
                for cp in [lo.saturating_sub(1), lo, hi, hi + 1] {
                    assert_eq!(flat.contains(cp), expected.contains(cp), "U+{cp:04X}");
                }
            }
        }
    }
}
