use itertools::Itertools;
use rand::{SeedableRng, seq::index};

use crate::{CODEPOINT_LIMIT, CodepointSet};

/// Seeded generator of random code point sets.
pub struct SetGen {
    rng: rand::rngs::StdRng,
}

impl SetGen {
    pub fn new(seed: u64) -> Self {
        let rng = rand::rngs::StdRng::seed_from_u64(seed);
        Self { rng }
    }

    /// `count` disjoint ranges spread across the whole code space.
    pub fn ranges(&mut self, count: usize) -> CodepointSet {
        self.ranges_within(0, CODEPOINT_LIMIT, count)
    }

    /// `count` disjoint ranges packed into `span` code points at a random
    /// offset, mimicking the clustered layout of real scripts.
    #[track_caller]
    pub fn clustered(&mut self, count: usize, span: u32) -> CodepointSet {
        assert!(span <= CODEPOINT_LIMIT, "span exceeds the code space");
        let offset =
            index::sample(&mut self.rng, (CODEPOINT_LIMIT - span + 1) as usize, 1).index(0);
        self.ranges_within(offset as u32, span, count)
    }

    #[track_caller]
    fn ranges_within(&mut self, offset: u32, span: u32, count: usize) -> CodepointSet {
        assert!(count * 2 <= span as usize, "not enough room for {count} ranges");
        index::sample(&mut self.rng, span as usize, count * 2)
            .into_iter()
            .map(|i| i as u32 + offset)
            .sorted()
            .tuples()
            .map(|(lo, hi)| lo..=hi)
            .collect()
    }
}

/// `NameStartChar` written out as comparisons.
pub fn naive_is_name_start_char(c: u32) -> bool {
    matches!(
        c,
        0x3A | 0x41..=0x5A
            | 0x5F
            | 0x61..=0x7A
            | 0xC0..=0xD6
            | 0xD8..=0xF6
            | 0xF8..=0x2FF
            | 0x370..=0x37D
            | 0x37F..=0x1FFF
            | 0x200C..=0x200D
            | 0x2070..=0x218F
            | 0x2C00..=0x2FEF
            | 0x3001..=0xD7FF
            | 0xF900..=0xFDCF
            | 0xFDF0..=0xFFFD
            | 0x10000..=0xEFFFF
    )
}

/// `NameChar` written out as comparisons.
pub fn naive_is_name_char(c: u32) -> bool {
    naive_is_name_start_char(c)
        || matches!(
            c,
            0x2D | 0x2E | 0x30..=0x39 | 0xB7 | 0x300..=0x36F | 0x203F..=0x2040
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setgen_is_deterministic() {
        let a = SetGen::new(42).ranges(32);
        let b = SetGen::new(42).ranges(32);
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_clustered_stays_in_span() {
        let set = SetGen::new(7).clustered(16, 0x100);
        let first = *set.ranges()[0].start();
        let last = *set.ranges()[set.len() - 1].end();
        assert!(last - first < 0x100);
    }
}
