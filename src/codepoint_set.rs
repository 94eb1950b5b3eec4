use std::{fmt::Debug, ops::RangeInclusive};

use itertools::Itertools;
use range_set_blaze::RangeSetBlaze;

use crate::{BuildErr, CODEPOINT_LIMIT};

/// A character class expressed as a sorted sequence of inclusive code point
/// ranges.
///
/// Ranges are sorted by their lower bound but are otherwise kept exactly as
/// specified: overlapping, adjacent and duplicate ranges are not coalesced.
/// Membership stays correct because [`CodepointSet::contains`] only relies on
/// the sort order.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct CodepointSet {
    ranges: Vec<RangeInclusive<u32>>,
}

impl CodepointSet {
    pub const EMPTY: Self = Self { ranges: Vec::new() };

    /// Parses a grammar production such as
    /// `":" | [A-Z] | [#xC0-#xD6] | #xB7` into a set.
    ///
    /// Each alternative is a quoted literal, a bracketed range of two values,
    /// a bare `#x` hex reference or a bare character.
    ///
    /// ```
    /// use pointset_rs::CodepointSet;
    ///
    /// let set = CodepointSet::parse(r#""_" | [a-z] | #xB7"#).unwrap();
    /// assert!(set.contains('q' as u32));
    /// assert!(set.contains(0xB7));
    /// assert!(!set.contains('Q' as u32));
    /// ```
    pub fn parse(production: &str) -> Result<Self, BuildErr> {
        let ranges = production
            .split('|')
            .map(parse_spec)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_ranges(ranges))
    }

    /// Builds a set from already parsed ranges. Empty ranges are dropped.
    pub fn from_ranges<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = RangeInclusive<u32>>,
    {
        let ranges = ranges
            .into_iter()
            .filter(|r| !r.is_empty())
            .sorted_by_key(|r| (*r.start(), *r.end()))
            .collect();
        Self { ranges }
    }

    /// Returns true if `codepoint` is a member of this set.
    ///
    /// The scan stops at the first range starting above `codepoint`.
    #[inline]
    pub fn contains(&self, codepoint: u32) -> bool {
        for range in &self.ranges {
            if codepoint < *range.start() {
                return false;
            }
            if codepoint <= *range.end() {
                return true;
            }
        }
        false
    }

    #[inline]
    pub fn ranges(&self) -> &[RangeInclusive<u32>] {
        &self.ranges
    }

    /// The number of range specifications in this set.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The number of distinct code points in this set.
    pub fn cardinality(&self) -> usize {
        self.to_range_set().len() as usize
    }

    /// Returns the coalesced form of this set.
    pub fn to_range_set(&self) -> RangeSetBlaze<u32> {
        self.ranges.iter().cloned().collect()
    }
}

impl Debug for CodepointSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(
                self.ranges
                    .iter()
                    .map(|r| format!("U+{:04X}..=U+{:04X}", r.start(), r.end())),
            )
            .finish()
    }
}

impl FromIterator<RangeInclusive<u32>> for CodepointSet {
    fn from_iter<I: IntoIterator<Item = RangeInclusive<u32>>>(iter: I) -> Self {
        Self::from_ranges(iter)
    }
}

fn malformed(spec: &str, reason: &'static str) -> BuildErr {
    BuildErr::MalformedRange { spec: spec.trim().to_owned(), reason }
}

fn parse_spec(raw: &str) -> Result<RangeInclusive<u32>, BuildErr> {
    let spec = raw.trim();
    if spec.is_empty() {
        return Err(malformed(raw, "empty specification"));
    }

    if let Some(rest) = spec.strip_prefix('"') {
        let inner = rest
            .strip_suffix('"')
            .ok_or_else(|| malformed(raw, "unbalanced quote"))?;
        let value = parse_char(raw, inner)?;
        return Ok(value..=value);
    }

    if let Some(rest) = spec.strip_prefix('[') {
        let inner = rest
            .strip_suffix(']')
            .ok_or_else(|| malformed(raw, "unbalanced bracket"))?;
        // the separator is the first '-' after the first character, so a
        // literal '-' may appear as the lower bound
        let split = inner
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '-')
            .map(|(i, _)| i)
            .ok_or_else(|| malformed(raw, "range is missing '-'"))?;
        let low = parse_char(raw, &inner[..split])?;
        let high = parse_char(raw, &inner[split + 1..])?;
        if low > high {
            return Err(malformed(raw, "range bounds are reversed"));
        }
        return Ok(low..=high);
    }

    if spec.ends_with('"') || spec.ends_with(']') {
        return Err(malformed(raw, "unbalanced delimiter"));
    }

    let value = parse_char(raw, spec)?;
    Ok(value..=value)
}

fn parse_char(raw: &str, token: &str) -> Result<u32, BuildErr> {
    let value = if let Some(hex) = token.strip_prefix("#x") {
        if hex.is_empty() {
            return Err(malformed(raw, "missing hex digits"));
        }
        u32::from_str_radix(hex, 16).map_err(|_| malformed(raw, "invalid hex value"))?
    } else {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c as u32,
            (None, _) => return Err(malformed(raw, "missing character")),
            (Some(_), Some(_)) => return Err(malformed(raw, "expected a single character")),
        }
    };

    if value >= CODEPOINT_LIMIT {
        return Err(malformed(raw, "code point out of range"));
    }
    Ok(value)
}
