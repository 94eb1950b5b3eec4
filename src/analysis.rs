//! Size analysis across candidate page sizes.

use std::{fmt, ops::RangeInclusive};

use crate::{BuildErr, CODEPOINT_LIMIT, CodepointSet, FlatBitmap, PageSize, PageTable, PointerWidth};

/// The page sizes, in bits, examined when none are given.
pub const DEFAULT_CANDIDATES: RangeInclusive<u32> = 8..=14;

/// Encoded size of one set at one page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeEstimate {
    pub page_size: PageSize,
    pub unique_pages: usize,
    pub index_entries: usize,
    pub pointer_bits: u32,
    pub index_bytes: usize,
    pub page_bytes: usize,
}

impl SizeEstimate {
    fn measure(table: &PageTable) -> Self {
        let page_size = table.page_size();
        let unique_pages = table.unique_pages().len();
        let index_entries = table.page_index().len();
        let width = PointerWidth::for_pages(unique_pages);
        Self {
            page_size,
            unique_pages,
            index_entries,
            pointer_bits: width.bits(),
            index_bytes: width.words_for(index_entries) * size_of::<u32>(),
            page_bytes: unique_pages * page_size.bytes(),
        }
    }

    #[inline]
    pub fn total_bytes(&self) -> usize {
        self.index_bytes + self.page_bytes
    }
}

/// Per-candidate size estimates, in the order the candidates were given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeReport {
    estimates: Vec<SizeEstimate>,
    flat_bytes: usize,
}

impl SizeReport {
    #[inline]
    pub fn estimates(&self) -> &[SizeEstimate] {
        &self.estimates
    }

    pub fn iter(&self) -> impl Iterator<Item = &SizeEstimate> {
        self.estimates.iter()
    }

    /// Size of the flat encoding over `U+0000..=U+10FFFF`, for comparison.
    #[inline]
    pub fn flat_bytes(&self) -> usize {
        self.flat_bytes
    }

    /// The estimate with the smallest total size; ties go to the earlier
    /// candidate.
    pub fn smallest(&self) -> Option<&SizeEstimate> {
        self.estimates.iter().min_by_key(|e| e.total_bytes())
    }
}

impl<'a> IntoIterator for &'a SizeReport {
    type Item = &'a SizeEstimate;
    type IntoIter = std::slice::Iter<'a, SizeEstimate>;

    fn into_iter(self) -> Self::IntoIter {
        self.estimates.iter()
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>9} {:>7} {:>9} {:>5} {:>11} {:>11} {:>11}",
            "page bits", "pages", "pointers", "width", "index (B)", "pages (B)", "total (B)"
        )?;
        for e in &self.estimates {
            writeln!(
                f,
                "{:>9} {:>7} {:>9} {:>5} {:>11} {:>11} {:>11}",
                e.page_size.bits(),
                e.unique_pages,
                e.index_entries,
                e.pointer_bits,
                e.index_bytes,
                e.page_bytes,
                e.total_bytes()
            )?;
        }
        write!(f, "flat bitmap: {} B", self.flat_bytes)
    }
}

/// Measures the paged encoding of `set` for each candidate page size, given
/// in bits.
///
/// Invalid candidates are rejected before any table is built.
pub fn analyze<I>(set: &CodepointSet, candidates: I) -> Result<SizeReport, BuildErr>
where
    I: IntoIterator<Item = u32>,
{
    let sizes = candidates
        .into_iter()
        .map(PageSize::new)
        .collect::<Result<Vec<_>, _>>()?;

    let flat = FlatBitmap::encode(set, CODEPOINT_LIMIT);
    let estimates = sizes
        .into_iter()
        .map(|size| {
            let estimate = SizeEstimate::measure(&PageTable::from_flat(&flat, size));
            log::trace!("{estimate:?}: {} bytes", estimate.total_bytes());
            estimate
        })
        .collect();

    Ok(SizeReport { estimates, flat_bytes: flat.encoded_size() })
}
