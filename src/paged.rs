use std::fmt::{self, Debug};

use crate::{
    CodepointSet, PackedIndex, Page, PageSize, PageTable, PointerWidth, page::word_contains,
};

/// A compiled two-level membership table: a packed page index and the unique
/// pages it points into.
///
/// ```
/// use pointset_rs::{CodepointSet, PageSize, PagedBitmap};
///
/// let set = CodepointSet::from_ranges([0x41..=0x5A, 0x10000..=0xEFFFF]);
/// let bitmap = PagedBitmap::compile(&set, PageSize::DEFAULT);
///
/// assert!(bitmap.contains(0x42));
/// assert!(bitmap.contains(0x12345));
/// assert!(!bitmap.contains(0xF0000));
/// assert_eq!(bitmap.index().width().bits(), 2);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PagedBitmap {
    page_size: PageSize,
    index: PackedIndex,
    pages: Vec<Page>,
}

impl PagedBitmap {
    pub fn compile(set: &CodepointSet, page_size: PageSize) -> Self {
        PageTable::build(set, page_size).into()
    }

    pub(crate) fn from_parts(page_size: PageSize, index: PackedIndex, pages: Vec<Page>) -> Self {
        debug_assert_eq!(index.len(), page_size.slots());
        debug_assert_eq!(index.width(), PointerWidth::for_pages(pages.len()));
        Self { page_size, index, pages }
    }

    /// Returns true if `codepoint` is a member. Code points outside the
    /// 21-bit code space are never members.
    #[inline]
    pub fn contains(&self, codepoint: u32) -> bool {
        let (page, offset) = self.page_size.split(codepoint);
        match self.index.get(page) {
            Some(ptr) => word_contains(self.pages[ptr as usize].words(), offset),
            None => false,
        }
    }

    #[inline]
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    #[inline]
    pub fn index(&self) -> &PackedIndex {
        &self.index
    }

    #[inline]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Iterates over every unique page as a row of words.
    pub fn page_words(&self) -> impl ExactSizeIterator<Item = &[u32]> {
        self.pages.iter().map(Page::words)
    }

    /// Bytes used by the packed index and the page rows.
    #[inline]
    pub fn table_size(&self) -> usize {
        self.index.encoded_size() + self.pages.len() * self.page_size.bytes()
    }
}

impl From<PageTable> for PagedBitmap {
    fn from(table: PageTable) -> Self {
        let (page_size, pages, page_index) = table.into_parts();
        let index = PackedIndex::pack(&page_index, PointerWidth::for_pages(pages.len()));
        Self::from_parts(page_size, index, pages)
    }
}

impl Debug for PagedBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedBitmap")
            .field("page_size", &self.page_size)
            .field("index", &self.index)
            .field("pages", &self.pages)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use proptest::{collection::vec, proptest};

    use super::*;
    use crate::{
        CODEPOINT_BITS, CODEPOINT_LIMIT, FlatBitmap,
        classes::{NAME_CHAR, NAME_START_CHAR},
        testutil::{SetGen, naive_is_name_char, naive_is_name_start_char},
    };

    /// Compares against both the range scan and the flat bitmap. The flat
    /// bitmap also feeds the page builder, so the range scan is the oracle.
    #[track_caller]
    fn check_agreement(set: &CodepointSet, bitmap: &PagedBitmap) {
        let flat = FlatBitmap::encode(set, CODEPOINT_LIMIT);
        for cp in 0..CODEPOINT_LIMIT {
            let expected = set.contains(cp);
            assert_eq!(bitmap.contains(cp), expected, "U+{cp:04X}");
            assert_eq!(flat.contains(cp), expected, "flat U+{cp:04X}");
        }
    }

    #[test]
    fn test_name_classes_match_naive() {
        let start_set = CodepointSet::parse(NAME_START_CHAR).unwrap();
        let name_set = CodepointSet::parse(NAME_CHAR).unwrap();
        let start = PagedBitmap::compile(&start_set, PageSize::DEFAULT);
        let name = PagedBitmap::compile(&name_set, PageSize::DEFAULT);

        assert_eq!(start.pages().len(), 8);
        assert_eq!(start.index().width().bits(), 4);
        assert_eq!(start.table_size(), 2048);

        for cp in 0..CODEPOINT_LIMIT {
            assert_eq!(start.contains(cp), naive_is_name_start_char(cp), "U+{cp:04X}");
            assert_eq!(name.contains(cp), naive_is_name_char(cp), "U+{cp:04X}");
        }
    }

    #[test]
    fn test_agreement_across_page_sizes() {
        let set = CodepointSet::parse(NAME_CHAR).unwrap();
        for bits in [5, 8, 13, 21] {
            let bitmap = PagedBitmap::compile(&set, PageSize::new(bits).unwrap());
            check_agreement(&set, &bitmap);
        }
    }

    #[test]
    fn test_agreement_random_sets() {
        let mut setgen = SetGen::new(0xDEAD_BEEF);
        let set = setgen.ranges(256);
        check_agreement(&set, &PagedBitmap::compile(&set, PageSize::new(7).unwrap()));

        let set = setgen.clustered(64, 0x800);
        check_agreement(&set, &PagedBitmap::compile(&set, PageSize::DEFAULT));
    }

    #[test]
    fn test_outside_code_space() {
        let set = CodepointSet::from_ranges([0..=(1 << CODEPOINT_BITS) - 1]);
        let bitmap = PagedBitmap::compile(&set, PageSize::DEFAULT);
        assert!(bitmap.contains((1 << CODEPOINT_BITS) - 1));
        assert!(!bitmap.contains(1 << CODEPOINT_BITS));
        assert!(!bitmap.contains(u32::MAX));
        assert_eq!(bitmap.pages().len(), 1);
        assert_eq!(bitmap.index().width(), PointerWidth::MIN);
    }

    #[test]
    fn test_empty_bitmap() {
        let bitmap = PagedBitmap::compile(&CodepointSet::EMPTY, PageSize::DEFAULT);
        assert_eq!(bitmap.pages().len(), 1);
        assert_eq!(bitmap.index().width().bits(), 1);
        assert!(bitmap.index().words().iter().all(|&w| w == 0));
        assert_eq!(bitmap.index().words().len(), 64);
        assert!(!bitmap.contains(0));
    }

    proptest! {
        #[test]
        fn test_sampled_agreement_proptest(
            bounds in vec((0u32..0x11_0000, 0u32..2048), 0..24),
            bits in 5u32..=16,
        ) {
            let set: CodepointSet = bounds.iter().map(|&(lo, len)| lo..=lo + len).collect();
            let bitmap = PagedBitmap::compile(&set, PageSize::new(bits).unwrap());
            let size = bitmap.page_size().codepoints() as u32;
            for &(lo, len) in &bounds {
                let hi = lo + len;
                let probes = [
                    lo.saturating_sub(1), lo, hi, hi + 1,
                    lo / size * size, (hi / size + 1) * size - 1,
                ];
                for cp in probes {
                    assert_eq!(bitmap.contains(cp), set.contains(cp), "U+{cp:04X}");
                }
            }
        }
    }
}
