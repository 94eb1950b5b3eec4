use std::collections::HashMap;

use crate::{CODEPOINT_BITS, CodepointSet, FlatBitmap, Page, PageSize};

/// The code space split into pages of `page_size`, with identical pages stored
/// once.
///
/// `unique_pages` are kept in the order they were first seen while scanning
/// page numbers upwards, so the first page is always the one holding
/// `U+0000`. `page_index` holds one entry per page slot pointing into
/// `unique_pages`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTable {
    page_size: PageSize,
    unique_pages: Vec<Page>,
    page_index: Vec<u32>,
}

impl PageTable {
    /// Pages `set` by way of a flat bitmap over the full 21-bit code space.
    pub fn build(set: &CodepointSet, page_size: PageSize) -> Self {
        let flat = FlatBitmap::encode(set, 1 << CODEPOINT_BITS);
        Self::from_flat(&flat, page_size)
    }

    /// Pages an existing flat bitmap. Code points the bitmap does not cover
    /// are treated as non-members.
    pub fn from_flat(flat: &FlatBitmap, page_size: PageSize) -> Self {
        let words_per_page = page_size.words();
        let mut words = flat.words().to_vec();
        words.resize(page_size.slots() * words_per_page, 0);

        let mut seen: HashMap<&[u32], u32> = HashMap::new();
        let mut unique_pages = Vec::new();
        let page_index = words
            .chunks_exact(words_per_page)
            .map(|chunk| {
                *seen.entry(chunk).or_insert_with(|| {
                    unique_pages.push(Page::from(chunk));
                    (unique_pages.len() - 1) as u32
                })
            })
            .collect::<Vec<_>>();

        log::debug!(
            "paged {} code points into {} unique pages of {} over {} slots",
            flat.cardinality(),
            unique_pages.len(),
            page_size.codepoints(),
            page_index.len()
        );

        Self { page_size, unique_pages, page_index }
    }

    #[inline]
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    #[inline]
    pub fn unique_pages(&self) -> &[Page] {
        &self.unique_pages
    }

    #[inline]
    pub fn page_index(&self) -> &[u32] {
        &self.page_index
    }

    /// Returns the unique page backing page number `page`.
    #[inline]
    pub fn resolve(&self, page: usize) -> Option<&Page> {
        let idx = *self.page_index.get(page)?;
        Some(&self.unique_pages[idx as usize])
    }

    pub fn contains(&self, codepoint: u32) -> bool {
        let (page, offset) = self.page_size.split(codepoint);
        self.resolve(page).is_some_and(|p| p.contains(offset))
    }

    pub(crate) fn into_parts(self) -> (PageSize, Vec<Page>, Vec<u32>) {
        (self.page_size, self.unique_pages, self.page_index)
    }
}
