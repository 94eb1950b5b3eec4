use std::{
    fmt::{self, Debug},
    ops::Deref,
};

use zerocopy::{FromBytes, LittleEndian, U32};

use crate::{
    PackedIndex, Page, PageSize, PagedBitmap,
    codec::{
        DecodeErr,
        footer::Footer,
        header::{Geometry, Header},
    },
    page::WORD_BITS,
};

type Word = U32<LittleEndian>;

/// A read-only view of an encoded [`PagedBitmap`], queried without decoding.
///
/// ```
/// use pointset_rs::{CodepointSet, Encodable, PageSize, PagedBitmap, PagedBitmapRef};
///
/// let set = CodepointSet::from_ranges([0x30..=0x39]);
/// let bytes = PagedBitmap::compile(&set, PageSize::DEFAULT).encode_to_bytes();
///
/// let digits = PagedBitmapRef::from_bytes(bytes).unwrap();
/// assert!(digits.contains('7' as u32));
/// assert!(!digits.contains('x' as u32));
/// ```
#[derive(Clone)]
pub struct PagedBitmapRef<B> {
    data: B,
    geometry: Geometry,
}

impl<B: Deref<Target = [u8]>> PagedBitmapRef<B> {
    /// Validates `data` and wraps it for querying.
    pub fn from_bytes(data: B) -> Result<Self, DecodeErr> {
        let (body, footer) = Footer::ref_from_suffix(&data)?;
        footer.validate(body)?;

        let (tables, header) = Header::ref_from_suffix(body)?;
        let geometry = header.validate()?;
        if tables.len() != geometry.index_bytes() + geometry.page_bytes() {
            return Err(DecodeErr::Length);
        }

        let bitmap = Self { data, geometry };
        if bitmap.pointers().any(|ptr| ptr as usize >= geometry.page_count) {
            return Err(DecodeErr::Validity);
        }
        Ok(bitmap)
    }

    /// Wraps bytes produced by this crate's encoder.
    pub(crate) fn from_encoded(data: B) -> Self {
        match Self::from_bytes(data) {
            Ok(bitmap) => bitmap,
            Err(err) => panic!("BUG: freshly encoded table failed to decode: {err}"),
        }
    }

    #[inline]
    pub fn page_size(&self) -> PageSize {
        self.geometry.page_size
    }

    /// Number of unique pages.
    #[inline]
    pub fn page_count(&self) -> usize {
        self.geometry.page_count
    }

    #[inline]
    pub fn encoded_size(&self) -> usize {
        self.data.len()
    }

    pub fn contains(&self, codepoint: u32) -> bool {
        let (page, offset) = self.geometry.page_size.split(codepoint);
        if page >= self.geometry.index_len {
            return false;
        }
        let ptr = self.pointer(page) as usize;
        let words_per_page = self.geometry.page_size.words();
        let word = self.page_words()[ptr * words_per_page + offset / WORD_BITS as usize].get();
        (word >> (offset % WORD_BITS as usize)) & 1 != 0
    }

    /// Decodes into an owned [`PagedBitmap`].
    pub fn to_owned_bitmap(&self) -> PagedBitmap {
        let Geometry { page_size, width, index_len, .. } = self.geometry;
        let words = self.index_words().iter().map(|w| w.get()).collect();
        let index = PackedIndex::from_words(words, width, index_len)
            .expect("index length validated in from_bytes");
        let pages = self
            .page_words()
            .chunks_exact(page_size.words())
            .map(|row| Page::from(row.iter().map(|w| w.get()).collect::<Vec<_>>()))
            .collect();
        PagedBitmap::from_parts(page_size, index, pages)
    }

    #[inline]
    fn pointer(&self, page: usize) -> u32 {
        let width = self.geometry.width;
        let per_word = width.per_word();
        let shift = (page % per_word) as u32 * width.bits();
        (self.index_words()[page / per_word].get() >> shift) & width.mask()
    }

    fn pointers(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.geometry.index_len).map(|page| self.pointer(page))
    }

    #[inline]
    fn index_words(&self) -> &[Word] {
        self.words(0, self.geometry.index_bytes())
    }

    #[inline]
    fn page_words(&self) -> &[Word] {
        let start = self.geometry.index_bytes();
        self.words(start, start + self.geometry.page_bytes())
    }

    #[inline]
    fn words(&self, start: usize, end: usize) -> &[Word] {
        <[Word]>::ref_from_bytes(&self.data[start..end])
            .expect("table layout validated in from_bytes")
    }
}

impl<B: Deref<Target = [u8]>> Debug for PagedBitmapRef<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedBitmapRef")
            .field("page_size", &self.geometry.page_size)
            .field("pointer_bits", &self.geometry.width.bits())
            .field("pages", &self.geometry.page_count)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl<B: Deref<Target = [u8]>> PartialEq<PagedBitmapRef<B>> for PagedBitmap {
    fn eq(&self, other: &PagedBitmapRef<B>) -> bool {
        *self == other.to_owned_bitmap()
    }
}

impl<B: Deref<Target = [u8]>> PartialEq<PagedBitmap> for PagedBitmapRef<B> {
    fn eq(&self, other: &PagedBitmap) -> bool {
        self.to_owned_bitmap() == *other
    }
}
