use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, LittleEndian, U32, Unaligned};

use crate::{PageSize, PagedBitmap, PointerWidth, codec::DecodeErr};

/// Table geometry, stored between the table data and the footer.
#[derive(Debug, FromBytes, IntoBytes, Immutable, Unaligned, KnownLayout)]
#[repr(C)]
pub struct Header {
    page_bits: u8,
    pointer_bits: u8,
    reserved: [u8; 2],
    index_len: U32<LittleEndian>,
    page_count: U32<LittleEndian>,
}

static_assertions::const_assert_eq!(Header::SIZE, 12);

/// A header which passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Geometry {
    pub page_size: PageSize,
    pub width: PointerWidth,
    pub index_len: usize,
    pub page_count: usize,
}

impl Geometry {
    #[inline]
    pub fn index_bytes(&self) -> usize {
        self.width.words_for(self.index_len) * size_of::<u32>()
    }

    #[inline]
    pub fn page_bytes(&self) -> usize {
        self.page_count * self.page_size.bytes()
    }
}

impl Header {
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub fn new(bitmap: &PagedBitmap) -> Self {
        Self {
            page_bits: bitmap.page_size().bits() as u8,
            pointer_bits: bitmap.index().width().bits() as u8,
            reserved: [0; 2],
            index_len: (bitmap.index().len() as u32).into(),
            page_count: (bitmap.pages().len() as u32).into(),
        }
    }

    pub(crate) fn validate(&self) -> Result<Geometry, DecodeErr> {
        let page_size = PageSize::new(self.page_bits.into()).map_err(|_| DecodeErr::Validity)?;
        let width = PointerWidth::from_bits(self.pointer_bits.into()).ok_or(DecodeErr::Validity)?;
        let index_len = self.index_len.get() as usize;
        let page_count = self.page_count.get() as usize;

        if self.reserved != [0; 2]
            || index_len != page_size.slots()
            || page_count == 0
            || page_count > index_len
            || width != PointerWidth::for_pages(page_count)
        {
            return Err(DecodeErr::Validity);
        }

        Ok(Geometry { page_size, width, index_len, page_count })
    }
}
