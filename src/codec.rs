//! Binary encoding of a [`PagedBitmap`].
//!
//! All integers are little endian. An encoded table is laid out as:
//!
//! ```text
//! [packed index words][page words, one row per unique page][Header][Footer]
//! ```
//!
//! The footer holds a CRC64 (NVMe) checksum of everything before it followed
//! by a four byte magic value.

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;
use zerocopy::{ConvertError, SizeError};

use crate::{PagedBitmap, codec::encoder::Encoder};

pub mod encoder;
pub mod footer;
pub mod header;
pub mod paged_ref;

pub use paged_ref::PagedBitmapRef;

pub trait Encodable {
    fn encoded_size(&self) -> usize;

    fn encode<B: BufMut>(&self, encoder: &mut Encoder<B>);

    fn encode_to_bytes(&self) -> Bytes {
        let size = self.encoded_size();
        let mut encoder = Encoder::new(BytesMut::with_capacity(size));
        self.encode(&mut encoder);
        encoder.into_inner().freeze()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeErr {
    #[error("not enough bytes")]
    Length,

    #[error("invalid encoding")]
    Validity,

    #[error("unknown magic value")]
    Magic,

    #[error("invalid checksum")]
    Checksum,
}

impl<S, D> From<SizeError<S, D>> for DecodeErr {
    fn from(_: SizeError<S, D>) -> Self {
        DecodeErr::Length
    }
}

impl<A, S, V> From<ConvertError<A, S, V>> for DecodeErr {
    fn from(err: ConvertError<A, S, V>) -> Self {
        match err {
            ConvertError::Alignment(_) => panic!("All zerocopy transmutations must be unaligned"),
            ConvertError::Size(_) => DecodeErr::Length,
            ConvertError::Validity(_) => DecodeErr::Validity,
        }
    }
}

impl Encodable for PagedBitmap {
    fn encoded_size(&self) -> usize {
        self.table_size() + header::Header::SIZE + footer::Footer::SIZE
    }

    fn encode<B: BufMut>(&self, encoder: &mut Encoder<B>) {
        let start = encoder.bytes_written();
        encoder.put_words(self.index().words());
        for row in self.page_words() {
            encoder.put_words(row);
        }
        encoder.put_header(self);
        encoder.write_footer();
        debug_assert_eq!(encoder.bytes_written() - start, self.encoded_size());
    }
}

impl PagedBitmap {
    /// Encodes this table into a [`PagedBitmapRef`] for zero-copy querying.
    pub fn encode_to_ref(&self) -> PagedBitmapRef<Bytes> {
        PagedBitmapRef::from_encoded(self.encode_to_bytes())
    }
}
