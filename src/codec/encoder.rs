use bytes::BufMut;
use crc64fast_nvme::Digest;
use zerocopy::IntoBytes;

use crate::{
    PagedBitmap,
    codec::{footer::Footer, header::Header},
};

pub struct Encoder<B: BufMut> {
    buf: B,
    bytes_written: usize,
    checksum: Digest,
    wrote_footer: bool,
}

impl<B: BufMut> Encoder<B> {
    pub fn new(buf: B) -> Self {
        Self {
            buf,
            bytes_written: 0,
            checksum: Digest::new(),
            wrote_footer: false,
        }
    }

    /// Retrieve the wrapped buffer from the `Encoder`
    pub fn into_inner(self) -> B {
        self.buf
    }

    /// The total number of bytes written to the buffer since this Encoder was
    /// initialized.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Write a run of 32-bit words in little endian order.
    pub(crate) fn put_words(&mut self, words: &[u32]) {
        for &word in words {
            self.put_slice(&word.to_le_bytes());
        }
    }

    /// Write the geometry header describing `bitmap`.
    pub(crate) fn put_header(&mut self, bitmap: &PagedBitmap) {
        let header = Header::new(bitmap);
        self.put_slice(header.as_bytes());
    }

    /// Write the checksum and magic value to the buffer
    pub(crate) fn write_footer(&mut self) {
        assert!(
            !self.wrote_footer,
            "invalid encoder usage: footer already present"
        );
        self.wrote_footer = true;
        let footer = Footer::from_checksum(self.checksum.sum64());
        self.put_slice(footer.as_bytes());
    }

    fn put_slice(&mut self, data: &[u8]) {
        self.checksum.write(data);
        self.buf.put_slice(data);
        self.bytes_written += data.len();
    }
}
