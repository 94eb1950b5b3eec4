use crc64fast_nvme::Digest;
use zerocopy::{
    ByteEq, ByteHash, FromBytes, Immutable, IntoBytes, KnownLayout, LittleEndian, U64, Unaligned,
};

use crate::codec::DecodeErr;

/// The last four bytes of an encoded table
pub const POINTSET_MAGIC: [u8; 4] = [0x50, 0x53, 0x10, 0xB7];

#[derive(FromBytes, IntoBytes, Immutable, Unaligned, KnownLayout, ByteHash, ByteEq)]
#[repr(C)]
pub struct Footer {
    checksum: U64<LittleEndian>,
    magic: [u8; 4],
}

static_assertions::const_assert_eq!(Footer::SIZE, 12);

impl Footer {
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub fn from_checksum(checksum: u64) -> Self {
        Self {
            checksum: checksum.into(),
            magic: POINTSET_MAGIC,
        }
    }

    /// Builds the footer sealing `data`.
    pub fn for_data(data: &[u8]) -> Self {
        Self::from_checksum(checksum(data))
    }

    pub fn validate(&self, data: &[u8]) -> Result<(), DecodeErr> {
        if self.magic != POINTSET_MAGIC {
            return Err(DecodeErr::Magic);
        }
        if checksum(data) != self.checksum.get() {
            return Err(DecodeErr::Checksum);
        }
        Ok(())
    }
}

fn checksum(data: &[u8]) -> u64 {
    let mut c = Digest::new();
    c.write(data);
    c.sum64()
}
