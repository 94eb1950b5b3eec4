//! Pointset compiles a Unicode code point classification rule into a compact,
//! queryable bitmap table.
//!
//! ## Key Features:
//!
//! - **Paged Encoding**: The 21-bit code space is split into fixed-size pages.
//!   Identical pages are stored once and referenced through a page index whose
//!   entries are packed into the narrowest power-of-two bit width that can
//!   address every unique page.
//!
//! - **Size Analysis**: [`analyze`] reports the encoded size of a class across
//!   candidate page sizes so the page granularity can be tuned per class.
//!
//! - **Zero-copy Access**: [`PagedBitmapRef`] answers membership queries
//!   directly from an encoded buffer, from any type implementing
//!   `Deref<Target = [u8]>`.
//!
//! ```
//! use pointset_rs::{CodepointSet, PageSize, PagedBitmap, classes::NAME_START_CHAR};
//!
//! let set = CodepointSet::parse(NAME_START_CHAR).unwrap();
//! let bitmap = PagedBitmap::compile(&set, PageSize::DEFAULT);
//!
//! assert!(bitmap.contains('A' as u32));
//! assert!(!bitmap.contains('-' as u32));
//! assert_eq!(bitmap.pages().len(), 8);
//! ```

use thiserror::Error;

pub mod analysis;
pub mod classes;
pub mod codec;
mod codepoint_set;
pub mod config;
pub mod emit;
mod flat;
mod pack;
mod page;
mod paged;
mod table;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use analysis::{SizeEstimate, SizeReport, analyze};
pub use codec::{DecodeErr, Encodable, PagedBitmapRef};
pub use codepoint_set::CodepointSet;
pub use config::{Encoding, Table, TableConfig};
pub use flat::FlatBitmap;
pub use pack::{PackedIndex, PointerWidth, bits_per_pointer};
pub use page::{Page, PageSize};
pub use paged::PagedBitmap;
pub use table::PageTable;

/// Number of significant bits in a Unicode code point.
pub const CODEPOINT_BITS: u32 = 21;

/// One past the largest valid code point (`U+10FFFF`).
pub const CODEPOINT_LIMIT: u32 = 0x11_0000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildErr {
    #[error("malformed range specification {spec:?}: {reason}")]
    MalformedRange { spec: String, reason: &'static str },

    #[error("invalid page size of {0} bits: pages must span 2^5 to 2^21 code points")]
    InvalidPageSize(u32),
}
