use crate::{BuildErr, CODEPOINT_LIMIT, CodepointSet, FlatBitmap, PageSize, PagedBitmap};

/// The table layout handed to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// One bit per code point below `max_codepoint`.
    Flat,

    /// Packed page index plus deduplicated pages.
    #[default]
    Paged,
}

/// Settings for compiling a [`CodepointSet`] into a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    pub encoding: Encoding,
    pub page_size: PageSize,
    /// Upper bound (exclusive) of the flat encoding.
    pub max_codepoint: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::default(),
            page_size: PageSize::DEFAULT,
            max_codepoint: CODEPOINT_LIMIT,
        }
    }
}

impl TableConfig {
    pub fn with_encoding(self, encoding: Encoding) -> Self {
        Self { encoding, ..self }
    }

    pub fn with_page_bits(self, bits: u32) -> Result<Self, BuildErr> {
        Ok(Self { page_size: PageSize::new(bits)?, ..self })
    }

    pub fn with_max_codepoint(self, max_codepoint: u32) -> Self {
        Self { max_codepoint, ..self }
    }

    pub fn compile(&self, set: &CodepointSet) -> Table {
        match self.encoding {
            Encoding::Flat => Table::Flat(FlatBitmap::encode(set, self.max_codepoint)),
            Encoding::Paged => Table::Paged(PagedBitmap::compile(set, self.page_size)),
        }
    }
}

/// A compiled table in either encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Table {
    Flat(FlatBitmap),
    Paged(PagedBitmap),
}

impl Table {
    #[inline]
    pub fn contains(&self, codepoint: u32) -> bool {
        match self {
            Table::Flat(flat) => flat.contains(codepoint),
            Table::Paged(paged) => paged.contains(codepoint),
        }
    }

    /// Bytes of static data needed to embed this table.
    pub fn table_size(&self) -> usize {
        match self {
            Table::Flat(flat) => flat.encoded_size(),
            Table::Paged(paged) => paged.table_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::classes::NAME_CHAR;

    #[test]
    fn test_defaults() {
        let config = TableConfig::default();
        assert_eq!(config.encoding, Encoding::Paged);
        assert_eq!(config.page_size.bits(), 10);
        assert_eq!(config.max_codepoint, 0x110000);
    }

    #[test]
    fn test_overrides() {
        let config = TableConfig::default()
            .with_encoding(Encoding::Flat)
            .with_max_codepoint(0x100)
            .with_page_bits(12)
            .unwrap();
        assert_eq!(config.encoding, Encoding::Flat);
        assert_eq!(config.max_codepoint, 0x100);
        assert_eq!(config.page_size.bits(), 12);

        assert_matches!(
            TableConfig::default().with_page_bits(3),
            Err(BuildErr::InvalidPageSize(3))
        );
    }

    #[test]
    fn test_compile_both_encodings() {
        let set = CodepointSet::parse(NAME_CHAR).unwrap();
        let flat = TableConfig::default().with_encoding(Encoding::Flat).compile(&set);
        let paged = TableConfig::default().compile(&set);

        assert_matches!(flat, Table::Flat(_));
        assert_matches!(paged, Table::Paged(_));
        assert_eq!(flat.table_size(), 0x110000 / 8);
        assert_eq!(paged.table_size(), 2048);

        for cp in (0..0x110000).step_by(97) {
            assert_eq!(flat.contains(cp), paged.contains(cp), "U+{cp:04X}");
        }
    }
}
