//! Standard character class productions.
//!
//! Productions are plain inputs to [`CodepointSet::parse`]; nothing in the
//! crate depends on these particular classes.

use crate::{BuildErr, CodepointSet};

macro_rules! name_start_char {
    () => {
        r#"
        ":" | [A-Z] | "_" | [a-z] | [#xC0-#xD6] | [#xD8-#xF6] | [#xF8-#x2FF]
        | [#x370-#x37D] | [#x37F-#x1FFF] | [#x200C-#x200D] | [#x2070-#x218F]
        | [#x2C00-#x2FEF] | [#x3001-#xD7FF] | [#xF900-#xFDCF] | [#xFDF0-#xFFFD]
        | [#x10000-#xEFFFF]
        "#
    };
}

/// `NameStartChar`, production \[4\] of XML 1.0 (Fifth Edition).
pub const NAME_START_CHAR: &str = name_start_char!();

/// `NameChar`, production \[4a\] of XML 1.0 (Fifth Edition).
pub const NAME_CHAR: &str = concat!(
    name_start_char!(),
    r#"
        | "-" | "." | [0-9] | #xB7 | [#x0300-#x036F] | [#x203F-#x2040]
    "#
);

/// A production paired with the name its generated tables are given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedClass<'a> {
    pub name: &'a str,
    pub production: &'a str,
}

impl<'a> NamedClass<'a> {
    pub const fn new(name: &'a str, production: &'a str) -> Self {
        Self { name, production }
    }

    pub fn compile_set(&self) -> Result<CodepointSet, BuildErr> {
        CodepointSet::parse(self.production)
    }
}

pub const STANDARD_CLASSES: [NamedClass<'static>; 2] = [
    NamedClass::new("NameStartChar", NAME_START_CHAR),
    NamedClass::new("NameChar", NAME_CHAR),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_classes_parse() {
        let start = STANDARD_CLASSES[0].compile_set().unwrap();
        let name = STANDARD_CLASSES[1].compile_set().unwrap();

        assert_eq!(start.len(), 16);
        assert_eq!(name.len(), 22);

        for cp in [':', 'A', '_', 'z', '\u{C0}', '\u{10000}'] {
            assert!(start.contains(cp as u32), "{cp:?}");
            assert!(name.contains(cp as u32), "{cp:?}");
        }
        for cp in ['-', '.', '0', '9', '\u{B7}', '\u{300}', '\u{2040}'] {
            assert!(!start.contains(cp as u32), "{cp:?}");
            assert!(name.contains(cp as u32), "{cp:?}");
        }
        for cp in [' ', '\u{D7}', '\u{F7}', '\u{37E}', '\u{F0000}'] {
            assert!(!name.contains(cp as u32), "{cp:?}");
        }
    }

    #[test]
    fn test_name_char_is_superset() {
        let start = CodepointSet::parse(NAME_START_CHAR).unwrap().to_range_set();
        let name = CodepointSet::parse(NAME_CHAR).unwrap().to_range_set();
        assert!(start.is_subset(&name));
        assert_eq!(name.len() - start.len(), 2 + 10 + 1 + 0x70 + 2);
    }
}
