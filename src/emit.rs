//! Renders compiled tables as static data declarations.

use std::fmt::{self, Write};

use indoc::writedoc;

use crate::{FlatBitmap, PagedBitmap, config::Table, page::WORD_BITS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// GLib flavoured C: `static const guint32` arrays.
    #[default]
    C,
    /// `static` arrays plus an `is_<name>` lookup function.
    Rust,
}

const WORDS_PER_LINE: usize = 4;

pub fn write_table<W: Write>(
    out: &mut W,
    lang: Language,
    name: &str,
    table: &Table,
) -> fmt::Result {
    match table {
        Table::Flat(flat) => write_flat(out, lang, name, flat),
        Table::Paged(paged) => write_paged(out, lang, name, paged),
    }
}

/// Emits a flat bitmap as a single word array called `name`.
pub fn write_flat<W: Write>(
    out: &mut W,
    lang: Language,
    name: &str,
    flat: &FlatBitmap,
) -> fmt::Result {
    match lang {
        Language::C => write_c_array(out, name, flat.words()),
        Language::Rust => {
            let upper = screaming_snake_case(name);
            let snake = snake_case(name);
            write_rust_array(out, &upper, flat.words())?;
            writedoc!(
                out,
                "
                #[inline]
                pub fn is_{snake}(cp: u32) -> bool {{
                    match {upper}.get(cp as usize / 32) {{
                        Some(word) => (word >> (cp % 32)) & 1 != 0,
                        None => false,
                    }}
                }}

                "
            )
        }
    }
}

/// Emits a paged bitmap as `<name>_index` (packed page pointers) and
/// `<name>_pages` (one row of words per unique page).
pub fn write_paged<W: Write>(
    out: &mut W,
    lang: Language,
    name: &str,
    bitmap: &PagedBitmap,
) -> fmt::Result {
    let rows = bitmap.page_words().collect::<Vec<_>>();
    match lang {
        Language::C => {
            write_c_array(out, &format!("{name}_index"), bitmap.index().words())?;
            write_c_2dim_array(out, &format!("{name}_pages"), &rows)
        }
        Language::Rust => {
            let upper = screaming_snake_case(name);
            let snake = snake_case(name);
            write_rust_array(out, &format!("{upper}_INDEX"), bitmap.index().words())?;
            write_rust_2dim_array(out, &format!("{upper}_PAGES"), &rows)?;

            let size = bitmap.page_size();
            let width = bitmap.index().width();
            let bits = size.bits();
            let slots = size.slots();
            let per_word = width.per_word();
            let pointer_bits = width.bits();
            let pointer_mask = width.mask();
            let offset_mask = size.codepoints() - 1;
            writedoc!(
                out,
                "
                #[inline]
                pub fn is_{snake}(cp: u32) -> bool {{
                    let page = (cp >> {bits}) as usize;
                    if page >= {slots} {{
                        return false;
                    }}
                    let word = {upper}_INDEX[page / {per_word}];
                    let ptr = (word >> (page % {per_word} * {pointer_bits})) & {pointer_mask:#x};
                    let offset = cp as usize & {offset_mask:#x};
                    ({upper}_PAGES[ptr as usize][offset / 32] >> (offset % 32)) & 1 != 0
                }}

                "
            )
        }
    }
}

fn write_c_array<W: Write>(out: &mut W, name: &str, words: &[u32]) -> fmt::Result {
    write!(out, "static const guint32 {name}[] =\n  {{")?;
    write_c_words(out, words, "\n    ")?;
    out.write_str("\n  };\n\n")
}

fn write_c_2dim_array<W: Write>(out: &mut W, name: &str, rows: &[&[u32]]) -> fmt::Result {
    let n = rows.first().map_or(0, |row| row.len());
    write!(out, "static const guint32 {name}[][{n}] =\n  {{\n")?;
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            out.write_str(",\n")?;
        }
        out.write_str("    {")?;
        write_c_words(out, row, "\n      ")?;
        out.write_str("\n    }")?;
    }
    out.write_str("\n  };\n\n")
}

fn write_c_words<W: Write>(out: &mut W, words: &[u32], line_start: &str) -> fmt::Result {
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        if i % WORDS_PER_LINE == 0 {
            out.write_str(line_start)?;
        } else {
            out.write_char(' ')?;
        }
        write!(out, "0x{word:08x}")?;
    }
    Ok(())
}

fn write_rust_array<W: Write>(out: &mut W, name: &str, words: &[u32]) -> fmt::Result {
    writeln!(out, "pub static {name}: [u32; {}] = [", words.len())?;
    write_rust_words(out, words, "    ")?;
    out.write_str("];\n\n")
}

fn write_rust_2dim_array<W: Write>(out: &mut W, name: &str, rows: &[&[u32]]) -> fmt::Result {
    let n = rows.first().map_or(0, |row| row.len());
    writeln!(out, "pub static {name}: [[u32; {n}]; {}] = [", rows.len())?;
    for row in rows {
        out.write_str("    [\n")?;
        write_rust_words(out, row, "        ")?;
        out.write_str("    ],\n")?;
    }
    out.write_str("];\n\n")
}

fn write_rust_words<W: Write>(out: &mut W, words: &[u32], indent: &str) -> fmt::Result {
    for line in words.chunks(WORDS_PER_LINE) {
        out.write_str(indent)?;
        for (i, word) in line.iter().enumerate() {
            if i > 0 {
                out.write_char(' ')?;
            }
            write!(out, "0x{word:08x},")?;
        }
        out.write_char('\n')?;
    }
    Ok(())
}

/// `NameStartChar` -> `name_start_char`
fn snake_case(name: &str) -> String {
    let mut snake = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if !c.is_ascii_alphanumeric() {
            if !snake.is_empty() && !snake.ends_with('_') {
                snake.push('_');
            }
            prev_lower = false;
            continue;
        }
        if c.is_ascii_uppercase() && prev_lower {
            snake.push('_');
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        snake.push(c.to_ascii_lowercase());
    }
    snake
}

fn screaming_snake_case(name: &str) -> String {
    snake_case(name).to_ascii_uppercase()
}

static_assertions::const_assert_eq!(WORD_BITS, 32);

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::{CodepointSet, PageSize, TableConfig, config::Encoding};

    fn ascii_upper() -> CodepointSet {
        CodepointSet::from_ranges(['A' as u32..='Z' as u32])
    }

    #[test]
    fn test_case_conversion() {
        assert_eq!(snake_case("NameStartChar"), "name_start_char");
        assert_eq!(snake_case("name-char"), "name_char");
        assert_eq!(snake_case("XMLName2"), "xmlname2");
        assert_eq!(screaming_snake_case("NameChar"), "NAME_CHAR");
    }

    #[test]
    fn test_c_flat() {
        let flat = FlatBitmap::encode(&ascii_upper(), 160);
        let mut out = String::new();
        write_flat(&mut out, Language::C, "Upper", &flat).unwrap();
        assert_eq!(
            out,
            indoc! {"
                static const guint32 Upper[] =
                  {
                    0x00000000, 0x00000000, 0x07fffffe, 0x00000000,
                    0x00000000
                  };

            "}
        );
    }

    #[test]
    fn test_c_paged() {
        let bitmap = PagedBitmap::compile(&ascii_upper(), PageSize::new(20).unwrap());
        let mut out = String::new();
        write_paged(&mut out, Language::C, "Upper", &bitmap).unwrap();

        let (index, pages) = out.split_once("\n\n").unwrap();
        assert_eq!(
            index,
            indoc! {"
                static const guint32 Upper_index[] =
                  {
                    0x00000002
                  };"}
        );
        assert!(pages.starts_with(indoc! {"
            static const guint32 Upper_pages[][32768] =
              {
                {
                  0x00000000, 0x00000000, 0x07fffffe, 0x00000000,
        "}));
        assert_eq!(pages.matches("    {\n").count(), 2);
        assert!(pages.ends_with("\n    }\n  };\n\n"));
    }

    #[test]
    fn test_rust_paged() {
        let bitmap = PagedBitmap::compile(&ascii_upper(), PageSize::DEFAULT);
        let mut out = String::new();
        write_paged(&mut out, Language::Rust, "AsciiUpper", &bitmap).unwrap();

        // every page past the first is empty and points at page 1
        assert!(out.starts_with(indoc! {"
            pub static ASCII_UPPER_INDEX: [u32; 64] = [
                0xfffffffe, 0xffffffff, 0xffffffff, 0xffffffff,
        "}));
        assert!(out.contains(indoc! {"
            pub static ASCII_UPPER_PAGES: [[u32; 32]; 2] = [
                [
                    0x00000000, 0x00000000, 0x07fffffe, 0x00000000,
        "}));
        assert!(out.contains(indoc! {"
            pub fn is_ascii_upper(cp: u32) -> bool {
                let page = (cp >> 10) as usize;
                if page >= 2048 {
                    return false;
                }
                let word = ASCII_UPPER_INDEX[page / 32];
                let ptr = (word >> (page % 32 * 1)) & 0x1;
                let offset = cp as usize & 0x3ff;
                (ASCII_UPPER_PAGES[ptr as usize][offset / 32] >> (offset % 32)) & 1 != 0
            }
        "}));
    }

    #[test]
    fn test_rust_flat_table() {
        let table = TableConfig::default()
            .with_encoding(Encoding::Flat)
            .with_max_codepoint(128)
            .compile(&ascii_upper());
        let mut out = String::new();
        write_table(&mut out, Language::Rust, "Upper", &table).unwrap();
        assert!(out.starts_with(indoc! {"
            pub static UPPER: [u32; 4] = [
                0x00000000, 0x00000000, 0x07fffffe, 0x00000000,
            ];

            #[inline]
            pub fn is_upper(cp: u32) -> bool {
        "}));
    }
}
