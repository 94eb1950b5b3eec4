use std::fmt::{self, Debug};

use itertools::Itertools;

use crate::page::WORD_BITS;

/// Returns the smallest power-of-two bit width, starting at one, able to
/// address `n_pages` distinct pages.
///
/// ```
/// use pointset_rs::bits_per_pointer;
///
/// assert_eq!(bits_per_pointer(1), 1);
/// assert_eq!(bits_per_pointer(5), 4);
/// assert_eq!(bits_per_pointer(16), 4);
/// assert_eq!(bits_per_pointer(17), 8);
/// ```
pub fn bits_per_pointer(n_pages: usize) -> u32 {
    let mut bits = 1;
    while bits < usize::BITS && (1usize << bits) < n_pages {
        bits <<= 1;
    }
    bits
}

/// The width of a packed page pointer: a power of two which evenly divides a
/// 32-bit word, so fields never straddle two words.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerWidth(u32);

impl PointerWidth {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(WORD_BITS);

    pub fn for_pages(n_pages: usize) -> Self {
        let bits = bits_per_pointer(n_pages);
        assert!(
            bits <= WORD_BITS,
            "BUG: {n_pages} pages cannot be addressed by a 32-bit pointer"
        );
        Self(bits)
    }

    /// Returns the width for `bits` if it is a power of two no larger than a
    /// word.
    pub fn from_bits(bits: u32) -> Option<Self> {
        (bits.is_power_of_two() && bits <= WORD_BITS).then_some(Self(bits))
    }

    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn per_word(self) -> usize {
        (WORD_BITS / self.0) as usize
    }

    #[inline]
    pub fn mask(self) -> u32 {
        u32::MAX >> (WORD_BITS - self.0)
    }

    /// Number of words needed to store `len` pointers.
    #[inline]
    pub fn words_for(self, len: usize) -> usize {
        len.div_ceil(self.per_word())
    }

    /// Extracts the pointer at `idx` from a packed word slice.
    #[inline]
    pub(crate) fn extract(self, words: &[u32], idx: usize) -> u32 {
        let per_word = self.per_word();
        let shift = (idx % per_word) as u32 * self.0;
        (words[idx / per_word] >> shift) & self.mask()
    }
}

impl Debug for PointerWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PointerWidth({})", self.0)
    }
}

/// A sequence of page pointers packed into fixed-width bit fields, low bits
/// first, inside 32-bit words.
#[derive(Clone, PartialEq, Eq)]
pub struct PackedIndex {
    words: Vec<u32>,
    width: PointerWidth,
    len: usize,
}

impl PackedIndex {
    /// Packs `pointers` into `width`-bit fields.
    ///
    /// # Panics
    ///
    /// Panics if a pointer does not fit into `width` bits. Silently truncating
    /// it would corrupt every lookup through that slot.
    pub fn pack(pointers: &[u32], width: PointerWidth) -> Self {
        let mut words = Vec::with_capacity(width.words_for(pointers.len()));
        let mut word = 0u32;
        let mut filled = 0u32;

        for &pointer in pointers {
            assert!(
                pointer & !width.mask() == 0,
                "BUG: pointer {pointer} does not fit into {} bits",
                width.bits()
            );
            word |= pointer << filled;
            filled += width.bits();
            if filled == WORD_BITS {
                words.push(word);
                word = 0;
                filled = 0;
            }
            assert!(filled < WORD_BITS, "BUG: packed field crossed a word boundary");
        }
        if filled > 0 {
            words.push(word);
        }

        debug_assert_eq!(words.len(), width.words_for(pointers.len()));
        Self { words, width, len: pointers.len() }
    }

    /// Reassembles a packed index from raw words, returning `None` when the
    /// word count does not match `len`.
    pub fn from_words(words: Vec<u32>, width: PointerWidth, len: usize) -> Option<Self> {
        (words.len() == width.words_for(len)).then_some(Self { words, width, len })
    }

    /// Returns the pointer stored at `idx`.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<u32> {
        (idx < self.len).then(|| self.width.extract(&self.words, idx))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = u32> + '_ {
        (0..self.len).map(|idx| self.width.extract(&self.words, idx))
    }

    pub fn unpack(&self) -> Vec<u32> {
        self.iter().collect_vec()
    }

    #[inline]
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    #[inline]
    pub fn width(&self) -> PointerWidth {
        self.width
    }

    /// The number of packed pointers.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn encoded_size(&self) -> usize {
        self.words.len() * size_of::<u32>()
    }
}

impl Debug for PackedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PackedIndex({} x {} bits in {} words)",
            self.len,
            self.width.bits(),
            self.words.len()
        )
    }
}
