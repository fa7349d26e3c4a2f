//! Deep symbol storage.
//!
//! Deep in this context means the storage owns the entire coding buffer
//! internally: one contiguous matrix of packed coefficient rows and one of
//! payload rows, sized once for the maximum block dimensions and re-used
//! across blocks. This is the natural arrangement for a decoder, where no
//! external decoding buffer exists yet, and it keeps every row operation a
//! plain slice operation with no per-row allocation.
//!
//! Rows are addressed by slot index. Strides are fixed at the maximum
//! dimensions so that re-initializing to a smaller block never repacks.

use crate::field::BlockField;
use std::marker::PhantomData;

/// Owned coefficient and payload matrices for one block.
///
/// For each slot `i` in `[0, symbols)` the storage exposes a packed
/// coefficient row of [`BlockField::vector_len`] bytes and a payload row of
/// `symbol_size` bytes. The decoder mutates both in place during
/// echelonization; once a slot holds a decoded symbol the payload row *is*
/// the source data.
#[derive(Debug, Clone)]
pub struct SymbolStorage<F: BlockField> {
    /// Maximum block dimensions fixed at construction.
    max_symbols: usize,
    max_symbol_size: usize,
    /// Row strides derived from the maximums.
    max_vector_len: usize,
    /// Active block dimensions set by `initialize`.
    symbols: usize,
    symbol_size: usize,
    vector_len: usize,
    /// Packed coefficient rows, `max_symbols * max_vector_len` bytes.
    vectors: Vec<u8>,
    /// Payload rows, `max_symbols * max_symbol_size` bytes.
    data: Vec<u8>,
    _field: PhantomData<F>,
}

impl<F: BlockField> SymbolStorage<F> {
    /// Allocates storage for blocks of up to `max_symbols` symbols of up to
    /// `max_symbol_size` bytes each.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(max_symbols: usize, max_symbol_size: usize) -> Self {
        assert!(max_symbols > 0, "max_symbols must be non-zero");
        assert!(max_symbol_size > 0, "max_symbol_size must be non-zero");

        let max_vector_len = F::vector_len(max_symbols);
        Self {
            max_symbols,
            max_symbol_size,
            max_vector_len,
            symbols: 0,
            symbol_size: 0,
            vector_len: 0,
            vectors: vec![0; max_symbols * max_vector_len],
            data: vec![0; max_symbols * max_symbol_size],
            _field: PhantomData,
        }
    }

    /// Re-initializes the storage for a block of `symbols` symbols of
    /// `symbol_size` bytes, zero-filling both matrices.
    ///
    /// # Panics
    ///
    /// Panics if a dimension is zero or exceeds the construction capacity.
    pub fn initialize(&mut self, symbols: usize, symbol_size: usize) {
        assert!(
            symbols > 0 && symbols <= self.max_symbols,
            "symbols out of range"
        );
        assert!(
            symbol_size > 0 && symbol_size <= self.max_symbol_size,
            "symbol_size out of range"
        );

        self.symbols = symbols;
        self.symbol_size = symbol_size;
        self.vector_len = F::vector_len(symbols);
        self.vectors.fill(0);
        self.data.fill(0);
    }

    /// Maximum number of symbols per block.
    #[inline]
    #[must_use]
    pub fn max_symbols(&self) -> usize {
        self.max_symbols
    }

    /// Maximum payload row length in bytes.
    #[inline]
    #[must_use]
    pub fn max_symbol_size(&self) -> usize {
        self.max_symbol_size
    }

    /// Number of symbols in the active block. Zero before `initialize`.
    #[inline]
    #[must_use]
    pub fn symbols(&self) -> usize {
        self.symbols
    }

    /// Payload row length of the active block in bytes.
    #[inline]
    #[must_use]
    pub fn symbol_size(&self) -> usize {
        self.symbol_size
    }

    /// Packed coefficient row length of the active block in bytes.
    #[inline]
    #[must_use]
    pub fn vector_len(&self) -> usize {
        self.vector_len
    }

    /// Total payload bytes of the active block.
    #[inline]
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.symbols * self.symbol_size
    }

    /// The coefficient row for slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= symbols`.
    #[inline]
    #[must_use]
    pub fn vector(&self, index: usize) -> &[u8] {
        assert!(index < self.symbols, "slot index out of range");
        let start = index * self.max_vector_len;
        &self.vectors[start..start + self.vector_len]
    }

    /// The payload row for slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= symbols`.
    #[inline]
    #[must_use]
    pub fn symbol(&self, index: usize) -> &[u8] {
        assert!(index < self.symbols, "slot index out of range");
        let start = index * self.max_symbol_size;
        &self.data[start..start + self.symbol_size]
    }

    /// Both rows of slot `index`, read-only.
    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> (&[u8], &[u8]) {
        (self.vector(index), self.symbol(index))
    }

    /// Both rows of slot `index`, mutable.
    ///
    /// # Panics
    ///
    /// Panics if `index >= symbols`.
    #[inline]
    pub fn row_mut(&mut self, index: usize) -> (&mut [u8], &mut [u8]) {
        assert!(index < self.symbols, "slot index out of range");
        let v_start = index * self.max_vector_len;
        let s_start = index * self.max_symbol_size;
        (
            &mut self.vectors[v_start..v_start + self.vector_len],
            &mut self.data[s_start..s_start + self.symbol_size],
        )
    }

    /// Copies `data` into the payload row of slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= symbols` or `data.len() != symbol_size`.
    pub fn set_symbol(&mut self, index: usize, data: &[u8]) {
        assert_eq!(data.len(), self.symbol_size, "symbol size mismatch");
        let (_, symbol) = self.row_mut(index);
        symbol.copy_from_slice(data);
    }

    /// Fills the payload rows sequentially from `data`.
    ///
    /// `data` may be shorter than the block; the tail rows stay zero. Used by
    /// the encoder to load a (possibly partial) final block of an object.
    ///
    /// # Panics
    ///
    /// Panics if `data` is longer than the block.
    pub fn set_symbols(&mut self, data: &[u8]) {
        assert!(data.len() <= self.block_size(), "data exceeds block size");
        for (index, chunk) in data.chunks(self.symbol_size).enumerate() {
            let (_, symbol) = self.row_mut(index);
            symbol[..chunk.len()].copy_from_slice(chunk);
        }
    }

    /// Copies the payload rows sequentially into `dest`, up to
    /// `min(dest.len(), block_size)` bytes, and returns the bytes copied.
    pub fn copy_symbols(&self, dest: &mut [u8]) -> usize {
        let total = std::cmp::min(dest.len(), self.block_size());
        let mut copied = 0;
        while copied < total {
            let index = copied / self.symbol_size;
            let offset = copied % self.symbol_size;
            let n = std::cmp::min(total - copied, self.symbol_size - offset);
            dest[copied..copied + n].copy_from_slice(&self.symbol(index)[offset..offset + n]);
            copied += n;
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::gf2::Gf2;
    use crate::field::gf256::Gf256;

    #[test]
    fn dimensions_after_initialize() {
        let mut storage = SymbolStorage::<Gf256>::new(8, 100);
        storage.initialize(5, 64);
        assert_eq!(storage.symbols(), 5);
        assert_eq!(storage.symbol_size(), 64);
        assert_eq!(storage.vector_len(), 5);
        assert_eq!(storage.block_size(), 320);
    }

    #[test]
    fn gf2_rows_are_bit_packed() {
        let mut storage = SymbolStorage::<Gf2>::new(20, 10);
        storage.initialize(20, 10);
        assert_eq!(storage.vector(0).len(), 3);
    }

    #[test]
    fn set_and_read_symbol() {
        let mut storage = SymbolStorage::<Gf256>::new(4, 8);
        storage.initialize(4, 8);
        storage.set_symbol(2, &[9u8; 8]);
        assert_eq!(storage.symbol(2), &[9u8; 8]);
        assert_eq!(storage.symbol(1), &[0u8; 8]);
    }

    #[test]
    fn set_symbols_pads_partial_tail() {
        let mut storage = SymbolStorage::<Gf256>::new(3, 4);
        storage.initialize(3, 4);
        storage.set_symbols(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(storage.symbol(0), &[1, 2, 3, 4]);
        assert_eq!(storage.symbol(1), &[5, 6, 0, 0]);
        assert_eq!(storage.symbol(2), &[0, 0, 0, 0]);
    }

    #[test]
    fn copy_symbols_truncates_to_dest() {
        let mut storage = SymbolStorage::<Gf256>::new(2, 4);
        storage.initialize(2, 4);
        storage.set_symbols(&[1, 2, 3, 4, 5, 6, 7, 8]);

        let mut dest = [0u8; 6];
        assert_eq!(storage.copy_symbols(&mut dest), 6);
        assert_eq!(dest, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn reinitialize_zeroes_rows() {
        let mut storage = SymbolStorage::<Gf256>::new(2, 4);
        storage.initialize(2, 4);
        storage.set_symbol(0, &[0xFF; 4]);
        storage.initialize(2, 3);
        assert_eq!(storage.symbol(0), &[0, 0, 0]);
        assert_eq!(storage.symbol_size(), 3);
    }

    #[test]
    #[should_panic(expected = "symbols out of range")]
    fn initialize_beyond_capacity_panics() {
        let mut storage = SymbolStorage::<Gf256>::new(2, 4);
        storage.initialize(3, 4);
    }
}
