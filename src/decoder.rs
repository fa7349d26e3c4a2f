//! The incremental Gauss-Jordan block decoder.
//!
//! [`BlockDecoder`] absorbs one packet at a time and keeps its stored rows in
//! reduced echelon form at all times, so no batch solve is ever needed: the
//! moment rank reaches the symbol count, every payload row is a decoded
//! source symbol. Absorption of a coded packet runs forward substitution to
//! the pivot, normalization (skipped in binary fields), forward substitution
//! past the pivot, backward substitution into the stored rows, and finally
//! stores the reduced row. Raw (systematic) packets take a cheaper path, with
//! a swap reorganization when the slot already holds a coded pivot.
//!
//! # Slot states
//!
//! Each slot is `empty`, `coded` (holds a combination pivoted on this
//! column), or `uncoded` (holds the decoded source symbol). Transitions:
//!
//! - `empty -> coded`: coded packet resolves to this pivot
//! - `empty -> uncoded`: raw symbol stored directly
//! - `coded -> uncoded`: raw symbol arrives at a coded slot (swap)
//!
//! `uncoded` is terminal. The block is complete when every slot is occupied.
//!
//! # Failure semantics
//!
//! Linearly dependent coded packets and duplicate raw symbols are discarded
//! silently; callers observe them only as the absence of a rank increase.
//! Out-of-range indices, wrong buffer lengths, and use before `initialize`
//! are programmer errors and panic.

use crate::config::CodecConfig;
use crate::error::ConfigError;
use crate::field::BlockField;
use crate::storage::SymbolStorage;
use crate::tracing_compat::{debug, trace};
use crate::util::Bitset;

// ============================================================================
// Decode statistics
// ============================================================================

/// Counters describing the packets a decoder has absorbed since the last
/// `initialize`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Coded packets handed to `decode`.
    pub coded_packets: u64,
    /// Raw packets handed to `decode_raw`.
    pub raw_packets: u64,
    /// Coded packets dropped as linearly dependent.
    pub linearly_dependent: u64,
    /// Raw packets dropped because the slot was already uncoded.
    pub raw_duplicates: u64,
    /// Raw packets that displaced a coded pivot (swap path).
    pub swaps: u64,
}

// ============================================================================
// Decoder
// ============================================================================

/// An on-line linear block decoder over the field `F`.
///
/// Created with a maximum capacity and re-initialized per block. One decoder
/// instance decodes one block at a time; it owns its matrices exclusively and
/// is a purely synchronous, single-threaded state machine.
#[derive(Debug, Clone)]
pub struct BlockDecoder<F: BlockField> {
    storage: SymbolStorage<F>,
    /// Slots holding a fully decoded source symbol.
    uncoded: Bitset,
    /// Slots holding a coded combination pivoted on that column.
    coded: Bitset,
    /// Number of occupied slots.
    rank: usize,
    /// Highest occupied slot; 0 when rank is 0. No slot above it is occupied.
    max_pivot: usize,
    /// Scratch pair for the swap path, sized at construction.
    scratch_symbol: Vec<u8>,
    scratch_vector: Vec<u8>,
    stats: DecodeStats,
}

impl<F: BlockField> BlockDecoder<F> {
    /// Allocates a decoder with capacity for blocks of up to `max_symbols`
    /// symbols of up to `max_symbol_size` bytes.
    ///
    /// The decoder is not usable until [`initialize`](Self::initialize) sets
    /// the active block dimensions.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(max_symbols: usize, max_symbol_size: usize) -> Self {
        Self {
            storage: SymbolStorage::new(max_symbols, max_symbol_size),
            uncoded: Bitset::new(max_symbols),
            coded: Bitset::new(max_symbols),
            rank: 0,
            max_pivot: 0,
            scratch_symbol: vec![0; max_symbol_size],
            scratch_vector: vec![0; F::vector_len(max_symbols)],
            stats: DecodeStats::default(),
        }
    }

    /// Allocates a decoder from a validated [`CodecConfig`].
    ///
    /// # Errors
    ///
    /// Returns the validation error if the config is rejected.
    pub fn from_config(config: &CodecConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config.max_symbols, config.max_symbol_size))
    }

    /// Re-initializes the decoder for a block of `symbols` symbols of
    /// `symbol_size` bytes: occupancy, rank, maximum pivot, statistics, and
    /// both matrices are reset.
    ///
    /// # Panics
    ///
    /// Panics if a dimension is zero or exceeds the construction capacity.
    pub fn initialize(&mut self, symbols: usize, symbol_size: usize) {
        self.storage.initialize(symbols, symbol_size);
        self.uncoded.clear_all();
        self.coded.clear_all();
        self.rank = 0;
        self.max_pivot = 0;
        self.stats = DecodeStats::default();
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Number of symbols in the active block.
    #[inline]
    #[must_use]
    pub fn symbols(&self) -> usize {
        self.storage.symbols()
    }

    /// Payload length of the active block in bytes.
    #[inline]
    #[must_use]
    pub fn symbol_size(&self) -> usize {
        self.storage.symbol_size()
    }

    /// Packed coefficient-vector length of the active block in bytes.
    #[inline]
    #[must_use]
    pub fn vector_len(&self) -> usize {
        self.storage.vector_len()
    }

    /// Current rank: the number of occupied slots.
    #[inline]
    #[must_use]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// True once the rank equals the symbol count; every payload row then
    /// holds a decoded source symbol.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.rank == self.storage.symbols()
    }

    /// True if slot `index` holds a row, coded or uncoded.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    #[must_use]
    pub fn symbol_exists(&self, index: usize) -> bool {
        assert!(index < self.storage.symbols(), "symbol index out of range");
        self.uncoded.test(index) || self.coded.test(index)
    }

    /// True if slot `index` holds the fully decoded source symbol.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    #[must_use]
    pub fn is_symbol_decoded(&self, index: usize) -> bool {
        assert!(index < self.storage.symbols(), "symbol index out of range");
        self.uncoded.test(index)
    }

    /// The payload row of slot `index`.
    ///
    /// When [`is_symbol_decoded`](Self::is_symbol_decoded) this is source
    /// symbol `index`; for a coded slot it is the partially reduced
    /// combination.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    #[must_use]
    pub fn symbol(&self, index: usize) -> &[u8] {
        self.storage.symbol(index)
    }

    /// The packed coefficient row of slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    #[must_use]
    pub fn coefficient_vector(&self, index: usize) -> &[u8] {
        self.storage.vector(index)
    }

    /// Copies the payload rows sequentially into `dest`, up to
    /// `min(dest.len(), block_size)` bytes, and returns the bytes copied.
    pub fn copy_symbols(&self, dest: &mut [u8]) -> usize {
        self.storage.copy_symbols(dest)
    }

    /// Packet counters since the last `initialize`.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    // ------------------------------------------------------------------
    // Absorption
    // ------------------------------------------------------------------

    /// Absorbs a coded packet: `symbol_data` is the payload, `symbol_id` the
    /// packed coefficient vector describing it as a combination of the source
    /// symbols.
    ///
    /// Both buffers are working storage and are destroyed by the reduction,
    /// whether or not a pivot is found; callers must not reuse their contents.
    /// They must not alias the decoder's own storage. A linearly dependent
    /// packet leaves the decoder bitwise unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the decoder is uninitialized or a buffer length does not
    /// match the active block dimensions.
    pub fn decode(&mut self, symbol_data: &mut [u8], symbol_id: &mut [u8]) {
        assert!(self.storage.symbols() > 0, "decoder not initialized");
        assert_eq!(
            symbol_data.len(),
            self.storage.symbol_size(),
            "symbol buffer length mismatch"
        );
        assert_eq!(
            symbol_id.len(),
            self.storage.vector_len(),
            "vector buffer length mismatch"
        );

        self.stats.coded_packets += 1;
        if !self.decode_with_vector(symbol_data, symbol_id) {
            self.stats.linearly_dependent += 1;
        }
    }

    /// Absorbs a raw (systematic) packet: `symbol_data` is source symbol
    /// `index` verbatim.
    ///
    /// A duplicate raw packet for an already-decoded slot is a no-op. If the
    /// slot holds a coded pivot, the coded row is evicted, reduced by the raw
    /// symbol, and re-absorbed at a strictly higher pivot before the raw
    /// symbol is stored (swap).
    ///
    /// # Panics
    ///
    /// Panics if the decoder is uninitialized, `index` is out of range, or
    /// the buffer length does not match the active symbol size.
    pub fn decode_raw(&mut self, symbol_data: &[u8], index: usize) {
        assert!(self.storage.symbols() > 0, "decoder not initialized");
        assert!(index < self.storage.symbols(), "symbol index out of range");
        assert_eq!(
            symbol_data.len(),
            self.storage.symbol_size(),
            "symbol buffer length mismatch"
        );

        self.stats.raw_packets += 1;

        if self.uncoded.test(index) {
            self.stats.raw_duplicates += 1;
            trace!(index, "duplicate raw symbol dropped");
            return;
        }

        if self.coded.test(index) {
            self.swap_decode(symbol_data, index);
        } else {
            self.store_uncoded_symbol(symbol_data, index);
            self.backward_substitute_elementary(symbol_data, index);

            self.rank += 1;
            self.uncoded.set(index);
            if index > self.max_pivot {
                self.max_pivot = index;
            }
            trace!(index, rank = self.rank, "stored raw symbol");
            if self.is_complete() {
                debug!(rank = self.rank, "block complete");
            }
        }
    }

    // ------------------------------------------------------------------
    // Coded-packet pipeline
    // ------------------------------------------------------------------

    /// Runs the full reduction pipeline on a working row pair and stores it
    /// if a pivot is found. Returns true if the rank increased.
    fn decode_with_vector(&mut self, symbol_data: &mut [u8], symbol_id: &mut [u8]) -> bool {
        let Some(pivot) = self.forward_substitute_to_pivot(symbol_data, symbol_id) else {
            trace!("linearly dependent row dropped");
            return false;
        };

        if !F::IS_BINARY {
            self.normalize(symbol_data, symbol_id, pivot);
        }

        self.forward_substitute_from_pivot(symbol_data, symbol_id, pivot);
        self.backward_substitute(symbol_data, symbol_id, pivot);
        self.store_coded_symbol(symbol_data, symbol_id, pivot);

        self.rank += 1;
        self.coded.set(pivot);
        if pivot > self.max_pivot {
            self.max_pivot = pivot;
        }
        trace!(pivot, rank = self.rank, "stored coded symbol");
        if self.is_complete() {
            debug!(rank = self.rank, "block complete");
        }
        true
    }

    /// Scans columns in ascending order, subtracting every occupied row whose
    /// column carries a non-zero coefficient, until an empty column with a
    /// non-zero residual is found. That column is the pivot. Returns `None`
    /// if the row reduces to zero over the occupied columns: the packet was a
    /// combination of already-stored rows.
    fn forward_substitute_to_pivot(
        &self,
        symbol_data: &mut [u8],
        symbol_id: &mut [u8],
    ) -> Option<usize> {
        for index in 0..self.storage.symbols() {
            let coefficient = F::coefficient(symbol_id, index);
            if coefficient == F::ZERO {
                continue;
            }

            if !self.uncoded.test(index) && !self.coded.test(index) {
                return Some(index);
            }

            let (vector, symbol) = self.storage.row(index);
            if F::IS_BINARY {
                F::add_assign_row(symbol_id, vector);
                F::add_assign_row(symbol_data, symbol);
            } else {
                F::mul_sub_row(symbol_id, vector, coefficient);
                F::mul_sub_row(symbol_data, symbol, coefficient);
            }
        }

        None
    }

    /// Scales the working row so the pivot coefficient becomes 1. Only called
    /// for non-binary fields; in GF(2) a non-zero coefficient already is 1.
    fn normalize(&self, symbol_data: &mut [u8], symbol_id: &mut [u8], pivot: usize) {
        debug_assert!(!self.uncoded.test(pivot) && !self.coded.test(pivot));

        let coefficient = F::coefficient(symbol_id, pivot);
        debug_assert!(coefficient != F::ZERO);

        let inverse = F::invert(coefficient);
        F::mul_row(symbol_id, inverse);
        F::mul_row(symbol_data, inverse);
    }

    /// Continues the reduction past the pivot: every occupied column above it
    /// up to the maximum pivot is eliminated from the working row. Slots
    /// beyond the maximum pivot are guaranteed empty. Afterwards the only
    /// non-zero coefficient of the working row at any occupied index is the
    /// pivot itself.
    fn forward_substitute_from_pivot(
        &self,
        symbol_data: &mut [u8],
        symbol_id: &mut [u8],
        pivot: usize,
    ) {
        debug_assert!(!self.uncoded.test(pivot) && !self.coded.test(pivot));

        for index in pivot + 1..=self.max_pivot {
            let coefficient = F::coefficient(symbol_id, index);
            if coefficient == F::ZERO {
                continue;
            }
            if !self.uncoded.test(index) && !self.coded.test(index) {
                continue;
            }

            let (vector, symbol) = self.storage.row(index);
            if F::IS_BINARY {
                F::add_assign_row(symbol_id, vector);
                F::add_assign_row(symbol_data, symbol);
            } else {
                F::mul_sub_row(symbol_id, vector, coefficient);
                F::mul_sub_row(symbol_data, symbol, coefficient);
            }
        }
    }

    /// Eliminates the new pivot column from every stored coded row. Uncoded
    /// rows are zero outside their own column and are skipped. This is what
    /// keeps the stored rows maximally reduced, so completion means decoded.
    fn backward_substitute(&mut self, symbol_data: &[u8], symbol_id: &[u8], pivot: usize) {
        for index in 0..=self.max_pivot {
            if index == pivot || !self.coded.test(index) {
                continue;
            }

            let value = F::coefficient(self.storage.vector(index), pivot);
            if value == F::ZERO {
                continue;
            }

            let (vector, symbol) = self.storage.row_mut(index);
            if F::IS_BINARY {
                F::add_assign_row(vector, symbol_id);
                F::add_assign_row(symbol, symbol_data);
            } else {
                F::mul_sub_row(vector, symbol_id, value);
                F::mul_sub_row(symbol, symbol_data, value);
            }
        }
    }

    /// Backward substitution for a freshly stored raw symbol. The new row is
    /// the elementary vector at `pivot`, so subtracting it from a coded row
    /// only clears that one coefficient and updates the payload.
    fn backward_substitute_elementary(&mut self, symbol_data: &[u8], pivot: usize) {
        for index in 0..=self.max_pivot {
            if !self.coded.test(index) {
                continue;
            }

            let value = F::coefficient(self.storage.vector(index), pivot);
            if value == F::ZERO {
                continue;
            }

            let (vector, symbol) = self.storage.row_mut(index);
            F::set_coefficient(vector, pivot, F::ZERO);
            if F::IS_BINARY {
                F::add_assign_row(symbol, symbol_data);
            } else {
                F::mul_sub_row(symbol, symbol_data, value);
            }
        }
    }

    /// Copies the reduced working row into slot `pivot`.
    fn store_coded_symbol(&mut self, symbol_data: &[u8], symbol_id: &[u8], pivot: usize) {
        debug_assert!(!self.uncoded.test(pivot) && !self.coded.test(pivot));

        let (vector, symbol) = self.storage.row_mut(pivot);
        vector.copy_from_slice(symbol_id);
        symbol.copy_from_slice(symbol_data);
    }

    /// Stores a raw symbol at slot `pivot`: the payload is copied and the
    /// coefficient row becomes the elementary vector. The row is zero-filled
    /// first so the swap path cannot leave residue behind.
    fn store_uncoded_symbol(&mut self, symbol_data: &[u8], pivot: usize) {
        debug_assert!(!self.uncoded.test(pivot) && !self.coded.test(pivot));

        let (vector, symbol) = self.storage.row_mut(pivot);
        vector.fill(0);
        F::set_coefficient(vector, pivot, F::ONE);
        symbol.copy_from_slice(symbol_data);
    }

    // ------------------------------------------------------------------
    // Swap path
    // ------------------------------------------------------------------

    /// A raw symbol arrived at a slot occupied by a coded pivot. The coded
    /// row is evicted into scratch, loses its pivot coefficient, and has the
    /// raw symbol subtracted from its payload; the remainder is a combination
    /// whose lowest non-zero column is strictly above `index`, so re-running
    /// the coded pipeline either stores it at a higher pivot or drops it as
    /// dependent. The raw symbol then takes the slot.
    ///
    /// No backward substitution is needed for the stored raw symbol: every
    /// coded row was already reduced against this column by the evicted row.
    fn swap_decode(&mut self, symbol_data: &[u8], index: usize) {
        debug_assert!(self.coded.test(index) && !self.uncoded.test(index));

        self.stats.swaps += 1;
        self.coded.clear(index);
        self.rank -= 1;

        let vector_len = self.storage.vector_len();
        let symbol_size = self.storage.symbol_size();

        let mut vector = std::mem::take(&mut self.scratch_vector);
        let mut symbol = std::mem::take(&mut self.scratch_symbol);
        {
            let (stored_vector, stored_symbol) = self.storage.row(index);
            vector[..vector_len].copy_from_slice(stored_vector);
            symbol[..symbol_size].copy_from_slice(stored_symbol);
        }

        debug_assert!(F::coefficient(&vector, index) == F::ONE);
        F::set_coefficient(&mut vector, index, F::ZERO);
        F::add_assign_row(&mut symbol[..symbol_size], symbol_data);

        self.decode_with_vector(&mut symbol[..symbol_size], &mut vector[..vector_len]);

        self.scratch_vector = vector;
        self.scratch_symbol = symbol;

        self.store_uncoded_symbol(symbol_data, index);
        self.uncoded.set(index);
        self.rank += 1;

        trace!(index, rank = self.rank, "swapped raw symbol into coded slot");
        debug_assert_eq!(self.rank, self.uncoded.count() + self.coded.count());
        if self.is_complete() {
            debug!(rank = self.rank, "block complete");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::gf2::Gf2;
    use crate::field::gf256::Gf256;

    fn gf2_vector(bits: &[usize], symbols: usize) -> Vec<u8> {
        let mut row = vec![0u8; Gf2::vector_len(symbols)];
        for &bit in bits {
            Gf2::set_coefficient(&mut row, bit, true);
        }
        row
    }

    #[test]
    fn raw_symbols_complete_a_block() {
        let mut decoder = BlockDecoder::<Gf2>::new(3, 4);
        decoder.initialize(3, 4);

        decoder.decode_raw(&[1, 2, 3, 4], 0);
        decoder.decode_raw(&[5, 6, 7, 8], 1);
        assert_eq!(decoder.rank(), 2);
        assert!(!decoder.is_complete());

        decoder.decode_raw(&[9, 10, 11, 12], 2);
        assert!(decoder.is_complete());
        assert_eq!(decoder.symbol(1), &[5, 6, 7, 8]);
    }

    #[test]
    fn duplicate_raw_is_a_noop() {
        let mut decoder = BlockDecoder::<Gf2>::new(2, 2);
        decoder.initialize(2, 2);

        decoder.decode_raw(&[1, 2], 0);
        decoder.decode_raw(&[9, 9], 0);
        assert_eq!(decoder.rank(), 1);
        assert_eq!(decoder.symbol(0), &[1, 2]);
        assert_eq!(decoder.stats().raw_duplicates, 1);
    }

    #[test]
    fn zero_vector_is_dependent() {
        let mut decoder = BlockDecoder::<Gf256>::new(2, 2);
        decoder.initialize(2, 2);

        let mut data = [7u8, 7];
        let mut vector = [0u8, 0];
        decoder.decode(&mut data, &mut vector);
        assert_eq!(decoder.rank(), 0);
        assert_eq!(decoder.stats().linearly_dependent, 1);
    }

    #[test]
    fn coded_slot_turns_uncoded_on_swap() {
        let mut decoder = BlockDecoder::<Gf2>::new(2, 2);
        decoder.initialize(2, 2);

        // A ^ B lands at pivot 0 as a coded row.
        let mut data = [0xAA ^ 0xCC, 0xBB ^ 0xDD];
        let mut vector = gf2_vector(&[0, 1], 2);
        decoder.decode(&mut data, &mut vector);
        assert!(decoder.symbol_exists(0));
        assert!(!decoder.is_symbol_decoded(0));

        // Raw A displaces it; the remainder re-absorbs at pivot 1.
        decoder.decode_raw(&[0xAA, 0xBB], 0);
        assert!(decoder.is_symbol_decoded(0));
        assert!(decoder.symbol_exists(1));
        assert_eq!(decoder.stats().swaps, 1);
        assert_eq!(decoder.rank(), 2);
        assert_eq!(decoder.symbol(0), &[0xAA, 0xBB]);
        assert_eq!(decoder.symbol(1), &[0xCC, 0xDD]);
    }

    #[test]
    fn initialize_resets_state_and_stats() {
        let mut decoder = BlockDecoder::<Gf2>::new(4, 4);
        decoder.initialize(4, 4);
        decoder.decode_raw(&[1, 1, 1, 1], 3);
        assert_eq!(decoder.rank(), 1);

        decoder.initialize(2, 3);
        assert_eq!(decoder.rank(), 0);
        assert_eq!(decoder.symbols(), 2);
        assert_eq!(decoder.symbol_size(), 3);
        assert_eq!(decoder.stats(), DecodeStats::default());
        assert!(!decoder.symbol_exists(0));
    }

    #[test]
    #[should_panic(expected = "decoder not initialized")]
    fn decode_before_initialize_panics() {
        let mut decoder = BlockDecoder::<Gf256>::new(2, 2);
        let mut data = [0u8; 2];
        let mut vector = [0u8; 2];
        decoder.decode(&mut data, &mut vector);
    }

    #[test]
    #[should_panic(expected = "symbol index out of range")]
    fn decode_raw_out_of_range_panics() {
        let mut decoder = BlockDecoder::<Gf256>::new(2, 2);
        decoder.initialize(2, 2);
        decoder.decode_raw(&[0, 0], 2);
    }

    #[test]
    #[should_panic(expected = "vector buffer length mismatch")]
    fn decode_wrong_vector_length_panics() {
        let mut decoder = BlockDecoder::<Gf256>::new(4, 2);
        decoder.initialize(4, 2);
        let mut data = [0u8; 2];
        let mut vector = [0u8; 3];
        decoder.decode(&mut data, &mut vector);
    }
}
