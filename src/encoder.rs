//! Systematic and coded packet generation.
//!
//! The encoder is the sending-side counterpart of the decoder: it holds the
//! `k` source symbols of one block and emits either systematic packets (one
//! source symbol verbatim) or coded packets (a random linear combination of
//! all source symbols, with the drawn coefficients written alongside so the
//! receiver can reduce against them). Coefficients come from a caller-owned
//! [`DetRng`], so a seed fully determines an encoding.

use crate::config::CodecConfig;
use crate::error::ConfigError;
use crate::field::BlockField;
use crate::storage::SymbolStorage;
use crate::util::DetRng;

/// A linear block encoder over the field `F`.
///
/// Created with a maximum capacity and re-initialized per block, mirroring
/// the decoder's lifecycle.
#[derive(Debug, Clone)]
pub struct BlockEncoder<F: BlockField> {
    storage: SymbolStorage<F>,
}

impl<F: BlockField> BlockEncoder<F> {
    /// Allocates an encoder with capacity for blocks of up to `max_symbols`
    /// symbols of up to `max_symbol_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(max_symbols: usize, max_symbol_size: usize) -> Self {
        Self {
            storage: SymbolStorage::new(max_symbols, max_symbol_size),
        }
    }

    /// Allocates an encoder from a validated [`CodecConfig`].
    ///
    /// # Errors
    ///
    /// Returns the validation error if the config is rejected.
    pub fn from_config(config: &CodecConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config.max_symbols, config.max_symbol_size))
    }

    /// Re-initializes the encoder for a block of `symbols` symbols of
    /// `symbol_size` bytes, clearing all source data.
    ///
    /// # Panics
    ///
    /// Panics if a dimension is zero or exceeds the construction capacity.
    pub fn initialize(&mut self, symbols: usize, symbol_size: usize) {
        self.storage.initialize(symbols, symbol_size);
    }

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

    /// Total payload bytes of the active block.
    #[inline]
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.storage.block_size()
    }

    /// Loads source symbol `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or the length differs from the
    /// active symbol size.
    pub fn set_symbol(&mut self, index: usize, data: &[u8]) {
        self.storage.set_symbol(index, data);
    }

    /// Loads the block's source data sequentially. `data` may be shorter
    /// than the block; the tail is zero-padded.
    ///
    /// # Panics
    ///
    /// Panics if `data` is longer than the block.
    pub fn set_symbols(&mut self, data: &[u8]) {
        self.storage.set_symbols(data);
    }

    /// Emits source symbol `index` verbatim into `symbol_data`, the raw
    /// packet accepted by the decoder's `decode_raw`.
    ///
    /// # Panics
    ///
    /// Panics if the encoder is uninitialized, `index` is out of range, or
    /// the buffer length does not match the active symbol size.
    pub fn encode_systematic(&self, index: usize, symbol_data: &mut [u8]) {
        assert!(self.storage.symbols() > 0, "encoder not initialized");
        assert_eq!(
            symbol_data.len(),
            self.storage.symbol_size(),
            "symbol buffer length mismatch"
        );
        symbol_data.copy_from_slice(self.storage.symbol(index));
    }

    /// Emits one coded packet: draws a dense coefficient vector from `rng`,
    /// writes it packed into `symbol_id`, and accumulates the corresponding
    /// combination of the source symbols into `symbol_data`.
    ///
    /// All `k` coefficients are drawn uniformly, zero included; a draw that
    /// happens to be dependent on earlier packets costs the receiver nothing
    /// but the dropped packet.
    ///
    /// # Panics
    ///
    /// Panics if the encoder is uninitialized or a buffer length does not
    /// match the active block dimensions.
    pub fn encode(&self, rng: &mut DetRng, symbol_data: &mut [u8], symbol_id: &mut [u8]) {
        assert!(self.storage.symbols() > 0, "encoder not initialized");
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

        symbol_data.fill(0);
        symbol_id.fill(0);

        for index in 0..self.storage.symbols() {
            let coefficient = F::random(rng);
            F::set_coefficient(symbol_id, index, coefficient);
            // Accumulation equals subtraction in characteristic 2.
            F::mul_sub_row(symbol_data, self.storage.symbol(index), coefficient);
        }
    }
}
