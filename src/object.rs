//! Partitioning of objects too large for a single block.
//!
//! A block coder handles at most `max_symbols * max_symbol_size` bytes.
//! Larger objects are chopped into blocks by a deterministic partitioning
//! scheme (in the manner of RFC 5052): the symbol size stays constant and the
//! symbols are spread as evenly as possible, so block sizes differ by at most
//! one symbol and both sides compute the identical layout from the same three
//! numbers.
//!
//! [`ObjectEncoder`] builds one initialized [`BlockEncoder`] per block from a
//! borrowed object slice; [`ObjectDecoder`] owns one [`BlockDecoder`] per
//! block and reassembles the object once every block is complete.

use crate::decoder::BlockDecoder;
use crate::encoder::BlockEncoder;
use crate::error::ObjectError;
use crate::field::BlockField;
use std::marker::PhantomData;

// ============================================================================
// Partitioning scheme
// ============================================================================

/// Deterministic partition of an object into coding blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPartitioning {
    max_symbols: usize,
    symbol_size: usize,
    object_size: usize,
    blocks: usize,
    /// Symbol count of the first `large_blocks` blocks; the rest carry one
    /// fewer.
    large_symbols: usize,
    large_blocks: usize,
}

impl BlockPartitioning {
    /// Computes the partition of `object_size` bytes into blocks of at most
    /// `max_symbols` symbols of `symbol_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectError::EmptyObject`] if `object_size` is zero.
    ///
    /// # Panics
    ///
    /// Panics if `max_symbols` or `symbol_size` is zero.
    pub fn new(
        max_symbols: usize,
        symbol_size: usize,
        object_size: usize,
    ) -> Result<Self, ObjectError> {
        assert!(max_symbols > 0, "max_symbols must be non-zero");
        assert!(symbol_size > 0, "symbol_size must be non-zero");
        if object_size == 0 {
            return Err(ObjectError::EmptyObject);
        }

        let total_symbols = object_size.div_ceil(symbol_size);
        let blocks = total_symbols.div_ceil(max_symbols);
        let small_symbols = total_symbols / blocks;
        let large_symbols = total_symbols.div_ceil(blocks);
        // Distribute the remainder over the leading blocks.
        let large_blocks = total_symbols - small_symbols * blocks;

        Ok(Self {
            max_symbols,
            symbol_size,
            object_size,
            blocks,
            large_symbols,
            large_blocks,
        })
    }

    /// Number of blocks in the partition.
    #[inline]
    #[must_use]
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    /// Total object size in bytes.
    #[inline]
    #[must_use]
    pub fn object_size(&self) -> usize {
        self.object_size
    }

    /// Symbol size in bytes; constant across blocks.
    #[inline]
    #[must_use]
    pub fn symbol_size(&self, block: usize) -> usize {
        assert!(block < self.blocks, "block index out of range");
        self.symbol_size
    }

    /// Number of symbols in `block`.
    ///
    /// # Panics
    ///
    /// Panics if `block` is out of range.
    #[must_use]
    pub fn symbols(&self, block: usize) -> usize {
        assert!(block < self.blocks, "block index out of range");
        if block < self.large_blocks {
            self.large_symbols
        } else {
            self.large_symbols - usize::from(self.large_blocks > 0)
        }
    }

    /// Byte offset of `block` within the object.
    ///
    /// # Panics
    ///
    /// Panics if `block` is out of range.
    #[must_use]
    pub fn byte_offset(&self, block: usize) -> usize {
        assert!(block < self.blocks, "block index out of range");
        let small_symbols = self.large_symbols - usize::from(self.large_blocks > 0);
        let symbol_offset = if block <= self.large_blocks {
            block * self.large_symbols
        } else {
            self.large_blocks * self.large_symbols + (block - self.large_blocks) * small_symbols
        };
        symbol_offset * self.symbol_size
    }

    /// Object bytes covered by `block`. Smaller than the block's payload
    /// capacity only for the final block of an oddly sized object.
    ///
    /// # Panics
    ///
    /// Panics if `block` is out of range.
    #[must_use]
    pub fn bytes_used(&self, block: usize) -> usize {
        let capacity = self.symbols(block) * self.symbol_size;
        std::cmp::min(capacity, self.object_size - self.byte_offset(block))
    }
}

// ============================================================================
// Object encoder
// ============================================================================

/// Builds initialized block encoders for an object.
#[derive(Debug)]
pub struct ObjectEncoder<'a, F: BlockField> {
    data: &'a [u8],
    partitioning: BlockPartitioning,
    _field: PhantomData<F>,
}

impl<'a, F: BlockField> ObjectEncoder<'a, F> {
    /// Partitions `data` into blocks of at most `max_symbols` symbols of
    /// `symbol_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectError::EmptyObject`] if `data` is empty.
    pub fn new(max_symbols: usize, symbol_size: usize, data: &'a [u8]) -> Result<Self, ObjectError> {
        let partitioning = BlockPartitioning::new(max_symbols, symbol_size, data.len())?;
        Ok(Self {
            data,
            partitioning,
            _field: PhantomData,
        })
    }

    /// Number of block encoders this object needs.
    #[inline]
    #[must_use]
    pub fn blocks(&self) -> usize {
        self.partitioning.blocks()
    }

    /// Total object size in bytes.
    #[inline]
    #[must_use]
    pub fn object_size(&self) -> usize {
        self.partitioning.object_size()
    }

    /// The partition layout.
    #[inline]
    #[must_use]
    pub fn partitioning(&self) -> &BlockPartitioning {
        &self.partitioning
    }

    /// Builds the encoder for `block`, initialized and loaded with the
    /// block's slice of the object (zero-padded in the final symbol if the
    /// object size is not a multiple of the symbol size).
    ///
    /// # Panics
    ///
    /// Panics if `block` is out of range.
    #[must_use]
    pub fn build(&self, block: usize) -> BlockEncoder<F> {
        let symbols = self.partitioning.symbols(block);
        let symbol_size = self.partitioning.symbol_size(block);
        let offset = self.partitioning.byte_offset(block);
        let bytes_used = self.partitioning.bytes_used(block);

        let mut encoder = BlockEncoder::new(symbols, symbol_size);
        encoder.initialize(symbols, symbol_size);
        encoder.set_symbols(&self.data[offset..offset + bytes_used]);
        encoder
    }
}

// ============================================================================
// Object decoder
// ============================================================================

/// One block decoder per block of an object, plus reassembly.
#[derive(Debug)]
pub struct ObjectDecoder<F: BlockField> {
    partitioning: BlockPartitioning,
    decoders: Vec<BlockDecoder<F>>,
}

impl<F: BlockField> ObjectDecoder<F> {
    /// Allocates and initializes a decoder for every block of an object of
    /// `object_size` bytes partitioned with the given parameters. Both sides
    /// must use identical parameters to agree on the layout.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectError::EmptyObject`] if `object_size` is zero.
    pub fn new(
        max_symbols: usize,
        symbol_size: usize,
        object_size: usize,
    ) -> Result<Self, ObjectError> {
        let partitioning = BlockPartitioning::new(max_symbols, symbol_size, object_size)?;
        let decoders = (0..partitioning.blocks())
            .map(|block| {
                let symbols = partitioning.symbols(block);
                let mut decoder = BlockDecoder::new(symbols, symbol_size);
                decoder.initialize(symbols, symbol_size);
                decoder
            })
            .collect();
        Ok(Self {
            partitioning,
            decoders,
        })
    }

    /// Number of blocks.
    #[inline]
    #[must_use]
    pub fn blocks(&self) -> usize {
        self.partitioning.blocks()
    }

    /// The partition layout.
    #[inline]
    #[must_use]
    pub fn partitioning(&self) -> &BlockPartitioning {
        &self.partitioning
    }

    /// The decoder for `block`.
    ///
    /// # Panics
    ///
    /// Panics if `block` is out of range.
    #[must_use]
    pub fn block_decoder(&self, block: usize) -> &BlockDecoder<F> {
        &self.decoders[block]
    }

    /// The decoder for `block`, mutable; packets for that block are fed to
    /// it directly.
    ///
    /// # Panics
    ///
    /// Panics if `block` is out of range.
    pub fn block_decoder_mut(&mut self, block: usize) -> &mut BlockDecoder<F> {
        &mut self.decoders[block]
    }

    /// True once every block is complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.decoders.iter().all(BlockDecoder::is_complete)
    }

    /// Reassembles the decoded object.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectError::IncompleteBlock`] naming the first unfinished
    /// block if decoding has not completed.
    pub fn assemble(&self) -> Result<Vec<u8>, ObjectError> {
        if let Some(block) = self.decoders.iter().position(|d| !d.is_complete()) {
            return Err(ObjectError::IncompleteBlock { block });
        }

        let mut object = vec![0u8; self.partitioning.object_size()];
        for (block, decoder) in self.decoders.iter().enumerate() {
            let offset = self.partitioning.byte_offset(block);
            let bytes_used = self.partitioning.bytes_used(block);
            decoder.copy_symbols(&mut object[offset..offset + bytes_used]);
        }
        Ok(object)
    }
}
