//! Error types.
//!
//! Errors are explicit and typed; nothing is stringly-typed and nothing is
//! silently clamped. Only the outer layers return errors: configuration
//! validation and the object API. The decode path itself never does: a
//! linearly dependent or duplicate packet is an expected, silent no-op that
//! callers observe as the absence of a rank increase, while genuine misuse
//! (wrong buffer length, out-of-range index, use before initialization) is a
//! programmer error and panics.

use core::fmt;

/// Rejections produced by [`CodecConfig::validate`](crate::config::CodecConfig::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_symbols` is zero.
    InvalidSymbolCount,
    /// `max_symbol_size` is zero.
    InvalidSymbolSize,
    /// The block buffer would exceed [`MAX_BLOCK_SIZE`](crate::config::MAX_BLOCK_SIZE).
    BlockTooLarge {
        /// The rejected `max_symbols * max_symbol_size` product.
        block_size: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSymbolCount => write!(f, "max_symbols must be non-zero"),
            Self::InvalidSymbolSize => write!(f, "max_symbol_size must be non-zero"),
            Self::BlockTooLarge { block_size } => {
                write!(f, "block buffer of {block_size} bytes exceeds the maximum")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failures of the object partitioning and reassembly layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectError {
    /// The object to partition is empty.
    EmptyObject,
    /// Reassembly was requested before every block reached full rank.
    IncompleteBlock {
        /// Index of the first block still below full rank.
        block: usize,
    },
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyObject => write!(f, "cannot partition an empty object"),
            Self::IncompleteBlock { block } => {
                write!(f, "block {block} has not reached full rank")
            }
        }
    }
}

impl std::error::Error for ObjectError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn config_error_display() {
        assert_eq!(
            ConfigError::InvalidSymbolCount.to_string(),
            "max_symbols must be non-zero"
        );
        assert_eq!(
            ConfigError::BlockTooLarge { block_size: 512 }.to_string(),
            "block buffer of 512 bytes exceeds the maximum"
        );
    }

    #[test]
    fn object_error_display() {
        assert_eq!(
            ObjectError::IncompleteBlock { block: 3 }.to_string(),
            "block 3 has not reached full rank"
        );
    }

    #[test]
    fn errors_have_no_source() {
        assert!(ConfigError::InvalidSymbolSize.source().is_none());
        assert!(ObjectError::EmptyObject.source().is_none());
    }
}
