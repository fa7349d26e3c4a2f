//! Linblock: an on-line linear block erasure decoder over pluggable finite fields.
//!
//! # Overview
//!
//! A block code transmits `k` source symbols of `m` bytes each as a stream of
//! linear combinations over a finite field. Each packet carries a coefficient
//! vector (which combination this is) and a payload (the combined bytes). The
//! [`BlockDecoder`] absorbs packets one at a time, echelonizing the received
//! combinations in place, so the block is fully decoded exactly when the
//! decoder's rank reaches `k` and every source symbol can be read directly out
//! of storage. Systematic (uncoded) packets take a specialized path, including
//! the swap reorganization when a raw symbol arrives at a slot already
//! occupied by a coded pivot.
//!
//! # Core Guarantees
//!
//! - **Incremental**: every packet is absorbed in `O(k * (k + m))` field
//!   operations; no history is retained and no batch solve is ever needed
//! - **Reduced form**: after every absorption the stored rows are maximally
//!   reduced against each other, so completion means the symbols are decoded
//! - **Silent redundancy**: linearly dependent packets and duplicate raw
//!   symbols are dropped without any state change
//! - **Compile-time field selection**: the binary XOR fast path and the
//!   GF(2^8) table-driven path are resolved by monomorphization, not dispatch
//!
//! # Module Structure
//!
//! - [`field`]: the finite-field capability trait and the GF(2) / GF(2^8) implementations
//! - [`storage`]: deep symbol storage (coefficient and payload matrices)
//! - [`decoder`]: the incremental Gauss-Jordan decoding engine
//! - [`encoder`]: systematic and coded packet generation
//! - [`object`]: partitioning of objects too large for a single block
//! - [`config`]: codec configuration and validation
//! - [`error`]: error types
//! - [`util`]: internal utilities (deterministic RNG, occupancy bitset)
//!
//! # Example
//!
//! ```
//! use linblock::decoder::BlockDecoder;
//! use linblock::encoder::BlockEncoder;
//! use linblock::field::gf256::Gf256;
//! use linblock::util::DetRng;
//!
//! let symbols = 4;
//! let symbol_size = 16;
//!
//! let mut encoder = BlockEncoder::<Gf256>::new(symbols, symbol_size);
//! encoder.initialize(symbols, symbol_size);
//! let data: Vec<u8> = (0..symbols * symbol_size).map(|i| i as u8).collect();
//! encoder.set_symbols(&data);
//!
//! let mut decoder = BlockDecoder::<Gf256>::new(symbols, symbol_size);
//! decoder.initialize(symbols, symbol_size);
//!
//! let mut rng = DetRng::new(7);
//! let mut payload = vec![0u8; symbol_size];
//! let mut coefficients = vec![0u8; encoder.vector_len()];
//! while !decoder.is_complete() {
//!     encoder.encode(&mut rng, &mut payload, &mut coefficients);
//!     decoder.decode(&mut payload, &mut coefficients);
//! }
//!
//! let mut decoded = vec![0u8; data.len()];
//! decoder.copy_symbols(&mut decoded);
//! assert_eq!(decoded, data);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]

pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod field;
pub mod object;
pub mod storage;
pub mod tracing_compat;
pub mod util;

// Re-exports for convenient access to the core types
pub use config::CodecConfig;
pub use decoder::{BlockDecoder, DecodeStats};
pub use encoder::BlockEncoder;
pub use error::{ConfigError, ObjectError};
pub use field::gf2::Gf2;
pub use field::gf256::Gf256;
pub use field::BlockField;
pub use object::{BlockPartitioning, ObjectDecoder, ObjectEncoder};
