//! Internal utilities.
//!
//! - [`DetRng`]: deterministic xorshift64 PRNG for coefficient generation
//!   and randomized tests
//! - [`Bitset`]: fixed-capacity occupancy bitset backing the decoder's
//!   pivot bookkeeping

mod bitset;
mod det_rng;

pub use bitset::Bitset;
pub use det_rng::DetRng;
