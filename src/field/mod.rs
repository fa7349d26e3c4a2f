//! Finite-field capability layer.
//!
//! The decoder and encoder are generic over a [`BlockField`], the capability
//! set they consume: scalar arithmetic, packed coefficient-row accessors, and
//! the three bulk row kernels (XOR, scale, fused multiply-subtract). Field
//! selection is resolved at compile time by monomorphization; the binary XOR
//! fast path keys off [`BlockField::IS_BINARY`] and costs nothing when a
//! non-binary field is chosen.
//!
//! Two fields are provided:
//!
//! - [`gf2::Gf2`]: GF(2) with bit-packed coefficient rows
//! - [`gf256::Gf256`]: GF(2^8) with table-driven arithmetic
//!
//! Both have characteristic 2, so subtraction equals addition equals XOR.

use crate::util::DetRng;

pub mod gf2;
pub mod gf256;

/// The finite-field capability set consumed by the block codec.
///
/// A coefficient row packs `k` field elements into bytes; the packed
/// representation is hidden behind [`coefficient`](Self::coefficient) /
/// [`set_coefficient`](Self::set_coefficient) so that GF(2) can store one bit
/// per column while GF(2^8) stores one byte. Payload rows are always plain
/// bytes interpreted elementwise.
///
/// All provided fields have characteristic 2, so the additive kernel
/// [`add_assign_row`](Self::add_assign_row) doubles as row subtraction and
/// the fused kernel [`mul_sub_row`](Self::mul_sub_row) doubles as
/// multiply-add.
pub trait BlockField {
    /// Scalar field element.
    type Element: Copy + PartialEq + core::fmt::Debug;

    /// True for single-bit fields. Selects the whole-row XOR fast path and
    /// skips pivot normalization (every non-zero coefficient is already 1).
    const IS_BINARY: bool;

    /// The additive identity.
    const ZERO: Self::Element;

    /// The multiplicative identity.
    const ONE: Self::Element;

    /// Number of bytes needed to store a packed row of `symbols` coefficients.
    #[must_use]
    fn vector_len(symbols: usize) -> usize;

    /// Reads coefficient `index` out of a packed row.
    #[must_use]
    fn coefficient(row: &[u8], index: usize) -> Self::Element;

    /// Writes coefficient `index` of a packed row.
    fn set_coefficient(row: &mut [u8], index: usize, value: Self::Element);

    /// Multiplicative inverse.
    ///
    /// # Panics
    ///
    /// Panics if `value` is zero. The decoder only inverts the coefficient at
    /// a chosen pivot, which is non-zero by construction.
    #[must_use]
    fn invert(value: Self::Element) -> Self::Element;

    /// Draws a uniformly distributed element from a deterministic RNG.
    #[must_use]
    fn random(rng: &mut DetRng) -> Self::Element;

    /// Row addition: `dst[i] += src[i]`. Equals subtraction in
    /// characteristic 2.
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length.
    fn add_assign_row(dst: &mut [u8], src: &[u8]);

    /// Row scaling: `dst[i] *= c`.
    fn mul_row(dst: &mut [u8], c: Self::Element);

    /// Fused multiply-subtract: `dst[i] -= c * src[i]`.
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length.
    fn mul_sub_row(dst: &mut [u8], src: &[u8], c: Self::Element);
}

/// XOR `src` into `dst` elementwise: `dst[i] ^= src[i]`.
///
/// Word-wide body with a scalar tail; both field implementations route their
/// additive kernel through here.
pub(crate) fn xor_slice(dst: &mut [u8], src: &[u8]) {
    assert_eq!(dst.len(), src.len(), "slice length mismatch");

    let mut d_chunks = dst.chunks_exact_mut(8);
    let mut s_chunks = src.chunks_exact(8);
    for (d_chunk, s_chunk) in d_chunks.by_ref().zip(s_chunks.by_ref()) {
        let d_arr: [u8; 8] = d_chunk.try_into().unwrap();
        let s_arr: [u8; 8] = s_chunk.try_into().unwrap();
        let result = u64::from_ne_bytes(d_arr) ^ u64::from_ne_bytes(s_arr);
        d_chunk.copy_from_slice(&result.to_ne_bytes());
    }

    for (d, s) in d_chunks.into_remainder().iter_mut().zip(s_chunks.remainder()) {
        *d ^= s;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_slice_matches_scalar() {
        let src: Vec<u8> = (0..37).map(|i| (i * 11 + 3) as u8).collect();
        let mut dst: Vec<u8> = (0..37).map(|i| (i * 7 + 1) as u8).collect();
        let expected: Vec<u8> = dst.iter().zip(&src).map(|(d, s)| d ^ s).collect();

        xor_slice(&mut dst, &src);
        assert_eq!(dst, expected);
    }

    #[test]
    fn xor_slice_involution() {
        let src = vec![0xA5u8; 64];
        let original = vec![0x3Cu8; 64];
        let mut dst = original.clone();
        xor_slice(&mut dst, &src);
        xor_slice(&mut dst, &src);
        assert_eq!(dst, original);
    }

    #[test]
    #[should_panic(expected = "slice length mismatch")]
    fn xor_slice_length_mismatch_panics() {
        let mut dst = [0u8; 4];
        xor_slice(&mut dst, &[0u8; 5]);
    }
}
