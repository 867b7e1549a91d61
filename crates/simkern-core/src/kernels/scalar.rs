//! Scalar reference kernels.
//!
//! These functions serve as:
//! - The correctness baseline every vector kernel is tested against
//! - The fallback when no vector kernel applies
//! - Tail handlers for vector kernels that clean up with a scalar loop
//!
//! The element count is `min(a.len(), b.len())`; callers are expected to pass
//! equal lengths.

#![allow(clippy::cast_precision_loss)]

use super::numerics::{cosine_from_sums, jaccard_from_counts};
use crate::popcount::popcount_b8;

// =============================================================================
// Binary metrics (packed bits, 8 per byte)
// =============================================================================

/// Number of differing bits between `a` and `b`.
#[inline]
#[must_use]
pub fn hamming_b8_count(a: &[u8], b: &[u8]) -> u64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| u64::from(popcount_b8(x ^ y)))
        .sum()
}

/// Bit counts of `a & b` and `a | b`.
#[inline]
#[must_use]
pub fn jaccard_b8_counts(a: &[u8], b: &[u8]) -> (u64, u64) {
    a.iter()
        .zip(b)
        .fold((0_u64, 0_u64), |(intersection, union), (&x, &y)| {
            (
                intersection + u64::from(popcount_b8(x & y)),
                union + u64::from(popcount_b8(x | y)),
            )
        })
}

/// Hamming distance as a raw (unnormalized) bit count.
#[inline]
#[must_use]
pub fn hamming_b8(a: &[u8], b: &[u8]) -> f32 {
    hamming_b8_count(a, b) as f32
}

/// Jaccard (Tanimoto) distance `1 - |a & b| / |a | b|`; `0.0` for two empty sets.
#[inline]
#[must_use]
pub fn jaccard_b8(a: &[u8], b: &[u8]) -> f32 {
    let (intersection, union) = jaccard_b8_counts(a, b);
    jaccard_from_counts(intersection, union)
}

// =============================================================================
// Int8 metrics
// =============================================================================

// Int8 sums wrap modulo 2^32 like the `i32` vector lanes, so every variant
// returns the same value in debug and release builds. Sums are exact for up
// to `MAX_I8_DIMENSION` elements.

/// Sum of squared differences, exact for up to `MAX_I8_DIMENSION` elements.
///
/// Longer operands wrap and may return a negative sum.
#[inline]
#[must_use]
pub fn l2sq_i8_sum(a: &[i8], b: &[i8]) -> i32 {
    let mut d2 = 0_i32;
    for (&x, &y) in a.iter().zip(b) {
        let d = i32::from(x) - i32::from(y);
        d2 = d2.wrapping_add(d * d);
    }
    d2
}

/// Single pass over both operands returning `(a·b, a·a, b·b)`.
///
/// Exact for up to `MAX_I8_DIMENSION` elements; longer operands wrap.
#[inline]
#[must_use]
pub fn dot_and_norms_i8(a: &[i8], b: &[i8]) -> (i32, i32, i32) {
    let mut ab = 0_i32;
    let mut a2 = 0_i32;
    let mut b2 = 0_i32;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (i32::from(x), i32::from(y));
        ab = ab.wrapping_add(x * y);
        a2 = a2.wrapping_add(x * x);
        b2 = b2.wrapping_add(y * y);
    }
    (ab, a2, b2)
}

/// Squared Euclidean distance.
///
/// Non-negative only for up to `MAX_I8_DIMENSION` elements; see
/// [`l2sq_i8_sum`]. [`crate::DistanceEngine`] rejects longer operands.
#[inline]
#[must_use]
pub fn l2sq_i8(a: &[i8], b: &[i8]) -> f32 {
    l2sq_i8_sum(a, b) as f32
}

/// Cosine distance `1 - cos(a, b)` using the fast inverse square root.
///
/// Meaningful for up to `MAX_I8_DIMENSION` elements; see [`dot_and_norms_i8`].
#[inline]
#[must_use]
pub fn cos_i8(a: &[i8], b: &[i8]) -> f32 {
    let (ab, a2, b2) = dot_and_norms_i8(a, b);
    cosine_from_sums(ab, a2, b2)
}

/// Inner-product kernel. Returns the same normalized value as [`cos_i8`].
#[inline]
#[must_use]
pub fn ip_i8(a: &[i8], b: &[i8]) -> f32 {
    cos_i8(a, b)
}
