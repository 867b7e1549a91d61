//! Shared numeric policy for all kernel variants.
//!
//! Vector kernels differ in how they accumulate, but every variant of a metric
//! finishes through the same function here. Integer accumulation is exact, so
//! two kernels that agree on the raw counts return bit-identical results.
//!
//! # Accumulator widths
//!
//! - Binary metrics count bits in `u64`.
//! - Int8 metrics sum in `i32`, which is exact up to [`MAX_I8_DIMENSION`]
//!   elements: `32_768 * 255^2 = 2_130_739_200 < i32::MAX`. Past that every
//!   variant wraps modulo `2^32` identically, so kernels still agree but the
//!   value is meaningless.

#![allow(clippy::cast_precision_loss)]

/// Largest element count for which no int8 kernel can overflow its `i32` sums.
pub const MAX_I8_DIMENSION: usize = 32_768;

// =============================================================================
// Newton-Raphson Fast Inverse Square Root
// =============================================================================

/// Fast approximate inverse square root using one Newton-Raphson iteration.
///
/// Relative error stays below 0.2% for positive normal inputs.
///
/// `fast_rsqrt(0.0)` is finite (about `1.98e19`): the initial guess comes from
/// the magic constant alone and the Newton step multiplies it by `1.5`.
#[inline]
#[must_use]
pub fn fast_rsqrt(x: f32) -> f32 {
    let i = x.to_bits();
    let i = 0x5f37_5a86_u32.wrapping_sub(i >> 1);
    let y = f32::from_bits(i);

    // y = y * (1.5 - 0.5 * x * y * y)
    let half_x = 0.5 * x;
    y * (1.5 - half_x * y * y)
}

/// Turns raw intersection/union bit counts into the Jaccard distance.
///
/// Two all-zero operands have `union == 0` and map to `0.0`.
#[inline]
#[must_use]
pub fn jaccard_from_counts(intersection: u64, union: u64) -> f32 {
    if union != 0 {
        1.0 - intersection as f32 / union as f32
    } else {
        0.0
    }
}

/// Turns `a·b`, `a·a` and `b·b` into the cosine distance `1 - cos(a, b)`.
///
/// The norm product is formed in `f32`; `a2 * b2` overflows `i32` long before
/// the individual sums do.
///
/// Zero-norm operands are not special-cased. `ab` is then exactly zero and
/// [`fast_rsqrt`] of zero is finite, so the result is exactly `1.0`.
#[inline]
#[must_use]
pub fn cosine_from_sums(ab: i32, a2: i32, b2: i32) -> f32 {
    1.0 - ab as f32 * fast_rsqrt(a2 as f32 * b2 as f32)
}
