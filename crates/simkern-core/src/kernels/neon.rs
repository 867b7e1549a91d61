//! ARM NEON binary-metric kernels for aarch64.
//!
//! 16 bytes per iteration: `vcntq_u8` counts bits per lane and `vaddvq_u8`
//! folds the 16 lane counts (at most 128, so the `u8` sum cannot wrap).
//! The tail goes through the scalar accumulators.
//!
//! NEON is always available on aarch64, so no runtime detection is needed.

#![allow(clippy::cast_precision_loss)]

use super::numerics::jaccard_from_counts;
use super::scalar;

/// Bytes consumed per NEON iteration.
pub const NEON_CHUNK_BYTES: usize = 16;

/// NEON Hamming distance.
///
/// # Safety
///
/// `b.len() >= a.len()`; `a.len()` is the word count.
#[cfg(target_arch = "aarch64")]
#[inline]
pub unsafe fn hamming_b8_neon(a: &[u8], b: &[u8]) -> f32 {
    use std::arch::aarch64::*;

    let n = a.len();
    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    let mut differences: u64 = 0;
    let mut i = 0;
    while i + NEON_CHUNK_BYTES <= n {
        // SAFETY: i + 16 <= n and b holds at least n bytes; vld1q_u8 is unaligned-safe.
        let va = vld1q_u8(a_ptr.add(i));
        let vb = vld1q_u8(b_ptr.add(i));
        differences += u64::from(vaddvq_u8(vcntq_u8(veorq_u8(va, vb))));
        i += NEON_CHUNK_BYTES;
    }

    differences += scalar::hamming_b8_count(a.get_unchecked(i..), b.get_unchecked(i..n));
    differences as f32
}

/// NEON Jaccard distance.
///
/// # Safety
///
/// `b.len() >= a.len()`; `a.len()` is the word count.
#[cfg(target_arch = "aarch64")]
#[inline]
pub unsafe fn jaccard_b8_neon(a: &[u8], b: &[u8]) -> f32 {
    use std::arch::aarch64::*;

    let n = a.len();
    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    let mut intersection: u64 = 0;
    let mut union: u64 = 0;
    let mut i = 0;
    while i + NEON_CHUNK_BYTES <= n {
        // SAFETY: i + 16 <= n and b holds at least n bytes; vld1q_u8 is unaligned-safe.
        let va = vld1q_u8(a_ptr.add(i));
        let vb = vld1q_u8(b_ptr.add(i));
        intersection += u64::from(vaddvq_u8(vcntq_u8(vandq_u8(va, vb))));
        union += u64::from(vaddvq_u8(vcntq_u8(vorrq_u8(va, vb))));
        i += NEON_CHUNK_BYTES;
    }

    let (tail_intersection, tail_union) =
        scalar::jaccard_b8_counts(a.get_unchecked(i..), b.get_unchecked(i..n));
    jaccard_from_counts(intersection + tail_intersection, union + tail_union)
}
