//! AVX-512 binary-metric kernels for x86_64.
//!
//! 64 bytes per iteration with native 64-bit lane popcount (`vpopcntq`).
//! The remainder is one masked, zero-filling load (`_bzhi_u64` mask +
//! `maskz` load) processed by the same vector path, so there is no scalar
//! tail loop.
//!
//! All functions require runtime detection of `avx512f`, `avx512bw`,
//! `avx512vpopcntdq` and `bmi2` before calling.

// SAFETY: Numeric casts in this file are intentional and safe:
// - Remainder lengths are < 64 and fit in u32
// - Lane sums are non-negative bit counts
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::incompatible_msrv)]

use super::numerics::jaccard_from_counts;

/// Bytes consumed per AVX-512 iteration.
pub const AVX512_CHUNK_BYTES: usize = 64;

/// AVX-512 Hamming distance.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX-512F/BW/VPOPCNTDQ and BMI2
/// - `b.len() >= a.len()`
#[cfg(target_arch = "x86_64")]
#[target_feature(
    enable = "avx512f",
    enable = "avx512bw",
    enable = "avx512vpopcntdq",
    enable = "bmi2"
)]
pub unsafe fn hamming_b8_avx512(a: &[u8], b: &[u8]) -> f32 {
    // SAFETY: full loads only run while 64 bytes remain; the final load is
    // masked to the remaining bytes and never touches memory past them.
    use std::arch::x86_64::*;

    let mut n = a.len();
    let mut a_ptr = a.as_ptr();
    let mut b_ptr = b.as_ptr();

    let mut differences = _mm512_setzero_si512();

    while n >= AVX512_CHUNK_BYTES {
        let va = _mm512_loadu_si512(a_ptr.cast());
        let vb = _mm512_loadu_si512(b_ptr.cast());
        differences = _mm512_add_epi64(differences, _mm512_popcnt_epi64(_mm512_xor_si512(va, vb)));
        a_ptr = a_ptr.add(AVX512_CHUNK_BYTES);
        b_ptr = b_ptr.add(AVX512_CHUNK_BYTES);
        n -= AVX512_CHUNK_BYTES;
    }

    if n > 0 {
        let mask: __mmask64 = _bzhi_u64(u64::MAX, n as u32);
        let va = _mm512_maskz_loadu_epi8(mask, a_ptr.cast());
        let vb = _mm512_maskz_loadu_epi8(mask, b_ptr.cast());
        differences = _mm512_add_epi64(differences, _mm512_popcnt_epi64(_mm512_xor_si512(va, vb)));
    }

    _mm512_reduce_add_epi64(differences) as f32
}

/// AVX-512 Jaccard distance.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX-512F/BW/VPOPCNTDQ and BMI2
/// - `b.len() >= a.len()`
#[cfg(target_arch = "x86_64")]
#[target_feature(
    enable = "avx512f",
    enable = "avx512bw",
    enable = "avx512vpopcntdq",
    enable = "bmi2"
)]
pub unsafe fn jaccard_b8_avx512(a: &[u8], b: &[u8]) -> f32 {
    use std::arch::x86_64::*;

    let mut n = a.len();
    let mut a_ptr = a.as_ptr();
    let mut b_ptr = b.as_ptr();

    let mut intersection = _mm512_setzero_si512();
    let mut union = _mm512_setzero_si512();

    while n >= AVX512_CHUNK_BYTES {
        let va = _mm512_loadu_si512(a_ptr.cast());
        let vb = _mm512_loadu_si512(b_ptr.cast());
        intersection = _mm512_add_epi64(intersection, _mm512_popcnt_epi64(_mm512_and_si512(va, vb)));
        union = _mm512_add_epi64(union, _mm512_popcnt_epi64(_mm512_or_si512(va, vb)));
        a_ptr = a_ptr.add(AVX512_CHUNK_BYTES);
        b_ptr = b_ptr.add(AVX512_CHUNK_BYTES);
        n -= AVX512_CHUNK_BYTES;
    }

    if n > 0 {
        let mask: __mmask64 = _bzhi_u64(u64::MAX, n as u32);
        let va = _mm512_maskz_loadu_epi8(mask, a_ptr.cast());
        let vb = _mm512_maskz_loadu_epi8(mask, b_ptr.cast());
        intersection = _mm512_add_epi64(intersection, _mm512_popcnt_epi64(_mm512_and_si512(va, vb)));
        union = _mm512_add_epi64(union, _mm512_popcnt_epi64(_mm512_or_si512(va, vb)));
    }

    jaccard_from_counts(
        _mm512_reduce_add_epi64(intersection) as u64,
        _mm512_reduce_add_epi64(union) as u64,
    )
}
