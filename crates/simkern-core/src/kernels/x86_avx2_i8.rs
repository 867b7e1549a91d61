//! AVX2 int8 similarity kernels for x86_64: squared L2, cosine, inner.
//!
//! 32 elements per iteration. Each 16-byte half is sign-extended to `i16`
//! and fed to `vpmaddwd`, which multiplies signed 16-bit lanes and adds
//! adjacent products into `i32` lanes. Accumulators stay `i32`.
//!
//! AVX2 has no masked byte loads, so the tail is a scalar loop added after
//! the horizontal reduction.
//!
//! All functions require runtime AVX2 detection before calling.

// SAFETY: Numeric casts in this file are intentional and safe:
// - i32 sums are exact up to MAX_I8_DIMENSION elements (see numerics.rs)
//   and wrap beyond it, matching the scalar accumulators
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::incompatible_msrv)]

use super::numerics::cosine_from_sums;
use super::scalar;

/// Elements consumed per AVX2 iteration.
pub const AVX2_CHUNK_ELEMENTS: usize = 32;

/// Folds eight `i32` lanes into one.
///
/// Splits the register into 128-bit halves, adds them, then two `hadd`
/// steps leave the total in lane 0.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn hsum_epi32_avx2(v: std::arch::x86_64::__m256i) -> i32 {
    use std::arch::x86_64::*;
    let low = _mm256_castsi256_si128(v);
    let high = _mm256_extracti128_si256(v, 1);
    let partial = _mm_add_epi32(low, high);
    let folded = _mm_hadd_epi32(_mm_hadd_epi32(partial, partial), partial);
    _mm_extract_epi32(folded, 0)
}

/// AVX2 squared Euclidean distance.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2
/// - `b.len() >= a.len()`
///
/// Results are exact only for `a.len() <= MAX_I8_DIMENSION`. Longer operands
/// wrap the `i32` sums exactly as the scalar kernels do.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
pub unsafe fn l2sq_i8_avx2(a: &[i8], b: &[i8]) -> f32 {
    // SAFETY: full 32-byte loads only while i + 32 <= d; loadu is unaligned-safe.
    use std::arch::x86_64::*;

    let d = a.len();
    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    let mut d2_vec = _mm256_setzero_si256();
    let mut i = 0;

    while i + AVX2_CHUNK_ELEMENTS <= d {
        let va = _mm256_loadu_si256(a_ptr.add(i).cast());
        let vb = _mm256_loadu_si256(b_ptr.add(i).cast());

        let a_lo = _mm256_cvtepi8_epi16(_mm256_castsi256_si128(va));
        let a_hi = _mm256_cvtepi8_epi16(_mm256_extracti128_si256(va, 1));
        let b_lo = _mm256_cvtepi8_epi16(_mm256_castsi256_si128(vb));
        let b_hi = _mm256_cvtepi8_epi16(_mm256_extracti128_si256(vb, 1));

        // |a - b| <= 255 fits i16; each madd lane is at most 2 * 255^2.
        let d_lo = _mm256_sub_epi16(a_lo, b_lo);
        let d_hi = _mm256_sub_epi16(a_hi, b_hi);
        d2_vec = _mm256_add_epi32(d2_vec, _mm256_madd_epi16(d_lo, d_lo));
        d2_vec = _mm256_add_epi32(d2_vec, _mm256_madd_epi16(d_hi, d_hi));

        i += AVX2_CHUNK_ELEMENTS;
    }

    let d2 = hsum_epi32_avx2(d2_vec)
        .wrapping_add(scalar::l2sq_i8_sum(a.get_unchecked(i..), b.get_unchecked(i..d)));

    d2 as f32
}

/// AVX2 cosine distance `1 - cos(a, b)`.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2
/// - `b.len() >= a.len()`
///
/// Results are exact only for `a.len() <= MAX_I8_DIMENSION`. Longer operands
/// wrap the `i32` sums exactly as the scalar kernels do.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
pub unsafe fn cos_i8_avx2(a: &[i8], b: &[i8]) -> f32 {
    use std::arch::x86_64::*;

    let d = a.len();
    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    let mut ab_vec = _mm256_setzero_si256();
    let mut a2_vec = _mm256_setzero_si256();
    let mut b2_vec = _mm256_setzero_si256();
    let mut i = 0;

    while i + AVX2_CHUNK_ELEMENTS <= d {
        let va = _mm256_loadu_si256(a_ptr.add(i).cast());
        let vb = _mm256_loadu_si256(b_ptr.add(i).cast());

        let a_lo = _mm256_cvtepi8_epi16(_mm256_castsi256_si128(va));
        let a_hi = _mm256_cvtepi8_epi16(_mm256_extracti128_si256(va, 1));
        let b_lo = _mm256_cvtepi8_epi16(_mm256_castsi256_si128(vb));
        let b_hi = _mm256_cvtepi8_epi16(_mm256_extracti128_si256(vb, 1));

        ab_vec = _mm256_add_epi32(ab_vec, _mm256_madd_epi16(a_lo, b_lo));
        ab_vec = _mm256_add_epi32(ab_vec, _mm256_madd_epi16(a_hi, b_hi));
        a2_vec = _mm256_add_epi32(a2_vec, _mm256_madd_epi16(a_lo, a_lo));
        a2_vec = _mm256_add_epi32(a2_vec, _mm256_madd_epi16(a_hi, a_hi));
        b2_vec = _mm256_add_epi32(b2_vec, _mm256_madd_epi16(b_lo, b_lo));
        b2_vec = _mm256_add_epi32(b2_vec, _mm256_madd_epi16(b_hi, b_hi));

        i += AVX2_CHUNK_ELEMENTS;
    }

    let (tail_ab, tail_a2, tail_b2) =
        scalar::dot_and_norms_i8(a.get_unchecked(i..), b.get_unchecked(i..d));

    let ab = hsum_epi32_avx2(ab_vec).wrapping_add(tail_ab);
    let a2 = hsum_epi32_avx2(a2_vec).wrapping_add(tail_a2);
    let b2 = hsum_epi32_avx2(b2_vec).wrapping_add(tail_b2);

    cosine_from_sums(ab, a2, b2)
}

/// AVX2 inner-product kernel; same normalized value as [`cos_i8_avx2`].
///
/// # Safety
///
/// Same contract as [`cos_i8_avx2`], including the `MAX_I8_DIMENSION` bound.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
pub unsafe fn ip_i8_avx2(a: &[i8], b: &[i8]) -> f32 {
    cos_i8_avx2(a, b)
}
