#![allow(clippy::float_cmp)]
//! Tests for the shared numeric policy.

use super::numerics::{cosine_from_sums, fast_rsqrt, jaccard_from_counts, MAX_I8_DIMENSION};

#[test]
fn test_fast_rsqrt_relative_error_below_budget() {
    for x in [1e-6_f32, 0.01, 0.5, 1.0, 2.0, 30.0, 900.0, 65_025.0, 1e9, 4e18] {
        let exact = 1.0 / x.sqrt();
        let approx = fast_rsqrt(x);
        let rel = ((approx - exact) / exact).abs();
        assert!(rel < 2e-3, "fast_rsqrt({x}) = {approx}, exact {exact}, rel {rel}");
    }
}

#[test]
fn test_fast_rsqrt_of_zero_is_finite() {
    let y = fast_rsqrt(0.0);
    assert!(y.is_finite());
    assert!(y > 1e18, "expected a huge finite value, got {y}");
}

#[test]
fn test_jaccard_from_counts() {
    assert_eq!(jaccard_from_counts(0, 0), 0.0);
    assert_eq!(jaccard_from_counts(0, 32), 1.0);
    assert_eq!(jaccard_from_counts(32, 32), 0.0);
    assert!((jaccard_from_counts(10, 50) - 0.8).abs() < 1e-7);
}

#[test]
fn test_cosine_from_sums_zero_norm_is_one() {
    assert_eq!(cosine_from_sums(0, 0, 0), 1.0);
    assert_eq!(cosine_from_sums(0, 0, 30), 1.0);
    assert_eq!(cosine_from_sums(0, 30, 0), 1.0);
}

#[test]
fn test_cosine_from_sums_large_norms_do_not_overflow() {
    // a2 * b2 would overflow i32; the product is formed in f32.
    let norm = i32::try_from(MAX_I8_DIMENSION).unwrap() * 127 * 127;
    let result = cosine_from_sums(norm, norm, norm);
    assert!(result.abs() < 5e-3, "identical max-norm vectors: {result}");
}

#[test]
fn test_max_i8_dimension_cannot_overflow_i32() {
    let worst_l2 = i64::try_from(MAX_I8_DIMENSION).unwrap() * 255 * 255;
    assert!(worst_l2 <= i64::from(i32::MAX));
    let worst_dot = i64::try_from(MAX_I8_DIMENSION).unwrap() * 128 * 128;
    assert!(worst_dot <= i64::from(i32::MAX));
}
