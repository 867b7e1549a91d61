//! Per-ISA distance kernels.
//!
//! Every metric has a portable scalar reference and one or more vector
//! implementations. All variants of a metric share one call contract
//! (`(a, b) -> f32`, element count = `a.len()`) and one numeric finalizer,
//! so they agree exactly on integer counts and bit-for-bit on results.
//!
//! # Module Structure
//!
//! - `numerics`: Fast rsqrt and the per-metric finalizers shared by all variants
//! - `scalar`: Reference kernels and the scalar accumulators used for tails
//! - `neon`: NEON Hamming/Jaccard, scalar tail (aarch64 only)
//! - `sve`: SVE Hamming/Jaccard, predicated tail (aarch64 only)
//! - `x86_avx512`: AVX-512 VPOPCNTDQ Hamming/Jaccard, masked tail (x86_64 only)
//! - `x86_avx2_i8`: AVX2 int8 squared L2, cosine, inner (x86_64 only)
//!
//! Kernels never pick an ISA. Selection lives in [`crate::dispatch`].
#![allow(clippy::doc_markdown)] // Contains ISA/architecture nomenclature in docs.

// =============================================================================
// Unsafe Invariants Reference
// =============================================================================
// SAFETY: Shared invariants for SIMD unsafe code in this module tree.
// - Condition 1: `a.len()` is the element count and `b` holds at least as many
//   elements. This is the caller's precondition; kernels do not check it.
// - Condition 2: Target-featured functions are called only after runtime
//   feature checks or on architectures where the feature is guaranteed.
// - Condition 3: Loads are unaligned-safe (`loadu`, `vld1q`, `ld1b`) and never
//   cross `a.len()`; partial chunks use masked/predicated loads or scalar tails.
// Reason: bounds checks on the hot path would change the throughput contract.

pub mod numerics;
pub mod scalar;

#[cfg(target_arch = "aarch64")]
pub mod neon;

#[cfg(target_arch = "aarch64")]
pub mod sve;

#[cfg(target_arch = "x86_64")]
pub mod x86_avx512;

#[cfg(target_arch = "x86_64")]
pub mod x86_avx2_i8;

pub use numerics::{cosine_from_sums, fast_rsqrt, jaccard_from_counts, MAX_I8_DIMENSION};
pub use scalar::{cos_i8, hamming_b8, ip_i8, jaccard_b8, l2sq_i8};

#[cfg(target_arch = "aarch64")]
pub use neon::{hamming_b8_neon, jaccard_b8_neon, NEON_CHUNK_BYTES};

#[cfg(target_arch = "aarch64")]
pub use sve::{hamming_b8_sve, jaccard_b8_sve, sve_vector_bytes};

#[cfg(target_arch = "x86_64")]
pub use x86_avx512::{hamming_b8_avx512, jaccard_b8_avx512, AVX512_CHUNK_BYTES};

#[cfg(target_arch = "x86_64")]
pub use x86_avx2_i8::{cos_i8_avx2, ip_i8_avx2, l2sq_i8_avx2, AVX2_CHUNK_ELEMENTS};

// =============================================================================
// Tests (separate files per project rules)
// =============================================================================

#[cfg(test)]
mod numerics_tests;
