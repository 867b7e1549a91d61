//! Slice-level convenience traits.
//!
//! ```
//! use simkern_core::{BinarySimilarity, SpatialSimilarity};
//!
//! let bits_a = [0b1111_0000_u8, 0xFF];
//! let bits_b = [0b0000_0000_u8, 0xFF];
//! assert_eq!(u8::hamming(&bits_a, &bits_b).unwrap(), 4.0);
//!
//! let a = [1_i8, 2, 3];
//! let b = [1_i8, 2, 4];
//! assert_eq!(i8::sqeuclidean(&a, &b).unwrap(), 1.0);
//! ```

use std::sync::OnceLock;

use crate::engine::DistanceEngine;
use crate::error::Result;
use crate::metric::Metric;

static ENGINES: [OnceLock<Result<DistanceEngine>>; Metric::ALL.len()] =
    [const { OnceLock::new() }; Metric::ALL.len()];

/// Returns the process-wide engine for `metric` (auto-detected ISA, default config).
fn engine(metric: Metric) -> Result<&'static DistanceEngine> {
    ENGINES[metric as usize]
        .get_or_init(|| DistanceEngine::with_defaults(metric))
        .as_ref()
        .map_err(Clone::clone)
}

/// Distances over bit-vectors packed 8 bits per byte.
pub trait BinarySimilarity: Sized {
    /// Number of differing bits.
    fn hamming(a: &[Self], b: &[Self]) -> Result<f32>;

    /// Tanimoto distance; `0.0` when neither operand has a set bit.
    fn jaccard(a: &[Self], b: &[Self]) -> Result<f32>;
}

impl BinarySimilarity for u8 {
    fn hamming(a: &[u8], b: &[u8]) -> Result<f32> {
        engine(Metric::Hamming)?.distance_b8(a, b)
    }

    fn jaccard(a: &[u8], b: &[u8]) -> Result<f32> {
        engine(Metric::Jaccard)?.distance_b8(a, b)
    }
}

/// Distances over dense int8 vectors of at most
/// [`MAX_I8_DIMENSION`](crate::kernels::MAX_I8_DIMENSION) elements.
pub trait SpatialSimilarity: Sized {
    /// Squared Euclidean distance.
    fn sqeuclidean(a: &[Self], b: &[Self]) -> Result<f32>;

    /// Cosine distance `1 - cos(a, b)`, using an approximate rsqrt.
    fn cosine(a: &[Self], b: &[Self]) -> Result<f32>;

    /// Same value as [`SpatialSimilarity::cosine`].
    fn inner(a: &[Self], b: &[Self]) -> Result<f32>;
}

impl SpatialSimilarity for i8 {
    fn sqeuclidean(a: &[i8], b: &[i8]) -> Result<f32> {
        engine(Metric::SqEuclidean)?.distance_i8(a, b)
    }

    fn cosine(a: &[i8], b: &[i8]) -> Result<f32> {
        engine(Metric::Cosine)?.distance_i8(a, b)
    }

    fn inner(a: &[i8], b: &[i8]) -> Result<f32> {
        engine(Metric::Inner)?.distance_i8(a, b)
    }
}
