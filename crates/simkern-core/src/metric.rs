//! Metric and element-type identifiers used as registry keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Distance metric computed by a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Count of differing bits (raw, not normalized).
    Hamming,
    /// Tanimoto distance `1 - |a & b| / |a | b|`.
    Jaccard,
    /// Squared Euclidean distance.
    SqEuclidean,
    /// Cosine distance `1 - cos(a, b)`.
    Cosine,
    /// Inner-product kernel; returns the same normalized value as `Cosine`.
    Inner,
}

impl Metric {
    /// All metrics, binary first.
    pub const ALL: [Metric; 5] = [
        Metric::Hamming,
        Metric::Jaccard,
        Metric::SqEuclidean,
        Metric::Cosine,
        Metric::Inner,
    ];

    /// Element type the metric's kernels consume.
    #[must_use]
    pub fn datatype(self) -> Datatype {
        match self {
            Metric::Hamming | Metric::Jaccard => Datatype::B8,
            Metric::SqEuclidean | Metric::Cosine | Metric::Inner => Datatype::I8,
        }
    }

    /// Canonical lowercase name (matches the serde representation).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Hamming => "hamming",
            Metric::Jaccard => "jaccard",
            Metric::SqEuclidean => "sqeuclidean",
            Metric::Cosine => "cosine",
            Metric::Inner => "inner",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hamming" => Ok(Metric::Hamming),
            "jaccard" | "tanimoto" => Ok(Metric::Jaccard),
            "sqeuclidean" | "l2sq" | "l2" => Ok(Metric::SqEuclidean),
            "cosine" | "cos" => Ok(Metric::Cosine),
            "inner" | "ip" | "dot" => Ok(Metric::Inner),
            _ => Err(Error::UnknownMetric(s.to_string())),
        }
    }
}

/// Operand element interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Datatype {
    /// Bit-vectors packed 8 bits per byte.
    B8,
    /// Signed 8-bit integers, one per dimension.
    I8,
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Datatype::B8 => "b8",
            Datatype::I8 => "i8",
        })
    }
}
