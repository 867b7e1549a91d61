//! Error types for simkern-core.
//!
//! Kernels never fail; these errors come from the boundary layers
//! (registry resolution, validated wrappers, configuration).

use thiserror::Error;

use crate::dispatch::Isa;
use crate::metric::{Datatype, Metric};

/// Boundary error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Operands have different element counts.
    #[error("Vector length mismatch: {left} vs {right}")]
    LengthMismatch {
        /// Element count of the first operand.
        left: usize,
        /// Element count of the second operand.
        right: usize,
    },

    /// Operand is longer than the metric's accumulators can sum exactly.
    #[error("Dimension {dimension} exceeds the {metric} limit of {max}")]
    DimensionTooLarge {
        /// Metric being computed.
        metric: Metric,
        /// Element count supplied.
        dimension: usize,
        /// Largest supported element count.
        max: usize,
    },

    /// Operands of the wrong element type for the metric.
    #[error("Metric {metric} expects {expected} operands, got {actual}")]
    DatatypeMismatch {
        /// Metric being computed.
        metric: Metric,
        /// Element type the metric consumes.
        expected: Datatype,
        /// Element type supplied.
        actual: Datatype,
    },

    /// The requested ISA is not available on this CPU.
    #[error("ISA {0} is not supported on this CPU")]
    UnsupportedIsa(Isa),

    /// No kernel is registered for the metric on the requested ISA.
    #[error("No {metric} kernel registered for {isa}")]
    NoKernel {
        /// Metric requested.
        metric: Metric,
        /// ISA requested.
        isa: Isa,
    },

    /// Unrecognized metric name.
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// Unrecognized ISA name.
    #[error("Unknown ISA: {0}")]
    UnknownIsa(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type alias for boundary operations.
pub type Result<T> = std::result::Result<T, Error>;
