//! Validated wrapper around one resolved kernel.
//!
//! Checks run once per call, before the kernel's loop starts: equal lengths,
//! matching element type, and the int8 dimension limit. The kernel itself
//! stays free of bounds checks.

use tracing::warn;

use crate::config::DispatchConfig;
use crate::dispatch::{resolve, Capabilities, Isa, Kernel};
use crate::error::{Error, Result};
use crate::kernels::MAX_I8_DIMENSION;
use crate::metric::{Datatype, Metric};

/// A metric bound to the best kernel for this CPU and configuration.
#[derive(Debug, Clone, Copy)]
pub struct DistanceEngine {
    metric: Metric,
    isa: Isa,
    kernel: Kernel,
}

impl DistanceEngine {
    /// Resolves `metric` against the detected CPU and `config`.
    pub fn new(metric: Metric, config: &DispatchConfig) -> Result<Self> {
        config.validate()?;
        let caps = Capabilities::detect();
        for isa in &config.disabled_isas {
            if !caps.supports(*isa) {
                warn!(%isa, "Disabled ISA is not available on this CPU, ignoring");
            }
        }
        let (isa, kernel) = resolve(metric, caps, config)?;
        Ok(Self {
            metric,
            isa,
            kernel,
        })
    }

    /// Resolves `metric` with automatic ISA selection.
    pub fn with_defaults(metric: Metric) -> Result<Self> {
        Self::new(metric, &DispatchConfig::default())
    }

    /// Metric this engine computes.
    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// ISA of the bound kernel.
    #[must_use]
    pub fn isa(&self) -> Isa {
        self.isa
    }

    /// Distance between two packed bit-vectors.
    pub fn distance_b8(&self, a: &[u8], b: &[u8]) -> Result<f32> {
        let Kernel::B8(kernel) = self.kernel else {
            return Err(self.datatype_mismatch(Datatype::B8));
        };
        check_lengths(a.len(), b.len())?;
        // SAFETY: equal lengths checked above; `resolve` only returns kernels
        // whose ISA the detected CPU supports.
        Ok(unsafe { kernel(a, b) })
    }

    /// Distance between two int8 vectors.
    pub fn distance_i8(&self, a: &[i8], b: &[i8]) -> Result<f32> {
        let Kernel::I8(kernel) = self.kernel else {
            return Err(self.datatype_mismatch(Datatype::I8));
        };
        check_lengths(a.len(), b.len())?;
        if a.len() > MAX_I8_DIMENSION {
            return Err(Error::DimensionTooLarge {
                metric: self.metric,
                dimension: a.len(),
                max: MAX_I8_DIMENSION,
            });
        }
        // SAFETY: as in `distance_b8`; the dimension bound keeps the i32
        // accumulators exact.
        Ok(unsafe { kernel(a, b) })
    }

    fn datatype_mismatch(&self, actual: Datatype) -> Error {
        Error::DatatypeMismatch {
            metric: self.metric,
            expected: self.kernel.datatype(),
            actual,
        }
    }
}

fn check_lengths(left: usize, right: usize) -> Result<()> {
    if left != right {
        return Err(Error::LengthMismatch { left, right });
    }
    Ok(())
}
