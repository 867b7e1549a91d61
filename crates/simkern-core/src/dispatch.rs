//! Runtime ISA detection and the capability-keyed kernel registry.
//!
//! This module provides:
//! - `Isa` for naming a kernel family
//! - `Capabilities::detect()` for cached runtime detection
//! - `lookup()`, the static (metric, datatype, isa) → kernel table
//! - `resolve()`, which applies a [`DispatchConfig`] and picks a kernel
//!
//! Kernels never choose themselves; everything that depends on the CPU is
//! decided here once, outside the hot loop.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DispatchConfig;
use crate::error::{Error, Result};
use crate::kernels::scalar;
use crate::metric::{Datatype, Metric};

// =============================================================================
// Instruction sets
// =============================================================================

/// Instruction-set family a kernel is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Isa {
    /// Portable scalar reference, always available.
    Serial,
    /// ARM NEON (aarch64 only).
    Neon,
    /// ARM SVE (aarch64 only).
    Sve,
    /// AVX2 (x86_64 only).
    Avx2,
    /// AVX-512 F/BW/VPOPCNTDQ plus BMI2 (x86_64 only).
    Avx512,
}

impl Isa {
    /// Selection order, best first.
    pub const PREFERENCE: [Isa; 5] = [Isa::Avx512, Isa::Avx2, Isa::Sve, Isa::Neon, Isa::Serial];

    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Isa::Serial => "serial",
            Isa::Neon => "neon",
            Isa::Sve => "sve",
            Isa::Avx2 => "avx2",
            Isa::Avx512 => "avx512",
        }
    }
}

impl fmt::Display for Isa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Isa {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serial" | "scalar" => Ok(Isa::Serial),
            "neon" => Ok(Isa::Neon),
            "sve" => Ok(Isa::Sve),
            "avx2" => Ok(Isa::Avx2),
            "avx512" | "avx-512" => Ok(Isa::Avx512),
            _ => Err(Error::UnknownIsa(s.to_string())),
        }
    }
}

// =============================================================================
// Cached capability detection
// =============================================================================

/// Instruction-set extensions usable on the current CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    neon: bool,
    sve: bool,
    avx2: bool,
    avx512: bool,
}

/// Detected once at first use.
static CAPABILITIES: OnceLock<Capabilities> = OnceLock::new();

impl Capabilities {
    /// Returns the cached capabilities of the running CPU.
    #[must_use]
    pub fn detect() -> &'static Capabilities {
        CAPABILITIES.get_or_init(|| {
            let caps = Self::probe();
            debug!(
                avx512 = caps.avx512,
                avx2 = caps.avx2,
                sve = caps.sve,
                neon = caps.neon,
                "CPU capabilities detected"
            );
            caps
        })
    }

    /// Capabilities with only the scalar kernels.
    #[must_use]
    pub fn serial_only() -> Self {
        Self::default()
    }

    fn probe() -> Self {
        #[allow(unused_mut)]
        let mut caps = Self::default();

        #[cfg(target_arch = "x86_64")]
        {
            caps.avx2 = is_x86_feature_detected!("avx2");
            caps.avx512 = is_x86_feature_detected!("avx512f")
                && is_x86_feature_detected!("avx512bw")
                && is_x86_feature_detected!("avx512vpopcntdq")
                && is_x86_feature_detected!("bmi2");
        }

        #[cfg(target_arch = "aarch64")]
        {
            caps.neon = true;
            caps.sve = std::arch::is_aarch64_feature_detected!("sve");
        }

        caps
    }

    /// Returns `true` if kernels for `isa` may run on this CPU.
    #[must_use]
    pub fn supports(&self, isa: Isa) -> bool {
        match isa {
            Isa::Serial => true,
            Isa::Neon => self.neon,
            Isa::Sve => self.sve,
            Isa::Avx2 => self.avx2,
            Isa::Avx512 => self.avx512,
        }
    }

    /// Supported ISAs in preference order (always ends with `Serial`).
    #[must_use]
    pub fn available(&self) -> Vec<Isa> {
        Isa::PREFERENCE
            .into_iter()
            .filter(|isa| self.supports(*isa))
            .collect()
    }

    /// Runtime SVE vector length in bytes, when SVE is present.
    #[must_use]
    pub fn sve_vector_bytes(&self) -> Option<usize> {
        #[cfg(target_arch = "aarch64")]
        {
            if self.sve {
                // SAFETY: SVE presence was established by `probe`.
                return Some(unsafe { crate::kernels::sve_vector_bytes() });
            }
        }
        None
    }

    /// Pretends exactly `isas` (plus `Serial`) are present.
    ///
    /// Kernels resolved from such a value must not be called unless the CPU
    /// really supports them.
    #[cfg(test)]
    pub(crate) fn assume(isas: &[Isa]) -> Self {
        Self {
            neon: isas.contains(&Isa::Neon),
            sve: isas.contains(&Isa::Sve),
            avx2: isas.contains(&Isa::Avx2),
            avx512: isas.contains(&Isa::Avx512),
        }
    }
}

// =============================================================================
// Kernel registry
// =============================================================================

/// Uniform contract of binary kernels. `b.len() >= a.len()` is required.
pub type BinaryKernel = unsafe fn(&[u8], &[u8]) -> f32;

/// Uniform contract of int8 kernels. `b.len() >= a.len()` is required.
pub type Int8Kernel = unsafe fn(&[i8], &[i8]) -> f32;

/// A registered kernel entry point, tagged by element type.
#[derive(Debug, Clone, Copy)]
pub enum Kernel {
    /// Kernel over packed bit-vectors.
    B8(BinaryKernel),
    /// Kernel over int8 vectors.
    I8(Int8Kernel),
}

impl Kernel {
    /// Element type the kernel consumes.
    #[must_use]
    pub fn datatype(&self) -> Datatype {
        match self {
            Kernel::B8(_) => Datatype::B8,
            Kernel::I8(_) => Datatype::I8,
        }
    }
}

/// Looks up the kernel registered for `(metric, datatype, isa)`.
///
/// Every metric has a `Serial` entry. Entries for ISAs of another
/// architecture do not exist on this build. The result says nothing about
/// whether the running CPU supports `isa`; see [`Capabilities::supports`].
#[must_use]
pub fn lookup(metric: Metric, datatype: Datatype, isa: Isa) -> Option<Kernel> {
    if metric.datatype() != datatype {
        return None;
    }
    match (isa, metric) {
        (Isa::Serial, Metric::Hamming) => Some(Kernel::B8(scalar::hamming_b8)),
        (Isa::Serial, Metric::Jaccard) => Some(Kernel::B8(scalar::jaccard_b8)),
        (Isa::Serial, Metric::SqEuclidean) => Some(Kernel::I8(scalar::l2sq_i8)),
        (Isa::Serial, Metric::Cosine) => Some(Kernel::I8(scalar::cos_i8)),
        (Isa::Serial, Metric::Inner) => Some(Kernel::I8(scalar::ip_i8)),

        #[cfg(target_arch = "aarch64")]
        (Isa::Neon, Metric::Hamming) => Some(Kernel::B8(crate::kernels::hamming_b8_neon)),
        #[cfg(target_arch = "aarch64")]
        (Isa::Neon, Metric::Jaccard) => Some(Kernel::B8(crate::kernels::jaccard_b8_neon)),
        #[cfg(target_arch = "aarch64")]
        (Isa::Sve, Metric::Hamming) => Some(Kernel::B8(crate::kernels::hamming_b8_sve)),
        #[cfg(target_arch = "aarch64")]
        (Isa::Sve, Metric::Jaccard) => Some(Kernel::B8(crate::kernels::jaccard_b8_sve)),

        #[cfg(target_arch = "x86_64")]
        (Isa::Avx512, Metric::Hamming) => Some(Kernel::B8(crate::kernels::hamming_b8_avx512)),
        #[cfg(target_arch = "x86_64")]
        (Isa::Avx512, Metric::Jaccard) => Some(Kernel::B8(crate::kernels::jaccard_b8_avx512)),
        #[cfg(target_arch = "x86_64")]
        (Isa::Avx2, Metric::SqEuclidean) => Some(Kernel::I8(crate::kernels::l2sq_i8_avx2)),
        #[cfg(target_arch = "x86_64")]
        (Isa::Avx2, Metric::Cosine) => Some(Kernel::I8(crate::kernels::cos_i8_avx2)),
        #[cfg(target_arch = "x86_64")]
        (Isa::Avx2, Metric::Inner) => Some(Kernel::I8(crate::kernels::ip_i8_avx2)),

        _ => None,
    }
}

/// Picks the kernel for `metric` under `caps` and `config`.
///
/// A forced ISA must be supported and must have a kernel for the metric.
/// Otherwise the first ISA in [`Isa::PREFERENCE`] that is supported, not
/// disabled, and registered wins.
pub fn resolve(
    metric: Metric,
    caps: &Capabilities,
    config: &DispatchConfig,
) -> Result<(Isa, Kernel)> {
    let datatype = metric.datatype();

    if let Some(isa) = config.force_isa {
        if !caps.supports(isa) {
            return Err(Error::UnsupportedIsa(isa));
        }
        let kernel = lookup(metric, datatype, isa).ok_or(Error::NoKernel { metric, isa })?;
        debug!(%metric, %isa, "Kernel resolved (forced)");
        return Ok((isa, kernel));
    }

    for isa in Isa::PREFERENCE {
        if config.is_disabled(isa) || !caps.supports(isa) {
            continue;
        }
        if let Some(kernel) = lookup(metric, datatype, isa) {
            debug!(%metric, %isa, "Kernel resolved");
            return Ok((isa, kernel));
        }
    }

    Err(Error::NoKernel {
        metric,
        isa: Isa::Serial,
    })
}
