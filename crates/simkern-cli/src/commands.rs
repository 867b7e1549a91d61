//! Subcommand handlers.

use anyhow::{bail, Result};
use colored::Colorize;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use simkern_core::kernels::MAX_I8_DIMENSION;
use simkern_core::{
    lookup, Capabilities, Datatype, DispatchConfig, DistanceEngine, Isa, Kernel, Metric,
};

use crate::operands::{parse_bits, parse_i8};

/// Element counts used by `check` when none are given: every tail length
/// around the 16/32/64 chunk widths plus a few realistic sizes.
pub const DEFAULT_CHECK_DIMS: [usize; 14] =
    [0, 1, 15, 16, 17, 31, 32, 33, 63, 64, 65, 131, 768, 4113];

// ============================================================================
// caps
// ============================================================================

#[derive(Debug, Serialize)]
struct CapsReport {
    arch: &'static str,
    available: Vec<Isa>,
    sve_vector_bytes: Option<usize>,
    config: DispatchConfig,
    metrics: Vec<MetricReport>,
}

#[derive(Debug, Serialize)]
struct MetricReport {
    metric: Metric,
    datatype: Datatype,
    registered: Vec<Isa>,
    resolved: Option<Isa>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn build_caps_report(config: &DispatchConfig) -> CapsReport {
    let caps = Capabilities::detect();
    let metrics = Metric::ALL
        .into_iter()
        .map(|metric| {
            let registered = Isa::PREFERENCE
                .into_iter()
                .filter(|isa| lookup(metric, metric.datatype(), *isa).is_some())
                .collect();
            let (resolved, error) = match DistanceEngine::new(metric, config) {
                Ok(engine) => (Some(engine.isa()), None),
                Err(err) => (None, Some(err.to_string())),
            };
            MetricReport {
                metric,
                datatype: metric.datatype(),
                registered,
                resolved,
                error,
            }
        })
        .collect();

    CapsReport {
        arch: std::env::consts::ARCH,
        available: caps.available(),
        sve_vector_bytes: caps.sve_vector_bytes(),
        config: config.clone(),
        metrics,
    }
}

/// `simkern caps`
pub fn caps(config: &DispatchConfig, json: bool) -> Result<()> {
    let report = build_caps_report(config);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} {}", "Architecture:".bold(), report.arch);
    let available: Vec<String> = report.available.iter().map(ToString::to_string).collect();
    println!("{} {}", "Available ISAs:".bold(), available.join(", "));
    if let Some(bytes) = report.sve_vector_bytes {
        println!("{} {} bytes", "SVE vector length:".bold(), bytes);
    }
    if let Some(isa) = report.config.force_isa {
        println!("{} {}", "Forced ISA:".bold(), isa.to_string().yellow());
    }
    if !report.config.disabled_isas.is_empty() {
        let disabled: Vec<String> = report
            .config
            .disabled_isas
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("{} {}", "Disabled ISAs:".bold(), disabled.join(", "));
    }

    println!();
    println!("{}", "Kernels:".bold());
    for m in &report.metrics {
        let registered: Vec<String> = m.registered.iter().map(ToString::to_string).collect();
        let resolved = match (m.resolved, &m.error) {
            (Some(isa), _) => isa.to_string().green().to_string(),
            (None, Some(err)) => err.red().to_string(),
            (None, None) => "-".to_string(),
        };
        println!(
            "  {:<12} {:<3} {:<8} [{}]",
            m.metric.as_str(),
            m.datatype,
            resolved,
            registered.join(", ")
        );
    }
    Ok(())
}

// ============================================================================
// eval
// ============================================================================

/// `simkern eval`
pub fn eval(config: &DispatchConfig, metric: Metric, a: &str, b: &str) -> Result<()> {
    let engine = DistanceEngine::new(metric, config)?;
    let value = match metric.datatype() {
        Datatype::B8 => engine.distance_b8(&parse_bits(a)?, &parse_bits(b)?)?,
        Datatype::I8 => engine.distance_i8(&parse_i8(a)?, &parse_i8(b)?)?,
    };
    tracing::info!(%metric, isa = %engine.isa(), "Evaluated");
    println!("{value}");
    Ok(())
}

// ============================================================================
// check
// ============================================================================

/// Largest accepted relative deviation from the scalar reference.
/// Raw counts and squared distances must match exactly.
fn tolerance(metric: Metric) -> f32 {
    match metric {
        Metric::Hamming | Metric::SqEuclidean => 0.0,
        Metric::Jaccard | Metric::Cosine | Metric::Inner => 1.0e-5,
    }
}

fn agrees(metric: Metric, actual: f32, expected: f32) -> bool {
    let allowed = tolerance(metric) * expected.abs().max(1.0);
    (actual - expected).abs() <= allowed
}

struct Operands {
    bits: (Vec<u8>, Vec<u8>),
    ints: (Vec<i8>, Vec<i8>),
}

impl Operands {
    fn random(rng: &mut StdRng, n: usize) -> Self {
        // Every fourth pair is sparse so Jaccard sees empty unions.
        let sparse = rng.gen_ratio(1, 4);
        let byte = |rng: &mut StdRng| -> u8 {
            if sparse {
                if rng.gen_ratio(1, 8) {
                    1 << rng.gen_range(0..8_u32)
                } else {
                    0
                }
            } else {
                rng.gen()
            }
        };
        let xa = (0..n).map(|_| byte(rng)).collect();
        let xb = (0..n).map(|_| byte(rng)).collect();
        let ia = (0..n).map(|_| rng.gen()).collect();
        let ib = (0..n).map(|_| rng.gen()).collect();
        Self {
            bits: (xa, xb),
            ints: (ia, ib),
        }
    }

    /// Runs `kernel` on the operands matching its element type.
    fn apply(&self, kernel: Kernel) -> f32 {
        // SAFETY: both operands of a pair have the same length, and callers
        // only pass kernels whose ISA `Capabilities::detect` reported.
        unsafe {
            match kernel {
                Kernel::B8(f) => f(&self.bits.0, &self.bits.1),
                Kernel::I8(f) => f(&self.ints.0, &self.ints.1),
            }
        }
    }
}

/// `simkern check`
pub fn check(
    config: &DispatchConfig,
    metric: Option<Metric>,
    dims: &[usize],
    trials: usize,
    seed: u64,
) -> Result<()> {
    let caps = Capabilities::detect();
    let metrics: Vec<Metric> = metric.map_or_else(|| Metric::ALL.to_vec(), |m| vec![m]);
    let isas: Vec<Isa> = caps
        .available()
        .into_iter()
        .filter(|isa| *isa != Isa::Serial && !config.is_disabled(*isa))
        .collect();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut comparisons = 0_usize;
    let mut failures = 0_usize;

    for metric in metrics {
        let Some(reference) = lookup(metric, metric.datatype(), Isa::Serial) else {
            bail!("no serial kernel for {metric}");
        };
        let candidates: Vec<(Isa, Kernel)> = isas
            .iter()
            .filter_map(|isa| lookup(metric, metric.datatype(), *isa).map(|k| (*isa, k)))
            .collect();
        if candidates.is_empty() {
            tracing::info!(%metric, "Only the serial kernel is available, nothing to compare");
            continue;
        }

        for &n in dims {
            if metric.datatype() == Datatype::I8 && n > MAX_I8_DIMENSION {
                tracing::warn!(%metric, n, max = MAX_I8_DIMENSION, "Skipping dimension above int8 limit");
                continue;
            }
            for _ in 0..trials {
                let operands = Operands::random(&mut rng, n);
                let expected = operands.apply(reference);
                for (isa, kernel) in &candidates {
                    let actual = operands.apply(*kernel);
                    comparisons += 1;
                    if !agrees(metric, actual, expected) {
                        failures += 1;
                        println!(
                            "{} {metric} on {isa}, n={n}: got {actual}, serial {expected}",
                            "MISMATCH".red().bold()
                        );
                    }
                }
            }
        }
        let names: Vec<String> = candidates.iter().map(|(isa, _)| isa.to_string()).collect();
        println!("{:<12} checked against serial: {}", metric.as_str(), names.join(", "));
    }

    if failures > 0 {
        bail!("{failures} of {comparisons} comparisons disagreed with the scalar reference");
    }
    println!("{} {comparisons} comparisons agree", "OK".green().bold());
    Ok(())
}
