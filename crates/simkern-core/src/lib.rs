//! # simkern core
//!
//! Per-ISA kernels for binary and int8 distance metrics.
//!
//! ## Metrics
//!
//! | Metric | Operands | Kernels |
//! |--------|----------|---------|
//! | Hamming | packed bits (`u8`) | scalar, NEON, SVE, AVX-512 |
//! | Jaccard (Tanimoto) | packed bits (`u8`) | scalar, NEON, SVE, AVX-512 |
//! | Squared Euclidean | `i8` | scalar, AVX2 |
//! | Cosine | `i8` | scalar, AVX2 |
//! | Inner | `i8` | scalar, AVX2 (same value as cosine) |
//!
//! ## Layers
//!
//! - [`kernels`]: raw kernels with one uniform `unsafe fn(&[T], &[T]) -> f32`
//!   contract. No bounds checks, no ISA detection.
//! - [`dispatch`]: cached CPU detection and the (metric, datatype, isa) registry.
//! - [`engine`]: validated wrapper around one resolved kernel.
//! - [`similarity`]: slice-level traits backed by cached engines.
//!
//! ## Quick Start
//!
//! ```rust
//! use simkern_core::{DistanceEngine, Metric};
//!
//! fn main() -> simkern_core::Result<()> {
//!     let engine = DistanceEngine::with_defaults(Metric::Jaccard)?;
//!     let a = [0b1111_0000_u8, 0x0F];
//!     let b = [0b1100_0000_u8, 0x0F];
//!     let d = engine.distance_b8(&a, &b)?;
//!     assert!((d - 0.25).abs() < 1e-6);
//!     println!("jaccard on {}: {d}", engine.isa());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
// Clippy lints configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(
    test,
    allow(
        clippy::large_stack_arrays,
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::uninlined_format_args
    )
)]

pub mod config;
#[cfg(test)]
mod config_tests;
pub mod dispatch;
pub mod engine;
#[cfg(test)]
mod engine_tests;
pub mod error;
pub mod kernels;
pub mod metric;
pub mod popcount;
pub mod similarity;

pub use config::DispatchConfig;
pub use dispatch::{lookup, resolve, BinaryKernel, Capabilities, Int8Kernel, Isa, Kernel};
pub use engine::DistanceEngine;
pub use error::{Error, Result};
pub use metric::{Datatype, Metric};
pub use popcount::{popcount_b8, POPCOUNT_TABLE};
pub use similarity::{BinarySimilarity, SpatialSimilarity};
