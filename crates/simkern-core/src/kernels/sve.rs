//! ARM SVE binary-metric kernels for aarch64.
//!
//! The vector length is only known at run time, so each loop iteration builds
//! an active-lane predicate with `whilelo` for the current offset and loads
//! with zeroing (`p0/z`). The final partial chunk runs through the same
//! vector path; there is no scalar tail.
//!
//! SVE intrinsics are not available on stable Rust, so the loops are written
//! with `asm!`. Callers must confirm `sve` support at run time.

#![allow(clippy::cast_precision_loss)]

use super::numerics::jaccard_from_counts;

/// Bytes per SVE vector register on the running CPU (16..=256).
///
/// # Safety
///
/// The CPU must support SVE.
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "sve")]
#[must_use]
pub unsafe fn sve_vector_bytes() -> usize {
    let bytes: usize;
    core::arch::asm!(
        "cntb {bytes}",
        bytes = out(reg) bytes,
        options(pure, nomem, nostack, preserves_flags),
    );
    bytes
}

/// SVE Hamming distance.
///
/// # Safety
///
/// The CPU must support SVE and `b.len() >= a.len()`.
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "sve")]
pub unsafe fn hamming_b8_sve(a: &[u8], b: &[u8]) -> f32 {
    let differences: u64;
    // SAFETY: every load is governed by p0 = whilelo(i, n), so no byte at or
    // beyond n is read. z0/z1 alias v0/v1, declared clobbered below.
    core::arch::asm!(
        "mov {acc}, xzr",
        "mov {i}, xzr",
        "2:",
        "whilelo p0.b, {i}, {n}",
        "b.none 3f",
        "ld1b {{ z0.b }}, p0/z, [{a}, {i}]",
        "ld1b {{ z1.b }}, p0/z, [{b}, {i}]",
        "eor z0.d, z0.d, z1.d",
        "cnt z0.b, p0/m, z0.b",
        "uaddv d0, p0, z0.b",
        "fmov {tmp}, d0",
        "add {acc}, {acc}, {tmp}",
        "incb {i}",
        "b 2b",
        "3:",
        a = in(reg) a.as_ptr(),
        b = in(reg) b.as_ptr(),
        n = in(reg) a.len(),
        i = out(reg) _,
        tmp = out(reg) _,
        acc = out(reg) differences,
        out("v0") _,
        out("v1") _,
        out("p0") _,
        options(nostack, readonly),
    );
    differences as f32
}

/// SVE Jaccard distance.
///
/// # Safety
///
/// The CPU must support SVE and `b.len() >= a.len()`.
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "sve")]
pub unsafe fn jaccard_b8_sve(a: &[u8], b: &[u8]) -> f32 {
    let intersection: u64;
    let union: u64;
    // SAFETY: as in hamming_b8_sve; z0..z3 alias v0..v3.
    core::arch::asm!(
        "mov {inter}, xzr",
        "mov {uni}, xzr",
        "mov {i}, xzr",
        "2:",
        "whilelo p0.b, {i}, {n}",
        "b.none 3f",
        "ld1b {{ z0.b }}, p0/z, [{a}, {i}]",
        "ld1b {{ z1.b }}, p0/z, [{b}, {i}]",
        "and z2.d, z0.d, z1.d",
        "orr z3.d, z0.d, z1.d",
        "cnt z2.b, p0/m, z2.b",
        "cnt z3.b, p0/m, z3.b",
        "uaddv d2, p0, z2.b",
        "uaddv d3, p0, z3.b",
        "fmov {tmp}, d2",
        "add {inter}, {inter}, {tmp}",
        "fmov {tmp}, d3",
        "add {uni}, {uni}, {tmp}",
        "incb {i}",
        "b 2b",
        "3:",
        a = in(reg) a.as_ptr(),
        b = in(reg) b.as_ptr(),
        n = in(reg) a.len(),
        i = out(reg) _,
        tmp = out(reg) _,
        inter = out(reg) intersection,
        uni = out(reg) union,
        out("v0") _,
        out("v1") _,
        out("v2") _,
        out("v3") _,
        out("p0") _,
        options(nostack, readonly),
    );
    jaccard_from_counts(intersection, union)
}
