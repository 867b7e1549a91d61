//! Fuzz target for cross-kernel agreement.
//!
//! Every kernel the CPU supports must return exactly what the scalar
//! reference returns, for every metric, on arbitrary operands.
//!
//! # Running
//!
//! ```bash
//! cd fuzz
//! cargo +nightly fuzz run fuzz_kernel_agreement
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use simkern_core::kernels::MAX_I8_DIMENSION;
use simkern_core::{lookup, Capabilities, Isa, Kernel, Metric};

/// Fuzzing input: one operand pair reinterpreted as bits and as int8.
#[derive(Arbitrary, Debug)]
struct KernelInput {
    a: Vec<u8>,
    b: Vec<u8>,
}

fuzz_target!(|input: KernelInput| {
    let n = input.a.len().min(MAX_I8_DIMENSION);
    let a: Vec<u8> = input.a.into_iter().take(n).collect();
    let mut b: Vec<u8> = input.b.into_iter().take(n).collect();
    b.resize(n, 0);

    let ia: Vec<i8> = a.iter().map(|&x| x as i8).collect();
    let ib: Vec<i8> = b.iter().map(|&x| x as i8).collect();

    let caps = Capabilities::detect();
    for metric in Metric::ALL {
        let datatype = metric.datatype();
        let Some(reference) = lookup(metric, datatype, Isa::Serial) else {
            panic!("no serial kernel for {metric}");
        };
        for isa in caps.available() {
            let Some(kernel) = lookup(metric, datatype, isa) else {
                continue;
            };
            // SAFETY: equal lengths; `isa` was reported by `Capabilities::detect`.
            let (expected, actual) = unsafe {
                match (reference, kernel) {
                    (Kernel::B8(r), Kernel::B8(k)) => (r(&a, &b), k(&a, &b)),
                    (Kernel::I8(r), Kernel::I8(k)) => (r(&ia, &ib), k(&ia, &ib)),
                    _ => unreachable!("registry returned mixed datatypes for {metric}"),
                }
            };
            assert_eq!(
                expected.to_bits(),
                actual.to_bits(),
                "{metric} on {isa}: n={n} serial={expected} got={actual}"
            );
        }
    }
});
