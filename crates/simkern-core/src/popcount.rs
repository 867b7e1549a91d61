//! Table-driven population count for single bytes.
//!
//! Every scalar binary-metric path (and every scalar tail of a vector
//! kernel) counts bits through [`popcount_b8`].

/// Number of set bits for every byte value, built at compile time.
pub const POPCOUNT_TABLE: [u8; 256] = build_table();

const fn build_table() -> [u8; 256] {
    let mut table = [0_u8; 256];
    let mut i = 1;
    while i < 256 {
        // popcount(i) = popcount(i >> 1) + lowest bit
        table[i] = table[i >> 1] + (i & 1) as u8;
        i += 1;
    }
    table
}

/// Returns the number of set bits in `x` (0..=8).
#[inline]
#[must_use]
pub fn popcount_b8(x: u8) -> u8 {
    POPCOUNT_TABLE[x as usize]
}
