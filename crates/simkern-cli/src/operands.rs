//! Operand parsing for `simkern eval`.

use anyhow::{bail, Context, Result};

/// Parses a hex string into packed bytes. `0x`, `_` and whitespace are ignored.
pub fn parse_bits(text: &str) -> Result<Vec<u8>> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = body
        .chars()
        .filter(|c| *c != '_' && !c.is_whitespace())
        .collect();

    // Also rules out the sign `from_str_radix` would accept.
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        bail!("hex operand contains non-hex character '{bad}': '{text}'");
    }
    if digits.len() % 2 != 0 {
        bail!("hex operand has an odd number of digits: '{text}'");
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            let pair = &digits[i..i + 2];
            u8::from_str_radix(pair, 16).with_context(|| format!("invalid hex byte '{pair}'"))
        })
        .collect()
}

/// Parses comma-separated int8 values. An empty string is an empty vector.
pub fn parse_i8(text: &str) -> Result<Vec<i8>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|item| {
            let item = item.trim();
            item.parse::<i8>()
                .with_context(|| format!("invalid int8 value '{item}'"))
        })
        .collect()
}
