//! 18-decimal token amounts.
//!
//! All conversions are integer arithmetic on `U256`; nothing passes through
//! a float.

use alloy_primitives::utils::{self, UnitsError};
use alloy_primitives::U256;

const DECIMALS: usize = 18;

/// Lossless decimal string: `1.5`, `1.0`, `0.000000000000000001`.
pub fn format_ether(amount: U256) -> String {
    let full = utils::format_ether(amount);
    match full.split_once('.') {
        Some((int, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                format!("{int}.0")
            } else {
                format!("{int}.{frac}")
            }
        }
        None => format!("{full}.0"),
    }
}

/// Inverse of `format_ether`.
pub fn parse_ether(value: &str) -> Result<U256, UnitsError> {
    utils::parse_ether(value.trim())
}

/// Grouped display with between `min_fraction` and `max(3, min_fraction)`
/// fraction digits, rounded half up: `12,345.5`, `0.0001`.
pub fn display_amount(amount: U256, min_fraction: usize) -> String {
    let max_fraction = min_fraction.max(3).min(DECIMALS);
    let min_fraction = min_fraction.min(max_fraction);

    let scale = U256::from(10u64).pow(U256::from(DECIMALS - max_fraction));
    let rounded = amount.saturating_add(scale / U256::from(2u64)) / scale;
    let unit = U256::from(10u64).pow(U256::from(max_fraction));
    let int = rounded / unit;
    let frac = rounded % unit;

    let mut frac_digits = format!("{frac:0>width$}", frac = frac.to_string(), width = max_fraction);
    while frac_digits.len() > min_fraction && frac_digits.ends_with('0') {
        frac_digits.pop();
    }

    let grouped = group_thousands(&int.to_string());
    if frac_digits.is_empty() {
        grouped
    } else {
        format!("{grouped}.{frac_digits}")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Whole days in a duration given in seconds.
pub fn whole_days(seconds: u64) -> u64 {
    seconds / 86_400
}
