// ── Size helpers ──
//
// Conversions between the appliance's integer byte counts and the
// shorthand used in input files (`10g`, `128k`, `2GB`). Conversions
// into bytes are exact integer arithmetic; only the human-readable
// rendering goes through floating point.

use serde_json::Value;
use thiserror::Error;

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeError {
    #[error("empty size")]
    Empty,

    #[error("'{0}' is not a number")]
    InvalidNumber(String),

    #[error("unknown unit '{0}' (expected B, K, M, G or T)")]
    UnknownUnit(String),

    #[error("'{0}' does not fit in 64 bits")]
    Overflow(String),

    #[error("block size {0} is not a power of two")]
    NotPowerOfTwo(u64),
}

/// Render a byte count with base-1024 units, e.g. `140737488355` as
/// `131.07 GB`. Two decimals at most; trailing zeros and the dot are
/// dropped.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut idx = 0;
    while value >= 1024.0 && idx < UNITS.len() - 1 {
        value /= 1024.0;
        idx += 1;
    }
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[idx])
}

/// Human rendering of a JSON field: numbers go through [`format_size`],
/// anything else is shown as `-`.
pub fn format_size_value(value: Option<&Value>) -> String {
    match value.and_then(Value::as_u64) {
        Some(bytes) => format_size(bytes),
        None => match value.and_then(Value::as_f64) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
            Some(f) if f >= 0.0 => format_size(f as u64),
            _ => "-".to_owned(),
        },
    }
}

/// `n * 1024^k`, where `k` comes from the first letter of `unit`
/// (case-insensitive): B=0, K=1, M=2, G=3, T=4.
pub fn to_bytes(n: u64, unit: &str) -> Result<u64, SizeError> {
    let exponent = match unit.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
        None | Some('B') => 0,
        Some('K') => 1,
        Some('M') => 2,
        Some('G') => 3,
        Some('T') => 4,
        Some(_) => return Err(SizeError::UnknownUnit(unit.to_owned())),
    };
    1024_u64
        .checked_pow(exponent)
        .and_then(|factor| n.checked_mul(factor))
        .ok_or_else(|| SizeError::Overflow(format!("{n}{unit}")))
}

/// Parse raw bytes (`10737418240`) or shorthand (`10g`, `10GB`, `10 g`).
pub fn parse_size(input: &str) -> Result<u64, SizeError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SizeError::Empty);
    }
    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (digits, unit) = input.split_at(split);
    let n: u64 = digits
        .parse()
        .map_err(|_| SizeError::InvalidNumber(input.to_owned()))?;
    to_bytes(n, unit)
}

/// Parse a block size: `"512"`, `"8K"`, `"128k"`, `"1M"`.
pub fn to_blocksize(input: &str) -> Result<u64, SizeError> {
    let bytes = parse_size(input)?;
    if bytes.is_power_of_two() {
        Ok(bytes)
    } else {
        Err(SizeError::NotPowerOfTwo(bytes))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn format_size_vectors() {
        assert_eq!(format_size(10_240), "10 KB");
        assert_eq!(format_size(9_437_184), "9 MB");
        assert_eq!(format_size(103_809_024), "99 MB");
        assert_eq!(format_size(137_438_953_472), "128 GB");
        assert_eq!(format_size(140_737_488_355), "131.07 GB");
    }

    #[test]
    fn format_size_small_and_huge() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(u64::MAX), "16384 PB");
    }

    #[test]
    fn format_size_value_handles_missing() {
        assert_eq!(format_size_value(Some(&json!(10_240))), "10 KB");
        assert_eq!(format_size_value(Some(&json!("n/a"))), "-");
        assert_eq!(format_size_value(None), "-");
    }

    #[test]
    fn to_bytes_vectors() {
        assert_eq!(to_bytes(3, "kb").unwrap(), 3072);
        assert_eq!(to_bytes(3, "Mb").unwrap(), 3_145_728);
        assert_eq!(to_bytes(3, "gb").unwrap(), 3_221_225_472);
        assert_eq!(to_bytes(3, "tB").unwrap(), 3_298_534_883_328);
        assert_eq!(to_bytes(3, "B").unwrap(), 3);
    }

    #[test]
    fn to_bytes_rejects_unknown_unit_and_overflow() {
        assert_eq!(to_bytes(1, "x"), Err(SizeError::UnknownUnit("x".into())));
        assert!(matches!(to_bytes(u64::MAX, "k"), Err(SizeError::Overflow(_))));
    }

    #[test]
    fn parse_size_shorthand() {
        assert_eq!(parse_size("10737418240").unwrap(), 10_737_418_240);
        assert_eq!(parse_size("10g").unwrap(), 10_737_418_240);
        assert_eq!(parse_size("10GB").unwrap(), 10_737_418_240);
        assert_eq!(parse_size(" 2 g ").unwrap(), 2_147_483_648);
        assert_eq!(parse_size(""), Err(SizeError::Empty));
        assert!(matches!(parse_size("g10"), Err(SizeError::InvalidNumber(_))));
    }

    #[test]
    fn blocksize_vectors() {
        assert_eq!(to_blocksize("512").unwrap(), 512);
        assert_eq!(to_blocksize("8K").unwrap(), 8192);
        assert_eq!(to_blocksize("128k").unwrap(), 131_072);
        assert_eq!(to_blocksize("1M").unwrap(), 1_048_576);
        assert_eq!(to_blocksize("1000"), Err(SizeError::NotPowerOfTwo(1000)));
    }
}
