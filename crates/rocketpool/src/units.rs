//! Fixed-point boundary between on-chain base units and host fractions.
//!
//! Contracts store fees and rates as integers scaled by 10^18. The service layer exposes them
//! as `f64`. This module is the only place the two representations meet; everything on the
//! remote side stays in `U256` arithmetic.
//!
//! Fraction to base units takes the float's shortest round-trip decimal rendering and
//! truncates digits beyond the 18th decimal place toward zero.

use crate::error::{Error, Result};
use alloy::primitives::utils::{format_units, parse_units, UnitsError};
use alloy::primitives::U256;

/// Decimal places in one whole token (1 ether = 10^18 wei).
pub const BASE_UNIT_DECIMALS: u8 = 18;

/// Largest fraction whose scaled value fits in 256 bits (just under `U256::MAX / 10^18`).
const MAX_FRACTION: f64 = 1.157_920_892_373_161e59;

fn units_error(input: impl std::fmt::Display, e: UnitsError) -> Error {
    Error::InvalidAmount(format!("{input}: {e}"))
}

/// Parse a non-negative base-10 integer string into base units.
pub fn parse_base_units(remote: &str) -> Result<U256> {
    let s = remote.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidAmount(format!(
            "expected a non-negative integer, got {remote:?}"
        )));
    }
    U256::from_str_radix(s, 10)
        .map_err(|e| Error::InvalidAmount(format!("{remote:?} out of range: {e}")))
}

/// Base units divided by 10^18, as a float.
pub fn fraction_from_base_units(value: U256) -> Result<f64> {
    let decimal = format_units(value, BASE_UNIT_DECIMALS).map_err(|e| units_error(value, e))?;
    decimal
        .parse::<f64>()
        .map_err(|e| Error::InvalidAmount(format!("{decimal}: {e}")))
}

/// Fraction scaled by 10^18, truncated to whole base units.
pub fn fraction_to_base_units(fraction: f64) -> Result<U256> {
    if !fraction.is_finite() {
        return Err(Error::InvalidAmount(format!("{fraction} is not finite")));
    }
    if fraction.is_sign_negative() && fraction != 0.0 {
        return Err(Error::InvalidAmount(format!("{fraction} is negative")));
    }
    if fraction >= MAX_FRACTION {
        return Err(Error::InvalidAmount(format!(
            "{fraction} overflows 256-bit base units"
        )));
    }
    // Display for f64 never uses exponent notation and is the shortest round-trip form.
    let rendered = format!("{}", fraction.abs());
    parse_units(&rendered, BASE_UNIT_DECIMALS)
        .map(|units| units.get_absolute())
        .map_err(|e| units_error(fraction, e))
}

/// `remote` (a base-unit integer string) as a float fraction.
pub fn to_local_fraction(remote: &str) -> Result<f64> {
    parse_base_units(remote).and_then(fraction_from_base_units)
}

/// `local` as an exact base-unit integer string.
pub fn to_remote_integer(local: f64) -> Result<String> {
    fraction_to_base_units(local).map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_percent() {
        assert_eq!(to_remote_integer(0.05).unwrap(), "50000000000000000");
        assert_eq!(to_local_fraction("50000000000000000").unwrap(), 0.05);
    }

    #[test]
    fn base_units_survive_the_float_boundary() {
        for n in [
            "0",
            "1",
            "50000000000000000",
            "100000000000000000",
            "1000000000000000000",
            "2500000000000000000",
            "123456789000000000000",
        ] {
            let local = to_local_fraction(n).unwrap();
            assert_eq!(to_remote_integer(local).unwrap(), n, "round trip of {n}");
        }
    }

    #[test]
    fn truncates_beyond_eighteen_places() {
        assert_eq!(to_remote_integer(1e-19).unwrap(), "0");
        assert_eq!(
            fraction_to_base_units(1.0 / 3.0).unwrap(),
            U256::from(333_333_333_333_333_300u64)
        );
    }

    #[test]
    fn large_values_are_exact_in_the_integer_domain() {
        assert_eq!(to_remote_integer(1e21).unwrap(), format!("1{}", "0".repeat(39)));
    }

    #[test]
    fn rejects_bad_local_input() {
        for v in [-0.01, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(to_remote_integer(v), Err(Error::InvalidAmount(_))), "{v}");
        }
        assert!(matches!(fraction_to_base_units(1e300), Err(Error::InvalidAmount(_))));
        assert!(matches!(fraction_to_base_units(1e60), Err(Error::InvalidAmount(_))));
        assert_eq!(fraction_to_base_units(-0.0).unwrap(), U256::ZERO);
    }

    #[test]
    fn largest_values_stay_in_range() {
        let max = fraction_to_base_units(1e59).unwrap();
        assert_eq!(max, U256::from(10u64).pow(U256::from(77)));
        assert!(fraction_from_base_units(U256::MAX).unwrap() > 1e59);
    }

    #[test]
    fn rejects_bad_remote_input() {
        for s in ["", "-1", "1.5", "0x10", "abc", "1e18"] {
            assert!(matches!(to_local_fraction(s), Err(Error::InvalidAmount(_))), "{s:?}");
        }
        let too_big = format!("1{}", "0".repeat(80));
        assert!(matches!(to_local_fraction(&too_big), Err(Error::InvalidAmount(_))));
    }
}
