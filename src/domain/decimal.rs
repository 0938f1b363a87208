//! Exact decimal type used for weights and training volume.
//!
//! Weights are entered with at most two decimal places and summed across many
//! sets, so they are kept in `rust_decimal` rather than `f64`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal as RustDecimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

/// Decimal quantity (pounds, volume) that serializes as a JSON number.
///
/// `+` and `*` saturate at the representable range instead of panicking.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Decimal(#[serde(with = "rust_decimal::serde::float")] RustDecimal);

impl Decimal {
    pub fn new(value: RustDecimal) -> Self {
        Decimal(value)
    }

    /// Parse a Decimal from a string.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s).map(Decimal)
    }

    /// Format without trailing zeros or exponent notation. This is the form
    /// stored in SQLite.
    pub fn to_canonical_string(&self) -> String {
        format!("{}", self.0.normalize())
    }

    pub fn inner(&self) -> RustDecimal {
        self.0
    }

    pub fn zero() -> Self {
        Decimal(RustDecimal::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is < 0.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Round to `dp` decimal places, halves away from zero.
    pub fn round_dp(&self, dp: u32) -> Self {
        Decimal(
            self.0
                .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Round to `dp` decimal places with halves going toward +infinity,
    /// so -0.05 becomes -0.0 and 0.05 becomes 0.1.
    pub fn round_half_up_dp(&self, dp: u32) -> Self {
        let strategy = if self.0.is_sign_negative() {
            RoundingStrategy::MidpointTowardZero
        } else {
            RoundingStrategy::MidpointAwayFromZero
        };
        Decimal(self.0.round_dp_with_strategy(dp, strategy))
    }

    /// Round to the nearest whole number, halves away from zero. Values past
    /// the `i64` range clamp to its ends.
    pub fn round_whole(&self) -> i64 {
        let rounded = self.round_dp(0).0;
        rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        })
    }

    fn saturate(result: Option<RustDecimal>, negative: bool) -> Self {
        Decimal(result.unwrap_or(if negative {
            RustDecimal::MIN
        } else {
            RustDecimal::MAX
        }))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Decimal {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<RustDecimal> for Decimal {
    fn from(value: RustDecimal) -> Self {
        Decimal(value)
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal(RustDecimal::from(value))
    }
}

impl std::ops::Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        // Overflow only happens when both operands share a sign.
        Decimal::saturate(self.0.checked_add(rhs.0), self.0.is_sign_negative())
    }
}

impl std::ops::Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 - rhs.0)
    }
}

impl std::ops::Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Decimal) -> Decimal {
        let negative = self.0.is_sign_negative() != rhs.0.is_sign_negative();
        Decimal::saturate(self.0.checked_mul(rhs.0), negative)
    }
}

impl std::ops::Div for Decimal {
    type Output = Decimal;

    fn div(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 / rhs.0)
    }
}

impl Sum for Decimal {
    fn sum<I: Iterator<Item = Decimal>>(iter: I) -> Self {
        iter.fold(Decimal::zero(), |acc, d| acc + d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_string_drops_trailing_zeros() {
        let d = Decimal::from_str_canonical("135.50").unwrap();
        assert_eq!(d.to_canonical_string(), "135.5");
        let d = Decimal::from_str_canonical("225.00").unwrap();
        assert_eq!(d.to_canonical_string(), "225");
    }

    #[test]
    fn serializes_as_json_number() {
        let d = Decimal::from_str_canonical("142.5").unwrap();
        let json = serde_json::to_value(d).unwrap();
        assert!(json.is_number());
        assert_eq!(json.to_string(), "142.5");

        let back: Decimal = serde_json::from_str("135").unwrap();
        assert_eq!(back, Decimal::from(135));
    }

    #[test]
    fn rounding_goes_half_away_from_zero() {
        let d = Decimal::from_str_canonical("12.345").unwrap();
        assert_eq!(d.round_dp(2).to_canonical_string(), "12.35");
        assert_eq!(Decimal::from_str_canonical("2.5").unwrap().round_whole(), 3);
        assert_eq!(Decimal::from_str_canonical("2.49").unwrap().round_whole(), 2);
    }

    #[test]
    fn sum_and_negative_checks() {
        let total: Decimal = ["10.5", "2.5", "7"]
            .iter()
            .map(|s| Decimal::from_str_canonical(s).unwrap())
            .sum();
        assert_eq!(total.to_canonical_string(), "20");
        assert!(Decimal::from_str_canonical("-0.01").unwrap().is_negative());
        assert!(!Decimal::zero().is_negative());
    }

    #[test]
    fn overflow_saturates_instead_of_panicking() {
        let max = Decimal::new(RustDecimal::MAX);
        assert_eq!(max * Decimal::from(5), max);
        assert_eq!(max + max, max);
        assert_eq!(
            Decimal::new(RustDecimal::MIN) * Decimal::from(2),
            Decimal::new(RustDecimal::MIN)
        );
        assert_eq!(max.round_whole(), i64::MAX);
    }

    #[test]
    fn half_up_rounding_goes_toward_positive_infinity() {
        let d = |s: &str| Decimal::from_str_canonical(s).unwrap();
        assert_eq!(d("-0.05").round_half_up_dp(1), d("0"));
        assert_eq!(d("0.05").round_half_up_dp(1), d("0.1"));
        assert_eq!(d("-2.25").round_half_up_dp(1), d("-2.2"));
        assert_eq!(d("-2.26").round_half_up_dp(1), d("-2.3"));
    }
}
