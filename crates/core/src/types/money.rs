//! Money amounts in Bangladeshi Taka using decimal arithmetic.
//!
//! All revenue figures in Bazarify are single-currency (BDT), so unlike a
//! multi-currency price type there is no currency code to carry around -
//! just a decimal amount with Bangla-friendly display formatting.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A money amount in Bangladeshi Taka (BDT).
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Taka(Decimal);

impl Taka {
    /// Zero taka.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create from a whole-taka amount.
    #[must_use]
    pub fn from_major(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether this amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Clamp negative amounts to zero.
    ///
    /// Aggregates derived from stored records must never go negative, even
    /// when individual records carry bad data.
    #[must_use]
    pub fn clamp_non_negative(self) -> Self {
        if self.0.is_sign_negative() {
            Self::ZERO
        } else {
            self
        }
    }

    /// Divide by a count, returning zero when the count is zero.
    #[must_use]
    pub fn divided_by(self, count: u64) -> Self {
        if count == 0 {
            Self::ZERO
        } else {
            Self(self.0 / Decimal::from(count))
        }
    }

    /// Format with two decimals and comma-grouped thousands, e.g. `12,345.67`.
    #[must_use]
    pub fn grouped(&self) -> String {
        let fixed = format!("{:.2}", self.0.round_dp(2));
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let (sign, digits) = int_part
            .strip_prefix('-')
            .map_or(("", int_part), |rest| ("-", rest));

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        format!("{sign}{grouped}.{frac_part}")
    }

    /// Format rounded to whole taka with no grouping, e.g. `3000`.
    #[must_use]
    pub fn rounded_whole(&self) -> String {
        self.0.round_dp(0).normalize().to_string()
    }
}

impl std::fmt::Display for Taka {
    /// Display with the taka sign, e.g. `৳12,345.67`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "৳{}", self.grouped())
    }
}

impl Add for Taka {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Taka {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Mul<Decimal> for Taka {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self {
        Self(self.0 * rhs)
    }
}

impl Sum for Taka {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Taka {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouped_small() {
        assert_eq!(Taka::from_major(5).grouped(), "5.00");
    }

    #[test]
    fn test_grouped_thousands() {
        assert_eq!(Taka::from_major(82_000).grouped(), "82,000.00");
        assert_eq!(Taka::from_major(1_234_567).grouped(), "1,234,567.00");
    }

    #[test]
    fn test_display_has_taka_sign() {
        assert_eq!(Taka::from_major(12_000).to_string(), "৳12,000.00");
    }

    #[test]
    fn test_clamp_non_negative() {
        let negative = Taka::new(Decimal::from(-50));
        assert_eq!(negative.clamp_non_negative(), Taka::ZERO);
        assert_eq!(Taka::from_major(50).clamp_non_negative(), Taka::from_major(50));
    }

    #[test]
    fn test_divided_by_zero_count() {
        assert_eq!(Taka::from_major(100).divided_by(0), Taka::ZERO);
    }

    #[test]
    fn test_divided_by() {
        assert_eq!(Taka::from_major(100).divided_by(4), Taka::from_major(25));
    }

    #[test]
    fn test_sum() {
        let total: Taka = [10, 20, 30].into_iter().map(Taka::from_major).sum();
        assert_eq!(total, Taka::from_major(60));
    }

    #[test]
    fn test_rounded_whole() {
        assert_eq!(Taka::new(Decimal::new(299950, 2)).rounded_whole(), "3000");
    }
}
