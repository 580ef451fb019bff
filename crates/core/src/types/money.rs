//! Fixed-point money representation.
//!
//! Monetary amounts are held as [`rust_decimal::Decimal`], so cart arithmetic
//! is exact and never drifts the way binary floats do. The marketplace wire
//! format carries amounts as plain JSON numbers, so conversion to and from
//! `f64` happens only at the serde boundary.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A monetary amount in the marketplace's single currency.
///
/// Display rounds to two decimal places; the inner value keeps full
/// precision until then.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Money(Decimal);

impl Money {
    /// The zero amount.
    #[must_use]
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Create an amount from whole currency units (e.g. rupees).
    #[must_use]
    pub fn from_major(units: i64) -> Self {
        Self(Decimal::new(units, 0))
    }

    /// Create an amount from minor units (e.g. paise, cents).
    #[must_use]
    pub fn from_minor(minor: i64) -> Self {
        Self(Decimal::new(minor, 2))
    }

    /// The raw decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Whether the amount is greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Round to two decimal places for the wire or for display.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self(self.0.round_dp(2))
    }

    /// Multiply by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        self.times(rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // The backend models amounts as doubles; emit a plain JSON number.
        let value = self
            .0
            .to_f64()
            .ok_or_else(|| serde::ser::Error::custom("amount out of f64 range"))?;
        serializer.serialize_f64(value)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Decimal::from_f64(value)
            .map(|d| Self(d.round_dp(4)))
            .ok_or_else(|| serde::de::Error::custom("amount is not a finite number"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn minor_units_are_exact() {
        // 0.10 + 0.20 == 0.30, which binary floats famously get wrong
        let sum = Money::from_minor(10) + Money::from_minor(20);
        assert_eq!(sum, Money::from_minor(30));
    }

    #[test]
    fn display_rounds_to_two_places() {
        assert_eq!(Money::from_major(250).to_string(), "250.00");
        assert_eq!(Money::from_minor(1999).to_string(), "19.99");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn times_scales_by_quantity() {
        assert_eq!(Money::from_minor(9950).times(3), Money::from_minor(29850));
    }

    #[test]
    fn sum_over_iterator() {
        let total: Money = [Money::from_major(100), Money::from_major(50)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_major(150));
    }

    #[test]
    fn deserializes_from_json_number() {
        let money: Money = serde_json::from_str("149.5").unwrap();
        assert_eq!(money, Money::from_minor(14950));
    }

    #[test]
    fn serializes_as_json_number() {
        let json = serde_json::to_string(&Money::from_minor(3050)).unwrap();
        assert_eq!(json, "30.5");
    }
}
