//! # Money Module
//!
//! Provides the `Money` type for handling prices and totals safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing float prices line by line:                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ cart view and menu view drift    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paise)                              │
//! │    10 paise + 20 paise = 30 paise  ✅ every surface agrees              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## JSON Representation
//! The persisted cart and the order API both carry prices as plain JSON
//! numbers in major units (`100`, `12.5`). `Money` converts at the boundary:
//! whole amounts are written as integers, fractional ones as decimals, and
//! reads round to the nearest minor unit.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

/// Minor units per major unit (100 paise per rupee).
const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64**: wide enough for any cart total; signed so differences are safe
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Custom serde**: major-unit JSON numbers on the wire, so exported
///   TypeScript bindings annotate `Money` fields as `number`
///
/// ## Where Money is Used
/// ```text
/// MenuItem.price ──► LineItem.price ──► line_total ──► vendor_total ──► grand_total
///                                                                          │
///                                              order payload "price" ◄─────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use munch_core::Money;
    ///
    /// let price = Money::from_minor(1099); // ₹10.99
    /// assert_eq!(price.minor(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole major units.
    ///
    /// ```rust
    /// use munch_core::Money;
    ///
    /// assert_eq!(Money::from_major(100).minor(), 10_000);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * MINOR_PER_MAJOR)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -₹5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_PER_MAJOR - minor)
        } else {
            Money(major * MINOR_PER_MAJOR + minor)
        }
    }

    /// Converts a decimal major-unit amount, rounding to the nearest minor
    /// unit. Returns `None` for NaN, infinities and out-of-range values.
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let minor = (amount * MINOR_PER_MAJOR as f64).round();
        if minor < i64::MIN as f64 || minor > i64::MAX as f64 {
            return None;
        }
        Some(Money(minor as i64))
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the whole major-unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor-unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns the value as a decimal number of major units (display/JSON only).
    #[inline]
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// ```rust
    /// use munch_core::Money;
    ///
    /// let unit_price = Money::from_minor(2999); // ₹29.99
    /// assert_eq!(unit_price.multiply_quantity(3).minor(), 8997);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders rupees with two decimals, e.g. `₹100.00`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

/// Saturating: a sum never wraps into a negative total.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % MINOR_PER_MAJOR == 0 {
            serializer.serialize_i64(self.major())
        } else {
            serializer.serialize_f64(self.as_decimal())
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a price in major units")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(MINOR_PER_MAJOR)
            .map(Money)
            .ok_or_else(|| E::custom(format!("price {} is out of range", v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        let v = i64::try_from(v).map_err(|_| E::custom(format!("price {} is out of range", v)))?;
        self.visit_i64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_decimal(v).ok_or_else(|| E::custom(format!("price {} is not a finite amount", v)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_and_minor() {
        let money = Money::from_major_minor(10, 99);
        assert_eq!(money.minor(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);

        assert_eq!(Money::from_major_minor(-5, 50).minor(), -550);
        assert_eq!(Money::from_major(100).minor(), 10_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(1099).to_string(), "₹10.99");
        assert_eq!(Money::from_major(100).to_string(), "₹100.00");
        assert_eq!(Money::from_minor(-550).to_string(), "-₹5.50");
        assert_eq!(Money::zero().to_string(), "₹0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);
        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a * 3).minor(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.minor(), 2000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_minor(i64::MAX - 10);
        assert_eq!(huge + Money::from_minor(100), Money::from_minor(i64::MAX));
        assert_eq!(huge.multiply_quantity(2), Money::from_minor(i64::MAX));
        assert_eq!(Money::from_minor(-5).multiply_quantity(3).minor(), -15);

        let mut total = huge;
        total += huge;
        assert!(!total.is_negative());

        let sum: Money = [huge, huge, huge].iter().sum();
        assert_eq!(sum, Money::from_minor(i64::MAX));
    }

    /// 0.1 + 0.2 must not drift once prices are in minor units.
    #[test]
    fn test_decimal_prices_do_not_drift() {
        let a = Money::from_decimal(0.1).unwrap();
        let b = Money::from_decimal(0.2).unwrap();
        assert_eq!(a + b, Money::from_minor(30));
        assert_eq!(Money::from_decimal(12.346).unwrap().minor(), 1235);
        assert!(Money::from_decimal(f64::NAN).is_none());
        assert!(Money::from_decimal(f64::INFINITY).is_none());
    }

    #[test]
    fn test_json_uses_major_units() {
        assert_eq!(serde_json::to_string(&Money::from_major(100)).unwrap(), "100");
        assert_eq!(serde_json::to_string(&Money::from_minor(1250)).unwrap(), "12.5");

        let whole: Money = serde_json::from_str("100").unwrap();
        assert_eq!(whole, Money::from_major(100));
        let fractional: Money = serde_json::from_str("12.5").unwrap();
        assert_eq!(fractional, Money::from_minor(1250));
        assert!(serde_json::from_str::<Money>("\"100\"").is_err());
    }
}
