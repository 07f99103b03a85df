//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floats:                                                    │
//! │    2.675 rounded to 2 places = 2.67  (2.675 is really 2.67499999...)    │
//! │                                                                         │
//! │  A bill that rounds differently on two machines is a support ticket.    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Line extensions and subtotals are exact integers.                    │
//! │    Tax and discount are rounded ONCE each, to the cent, half-to-even.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bistro_core::money::Money;
//!
//! let price = Money::from_cents(1299); // 12.99
//! let line = price * 2;                // 25.98
//! assert_eq!(line.to_decimal_string(), "25.98");
//!
//! let typed = Money::parse("12.99").unwrap();
//! assert_eq!(typed, price);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::{DiscountRate, TaxRate};

/// Basis points in one whole (100% = 10,000 bps).
pub const BPS_PER_UNIT: i64 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents, paise).
///
/// ## Design Decisions
/// - **i64 (signed)**: discounts are subtracted, refunds are representable
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serde**: serializes as a bare integer number of cents
///
/// ## Where Money Flows
/// ```text
/// MenuItem.price_cents ──► OrderLine.unit_price ──► OrderLine.extension
///                                                         │
///                                     Σ extensions ──► subtotal
///                                                         │
///                             subtotal × tax rate ──► tax (rounded)
///                        subtotal × discount rate ──► discount (rounded)
///                                                         │
///                        subtotal + tax − discount ──► total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50, not -4.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Parses a decimal amount as typed by a person or stored in a CSV file.
    ///
    /// ## Rules
    /// - Accepts `"80"`, `"12.5"`, `"12.99"`, `"-3.10"`
    /// - More than two decimal places are rounded half-to-even to the cent
    /// - Anything that is not a decimal number is an `InvalidFormat` error
    ///
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// assert_eq!(Money::parse("80").unwrap().cents(), 8000);
    /// assert_eq!(Money::parse("12.5").unwrap().cents(), 1250);
    /// assert!(Money::parse("twelve").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: format!("'{}' is not a decimal number", text.trim()),
        };

        let value = Decimal::from_str(text.trim()).map_err(|_| invalid())?;
        let cents = (value * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
            .to_i64()
            .ok_or_else(invalid)?;

        Ok(Money(cents))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns `self × bps / 10000`, rounded half-to-even to the cent.
    ///
    /// ## Bankers Rounding
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  Exact halves go to the nearest EVEN cent:                          │
    /// │    52.5¢ → 52¢      57.5¢ → 58¢      -52.5¢ → -52¢                  │
    /// │                                                                     │
    /// │  Everything else rounds to the nearest cent as usual.               │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    pub fn apply_bps(&self, bps: u32) -> Money {
        let scaled = self.0 as i128 * bps as i128;
        Money(round_half_even(scaled, BPS_PER_UNIT as i128) as i64)
    }

    /// Calculates the tax owed on this amount.
    ///
    /// ```rust
    /// use bistro_core::money::Money;
    /// use bistro_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(25000);      // 250.00
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(500));
    /// assert_eq!(tax.cents(), 1250);                // 12.50
    /// ```
    #[inline]
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        self.apply_bps(rate.bps())
    }

    /// Calculates the discount amount granted on this amount.
    #[inline]
    pub fn calculate_discount(&self, rate: DiscountRate) -> Money {
        self.apply_bps(rate.bps())
    }

    /// Formats as a plain decimal with two places, e.g. `237.50` or `-5.50`.
    ///
    /// This is the format written to CSV files and the JSON archive's
    /// human-facing columns.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().abs(), self.minor())
    }

    /// Formats with a currency symbol, e.g. `₹237.50`.
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}{}.{:02}", sign, symbol, self.major().abs(), self.minor())
    }
}

/// Divides `numerator` by a positive `denominator`, rounding exact halves to
/// the even neighbour.
pub fn round_half_even(numerator: i128, denominator: i128) -> i128 {
    debug_assert!(denominator > 0);

    let quotient = numerator.div_euclid(denominator);
    let remainder = numerator.rem_euclid(denominator);
    let twice = remainder * 2;

    if twice > denominator || (twice == denominator && quotient % 2 != 0) {
        quotient + 1
    } else {
        quotient
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows a dollar sign; receipts use `format_with_symbol` instead.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol("$"))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
