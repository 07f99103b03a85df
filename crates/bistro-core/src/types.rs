//! # Domain Types
//!
//! Core domain types used throughout Bistro POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    MenuItem     │   │      Order      │   │    OrderLine    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name (unique)  │   │  id (sequence)  │   │  item_name      │       │
//! │  │  category       │   │  order_type     │   │  unit_price     │       │
//! │  │  price_cents    │   │  payment_method │   │  quantity       │       │
//! │  │  tax_rate_bps   │   │  totals (cents) │   │  (snapshot)     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ TaxRate         │   │   OrderType     │   │ PaymentMethod   │       │
//! │  │ DiscountRate    │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Dine-In        │   │  Cash           │       │
//! │  │  500 = 5%       │   │  Takeaway       │   │  Card, UPI      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::bill::BillSummary;
use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::validate_discount_bps;
use crate::DEFAULT_TAX_RATE_BPS;

// =============================================================================
// Rates
// =============================================================================

/// Parses a decimal string scaled by `scale` into whole basis points.
fn parse_bps(text: &str, scale: Decimal, field: &str) -> Result<u32, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason,
    };

    let value = Decimal::from_str(text.trim())
        .map_err(|_| invalid(format!("'{}' is not a decimal number", text.trim())))?;

    (value * scale)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_u32()
        .ok_or_else(|| invalid("must not be negative".to_string()))
}

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 500 bps = 5% = 0.05.
/// Menus store the rate as a fraction (`0.05`), the bill screen takes a
/// percentage (`5`); both land on the same integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Parses a percentage such as `"5"` or `"12.5"`.
    pub fn parse_percent(text: &str) -> Result<Self, ValidationError> {
        parse_bps(text, Decimal::ONE_HUNDRED, "tax rate").map(TaxRate)
    }

    /// Parses a fraction such as `"0.05"`.
    pub fn parse_fraction(text: &str) -> Result<Self, ValidationError> {
        parse_bps(text, Decimal::from(10_000), "tax rate").map(TaxRate)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction string, e.g. `0.05` (menu files).
    pub fn to_fraction_string(&self) -> String {
        Decimal::new(self.0 as i64, 4).normalize().to_string()
    }

    /// Returns the rate as a percentage string, e.g. `5` or `12.5`.
    pub fn to_percent_string(&self) -> String {
        Decimal::new(self.0 as i64, 2).normalize().to_string()
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    /// The house rate: 5%.
    fn default() -> Self {
        TaxRate(DEFAULT_TAX_RATE_BPS)
    }
}

/// Whole-bill discount in basis points (1000 = 10% off).
///
/// Unsigned on purpose: a negative discount cannot be expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRate(u32);

impl DiscountRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Parses a percentage such as `"10"` or `"2.5"`. More than 100% is
    /// rejected.
    pub fn parse_percent(text: &str) -> Result<Self, ValidationError> {
        let bps = parse_bps(text, Decimal::ONE_HUNDRED, "discount")?;
        validate_discount_bps(bps)?;
        Ok(DiscountRate(bps))
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn none() -> Self {
        DiscountRate(0)
    }

    pub fn to_percent_string(&self) -> String {
        Decimal::new(self.0 as i64, 2).normalize().to_string()
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// An orderable dish on the menu.
///
/// The name is the identity: stores match on it exactly (case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MenuItem {
    /// Display name, unique within the menu.
    pub name: String,

    /// Free-text category ("South Indian", "Beverage", ...).
    pub category: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Tax rate in basis points (500 = 5%).
    pub tax_rate_bps: u32,
}

impl MenuItem {
    /// Creates a menu item with the default 5% tax rate.
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: Money) -> Self {
        MenuItem {
            name: name.into(),
            category: category.into(),
            price_cents: price.cents(),
            tax_rate_bps: DEFAULT_TAX_RATE_BPS,
        }
    }

    /// Overrides the tax rate.
    pub fn with_tax_rate(mut self, rate: TaxRate) -> Self {
        self.tax_rate_bps = rate.bps();
        self
    }

    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

// =============================================================================
// Order Type
// =============================================================================

/// Where the food is eaten. Dine-in orders carry a table number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum OrderType {
    #[serde(rename = "Dine-In")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Dine-In"))]
    DineIn,
    #[serde(rename = "Takeaway")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Takeaway"))]
    Takeaway,
}

impl OrderType {
    /// Canonical label, as stored and printed.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderType::DineIn => "Dine-In",
            OrderType::Takeaway => "Takeaway",
        }
    }

    /// Whether the order needs a table number.
    pub const fn requires_table(&self) -> bool {
        matches!(self, OrderType::DineIn)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "dinein" => Ok(OrderType::DineIn),
            "takeaway" | "takeout" => Ok(OrderType::Takeaway),
            _ => Err(ValidationError::NotAllowed {
                field: "order type".to_string(),
                allowed: vec!["Dine-In".to_string(), "Takeaway".to_string()],
            }),
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer settles the bill. Recorded only; no payment processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum PaymentMethod {
    #[serde(rename = "Cash")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Cash"))]
    Cash,
    #[serde(rename = "Card")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Card"))]
    Card,
    #[serde(rename = "UPI")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "UPI"))]
    Upi,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Upi => "UPI",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "upi" => Ok(PaymentMethod::Upi),
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: vec!["Cash".to_string(), "Card".to_string(), "UPI".to_string()],
            }),
        }
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// A line item in an order.
/// Uses snapshot pattern to freeze menu data at time of ordering, so later
/// menu edits never rewrite historical bills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    /// Menu item name at time of ordering (frozen).
    pub item_name: String,
    /// Unit price in cents at time of ordering (frozen).
    pub unit_price_cents: i64,
    /// Quantity ordered.
    pub quantity: i64,
}

impl OrderLine {
    /// Snapshots a menu item at the given quantity.
    pub fn from_menu_item(item: &MenuItem, quantity: i64) -> Self {
        OrderLine {
            item_name: item.name.clone(),
            unit_price_cents: item.price_cents,
            quantity,
        }
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line extension (unit price × quantity).
    #[inline]
    pub fn extension(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A committed order header. Lines are stored alongside and loaded separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    /// Sequential identity assigned by the store.
    pub id: i64,
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
    /// Present iff the order is dine-in.
    pub table_number: Option<i64>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Returns the stored monetary breakdown.
    pub fn summary(&self) -> BillSummary {
        BillSummary {
            subtotal: Money::from_cents(self.subtotal_cents),
            tax: Money::from_cents(self.tax_cents),
            discount: Money::from_cents(self.discount_cents),
            total: Money::from_cents(self.total_cents),
        }
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// An order that has passed validation and is ready to be committed.
///
/// The store assigns the id; everything else is fixed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
    pub table_number: Option<i64>,
    pub summary: BillSummary,
    pub lines: Vec<OrderLine>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_parsing() {
        assert_eq!(TaxRate::parse_fraction("0.05").unwrap().bps(), 500);
        assert_eq!(TaxRate::parse_fraction("0.125").unwrap().bps(), 1250);
        assert_eq!(TaxRate::parse_percent("5").unwrap().bps(), 500);
        assert_eq!(TaxRate::parse_percent("8.25").unwrap().bps(), 825);
        assert!(TaxRate::parse_percent("-1").is_err());
        assert!(TaxRate::parse_fraction("five").is_err());
    }

    #[test]
    fn test_tax_rate_formatting() {
        let rate = TaxRate::from_bps(500);
        assert_eq!(rate.to_fraction_string(), "0.05");
        assert_eq!(rate.to_percent_string(), "5");
        assert_eq!(TaxRate::from_bps(1250).to_percent_string(), "12.5");
        assert_eq!(TaxRate::default().bps(), 500);
    }

    #[test]
    fn test_discount_range() {
        assert_eq!(DiscountRate::parse_percent("10").unwrap().bps(), 1000);
        assert_eq!(DiscountRate::parse_percent("0").unwrap(), DiscountRate::none());
        assert_eq!(DiscountRate::parse_percent("100").unwrap().bps(), 10_000);
        assert!(DiscountRate::parse_percent("-5").is_err());
        assert!(matches!(
            DiscountRate::parse_percent("150"),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_order_type_parsing() {
        assert_eq!("Dine-In".parse::<OrderType>().unwrap(), OrderType::DineIn);
        assert_eq!("dine-in".parse::<OrderType>().unwrap(), OrderType::DineIn);
        assert_eq!("Dine in".parse::<OrderType>().unwrap(), OrderType::DineIn);
        assert_eq!("takeaway".parse::<OrderType>().unwrap(), OrderType::Takeaway);
        assert!("delivery".parse::<OrderType>().is_err());
        assert!(OrderType::DineIn.requires_table());
        assert!(!OrderType::Takeaway.requires_table());
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("upi".parse::<PaymentMethod>().unwrap(), PaymentMethod::Upi);
        assert_eq!("CARD".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!(PaymentMethod::Upi.to_string(), "UPI");
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_enum_serde_labels() {
        assert_eq!(serde_json::to_string(&OrderType::DineIn).unwrap(), "\"Dine-In\"");
        assert_eq!(serde_json::to_string(&PaymentMethod::Upi).unwrap(), "\"UPI\"");
    }

    #[test]
    fn test_order_line_snapshot() {
        let mut item = MenuItem::new("Idli", "South Indian", Money::from_cents(4000));
        let line = OrderLine::from_menu_item(&item, 3);

        item.price_cents = 5000;

        assert_eq!(line.unit_price_cents, 4000);
        assert_eq!(line.extension().cents(), 12000);
    }
}
