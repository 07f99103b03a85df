//! # Validation Module
//!
//! Input validation utilities for Bistro POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI / console input                                           │
//! │  └── Parsing (FromStr for OrderType, Money::parse, ...)                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                        │
//! │  ├── menu items before upsert                                           │
//! │  └── quantities and table numbers before an order is placed             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── UNIQUE menu names                                                  │
//! │  └── CHECK constraints on order type, payment method, table number      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{MenuItem, OrderType};
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a menu item name.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - No leading or trailing whitespace (names match exactly)
/// - At most 200 characters
///
/// ```rust
/// use bistro_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Masala Dosa").is_ok());
/// assert!(validate_item_name("   ").is_err());
/// assert!(validate_item_name("Idli ").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.trim() != name {
        return Err(ValidationError::InvalidFormat {
            field: "name".to_string(),
            reason: format!("'{}' has leading or trailing spaces", name),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (complimentary items).
///
/// ## Rules
/// - Must not be negative
/// - Must not exceed MAX_PRICE_CENTS, so every bill fits in i64 cents
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Validates a discount in basis points (0% to 100%).
pub fn validate_discount_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a menu item before it is written to any menu store.
pub fn validate_menu_item(item: &MenuItem) -> ValidationResult<()> {
    validate_item_name(&item.name)?;
    validate_price_cents(item.price_cents)?;
    validate_tax_rate_bps(item.tax_rate_bps)?;
    Ok(())
}

/// Parses a table number as typed at the till.
pub fn parse_table_number(text: &str) -> CoreResult<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| CoreError::invalid_table(format!("'{}' is not a whole number", text.trim())))
}

/// Checks the table number against the order type.
///
/// ## Rules
/// ```text
/// Dine-In  + Some(n > 0) → Some(n)
/// Dine-In  + Some(n ≤ 0) → InvalidTable
/// Dine-In  + None        → InvalidTable
/// Takeaway + anything    → None   (a takeaway has no table)
/// ```
pub fn validate_table(order_type: OrderType, table_number: Option<i64>) -> CoreResult<Option<i64>> {
    if !order_type.requires_table() {
        return Ok(None);
    }

    match table_number {
        Some(n) if n > 0 => Ok(Some(n)),
        Some(n) => Err(CoreError::invalid_table(format!(
            "table {} is not a positive number",
            n
        ))),
        None => Err(CoreError::invalid_table(
            "a table number is required for Dine-In orders",
        )),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Veg Thali").is_ok());
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name(&"A".repeat(201)).is_err());
        assert!(matches!(
            validate_item_name(" Idli"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(validate_item_name("Idli\t").is_err());
    }

    #[test]
    fn test_validate_price_bounds() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(MAX_PRICE_CENTS).is_ok());
        assert!(validate_price_cents(-1).is_err());
        assert!(validate_price_cents(MAX_PRICE_CENTS + 1).is_err());
        assert!(validate_price_cents(1_000_000_000_000_000_000).is_err());
    }

    #[test]
    fn test_validate_discount_bps() {
        assert!(validate_discount_bps(0).is_ok());
        assert!(validate_discount_bps(10_000).is_ok());
        assert!(validate_discount_bps(15_000).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_menu_item() {
        let item = MenuItem::new("Idli", "South Indian", Money::from_cents(4000));
        assert!(validate_menu_item(&item).is_ok());

        let mut negative = item.clone();
        negative.price_cents = -1;
        assert!(validate_menu_item(&negative).is_err());

        let mut taxed = item;
        taxed.tax_rate_bps = 10_001;
        assert!(validate_menu_item(&taxed).is_err());
    }

    #[test]
    fn test_validate_table() {
        assert_eq!(validate_table(OrderType::DineIn, Some(4)).unwrap(), Some(4));
        assert!(matches!(
            validate_table(OrderType::DineIn, None),
            Err(CoreError::InvalidTable { .. })
        ));
        assert!(matches!(
            validate_table(OrderType::DineIn, Some(0)),
            Err(CoreError::InvalidTable { .. })
        ));
        assert_eq!(validate_table(OrderType::Takeaway, Some(7)).unwrap(), None);
        assert_eq!(validate_table(OrderType::Takeaway, None).unwrap(), None);
    }

    #[test]
    fn test_parse_table_number() {
        assert_eq!(parse_table_number(" 12 ").unwrap(), 12);
        assert!(matches!(
            parse_table_number("twelve"),
            Err(CoreError::InvalidTable { .. })
        ));
    }
}
