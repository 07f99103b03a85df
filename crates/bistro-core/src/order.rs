//! # In-Progress Order
//!
//! The order being built at the till, before it is placed.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Till Action             OrderDraft call           Change               │
//! │  ───────────             ───────────────           ──────               │
//! │                                                                         │
//! │  Pick dish ────────────► add_item(item, qty) ────► push or qty += n     │
//! │  Change quantity ──────► set_quantity(name, n) ──► lines[i].qty = n     │
//! │  Remove dish ──────────► remove_item(name) ──────► lines.remove(i)      │
//! │  Type discount ────────► set_discount(rate)                             │
//! │  Look at the bill ─────► bill(tax) ──────────────► (read only)          │
//! │  Process order ────────► lines() → pipeline, then clear()               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::bill::{compute_bill, BillSummary};
use crate::error::{CoreError, CoreResult};
use crate::types::{DiscountRate, MenuItem, OrderLine, TaxRate};
use crate::validation::{validate_price_cents, validate_quantity};
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_LINES};

/// An order that is still being edited.
///
/// ## Invariants
/// - Lines are unique by item name (adding the same dish raises its quantity)
/// - Every quantity is between 1 and MAX_ITEM_QUANTITY
/// - Prices are frozen when the dish is first added
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDraft {
    lines: Vec<OrderLine>,
    discount: DiscountRate,
}

impl OrderDraft {
    /// Creates a new empty order.
    pub fn new() -> Self {
        OrderDraft::default()
    }

    /// Adds a dish or increases its quantity if already present.
    pub fn add_item(&mut self, item: &MenuItem, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;
        validate_price_cents(item.price_cents)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.item_name == item.name) {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(());
        }

        if self.lines.len() >= MAX_ORDER_LINES {
            return Err(CoreError::OrderTooLarge {
                max: MAX_ORDER_LINES,
            });
        }

        self.lines.push(OrderLine::from_menu_item(item, quantity));
        Ok(())
    }

    /// Sets the quantity of a dish already in the order. Zero removes it.
    pub fn set_quantity(&mut self, item_name: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(item_name);
        }

        validate_quantity(quantity)?;

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.item_name == item_name)
            .ok_or_else(|| CoreError::NotInOrder(item_name.to_string()))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Removes a dish from the order.
    pub fn remove_item(&mut self, item_name: &str) -> CoreResult<()> {
        let before = self.lines.len();
        self.lines.retain(|l| l.item_name != item_name);

        if self.lines.len() == before {
            Err(CoreError::NotInOrder(item_name.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn set_discount(&mut self, discount: DiscountRate) {
        self.discount = discount;
    }

    pub fn discount(&self) -> DiscountRate {
        self.discount
    }

    /// Clears all lines and the discount.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.discount = DiscountRate::none();
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of portions across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Live bill preview.
    pub fn bill(&self, tax: TaxRate) -> BillSummary {
        compute_bill(&self.lines, self.discount, tax)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn dosa() -> MenuItem {
        MenuItem::new("Masala Dosa", "South Indian", Money::from_cents(8000))
    }

    fn naan() -> MenuItem {
        MenuItem::new("Butter Naan", "North Indian", Money::from_cents(3000))
    }

    #[test]
    fn test_add_merges_same_item() {
        let mut draft = OrderDraft::new();
        draft.add_item(&dosa(), 1).unwrap();
        draft.add_item(&naan(), 2).unwrap();
        draft.add_item(&dosa(), 2).unwrap();

        assert_eq!(draft.lines().len(), 2);
        assert_eq!(draft.lines()[0].quantity, 3);
        assert_eq!(draft.total_quantity(), 5);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut draft = OrderDraft::new();
        assert!(matches!(draft.add_item(&dosa(), 0), Err(CoreError::Validation(_))));
        assert!(draft.is_empty());
    }

    #[test]
    fn test_add_caps_quantity() {
        let mut draft = OrderDraft::new();
        draft.add_item(&dosa(), 999).unwrap();
        assert!(matches!(
            draft.add_item(&dosa(), 1),
            Err(CoreError::QuantityTooLarge { requested: 1000, .. })
        ));
    }

    #[test]
    fn test_add_rejects_price_above_maximum() {
        let mut draft = OrderDraft::new();
        let gold = MenuItem::new(
            "Gold Thali",
            "Meals",
            Money::parse("10000000000000000").unwrap(),
        );

        assert!(matches!(draft.add_item(&gold, 10), Err(CoreError::Validation(_))));
        assert!(draft.is_empty());
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let mut draft = OrderDraft::new();
        draft.add_item(&dosa(), 1).unwrap();
        draft.add_item(&naan(), 1).unwrap();

        draft.set_quantity("Butter Naan", 4).unwrap();
        assert_eq!(draft.lines()[1].quantity, 4);

        draft.set_quantity("Masala Dosa", 0).unwrap();
        assert_eq!(draft.lines().len(), 1);

        assert!(matches!(draft.remove_item("Idli"), Err(CoreError::NotInOrder(_))));
    }

    #[test]
    fn test_bill_preview_uses_discount() {
        let mut draft = OrderDraft::new();
        draft.add_item(&dosa(), 2).unwrap();
        draft.set_discount(DiscountRate::from_bps(1000));

        let bill = draft.bill(TaxRate::from_bps(500));
        assert_eq!(bill.subtotal.cents(), 16000);
        assert_eq!(bill.tax.cents(), 800);
        assert_eq!(bill.discount.cents(), 1600);
        assert_eq!(bill.total.cents(), 15200);

        draft.clear();
        assert!(draft.is_empty());
        assert_eq!(draft.discount(), DiscountRate::none());
    }

    #[test]
    fn test_price_frozen_at_add_time() {
        let mut draft = OrderDraft::new();
        let mut item = dosa();
        draft.add_item(&item, 1).unwrap();

        item.price_cents = 9900;
        draft.add_item(&item, 1).unwrap();

        assert_eq!(draft.lines()[0].unit_price_cents, 8000);
        assert_eq!(draft.lines()[0].quantity, 2);
    }
}
