//! # Bill Calculation
//!
//! Turns order lines into the four numbers printed at the bottom of a bill.
//!
//! ## Derivation Order
//! ```text
//! lines ──► subtotal = Σ unit_price × quantity          (exact)
//!              │
//!              ├──► tax      = round(subtotal × tax rate)       (to the cent)
//!              ├──► discount = round(subtotal × discount rate)  (to the cent)
//!              │
//!              └──► total    = subtotal + tax − discount        (exact)
//! ```
//!
//! Tax and discount are both taken on the pre-tax subtotal and rounded
//! independently, so the same lines always produce the same pennies.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{DiscountRate, OrderLine, TaxRate};

/// Monetary breakdown of an order.
///
/// Invariant: `total == subtotal + tax - discount`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillSummary {
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    pub total: Money,
}

impl BillSummary {
    /// The all-zero summary of an empty order.
    pub const fn zero() -> Self {
        BillSummary {
            subtotal: Money::zero(),
            tax: Money::zero(),
            discount: Money::zero(),
            total: Money::zero(),
        }
    }
}

/// Computes the bill for a set of lines.
///
/// Pure and infallible. Quantities and prices are taken as given; negative
/// values flow through the arithmetic unchanged. Lines must stay within
/// `MAX_PRICE_CENTS` and `MAX_ITEM_QUANTITY`, as `OrderDraft` and the order
/// pipeline enforce, or the i64 cent sums can overflow.
///
/// ```rust
/// use bistro_core::bill::compute_bill;
/// use bistro_core::money::Money;
/// use bistro_core::types::{DiscountRate, OrderLine, TaxRate};
///
/// let lines = vec![
///     OrderLine { item_name: "Veg Thali".into(), unit_price_cents: 10000, quantity: 2 },
///     OrderLine { item_name: "Idli".into(), unit_price_cents: 5000, quantity: 1 },
/// ];
///
/// let bill = compute_bill(&lines, DiscountRate::from_bps(1000), TaxRate::from_bps(500));
/// assert_eq!(bill.subtotal, Money::from_cents(25000));
/// assert_eq!(bill.tax, Money::from_cents(1250));
/// assert_eq!(bill.discount, Money::from_cents(2500));
/// assert_eq!(bill.total, Money::from_cents(23750));
/// ```
pub fn compute_bill(lines: &[OrderLine], discount: DiscountRate, tax: TaxRate) -> BillSummary {
    let subtotal: Money = lines.iter().map(OrderLine::extension).sum();
    let tax_amount = subtotal.calculate_tax(tax);
    let discount_amount = subtotal.calculate_discount(discount);

    BillSummary {
        subtotal,
        tax: tax_amount,
        discount: discount_amount,
        total: subtotal + tax_amount - discount_amount,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, price_cents: i64, quantity: i64) -> OrderLine {
        OrderLine {
            item_name: name.to_string(),
            unit_price_cents: price_cents,
            quantity,
        }
    }

    #[test]
    fn test_reference_bill() {
        let lines = vec![line("A", 10000, 2), line("B", 5000, 1)];
        let bill = compute_bill(&lines, DiscountRate::from_bps(1000), TaxRate::from_bps(500));

        assert_eq!(bill.subtotal.to_decimal_string(), "250.00");
        assert_eq!(bill.tax.to_decimal_string(), "12.50");
        assert_eq!(bill.discount.to_decimal_string(), "25.00");
        assert_eq!(bill.total.to_decimal_string(), "237.50");
    }

    #[test]
    fn test_empty_bill_is_zero() {
        let bill = compute_bill(&[], DiscountRate::from_bps(1000), TaxRate::from_bps(500));
        assert_eq!(bill, BillSummary::zero());
    }

    #[test]
    fn test_order_independent() {
        let lines = vec![
            line("Masala Dosa", 8000, 3),
            line("Butter Naan", 3000, 4),
            line("Coke", 250, 7),
            line("Paneer Butter Masala", 18099, 1),
        ];
        let mut reversed = lines.clone();
        reversed.reverse();
        let mut rotated = lines.clone();
        rotated.rotate_left(2);

        let discount = DiscountRate::from_bps(750);
        let tax = TaxRate::from_bps(500);
        let expected = compute_bill(&lines, discount, tax);

        assert_eq!(compute_bill(&reversed, discount, tax), expected);
        assert_eq!(compute_bill(&rotated, discount, tax), expected);
    }

    #[test]
    fn test_total_identity_holds() {
        let discount_steps = [0u32, 250, 1000, 1250, 3333];
        let tax_steps = [0u32, 500, 825, 1200, 1800];

        for price in [1, 99, 1099, 1299, 2500, 18099] {
            for qty in 1..=5 {
                for &d in &discount_steps {
                    for &t in &tax_steps {
                        let bill = compute_bill(
                            &[line("X", price, qty)],
                            DiscountRate::from_bps(d),
                            TaxRate::from_bps(t),
                        );
                        assert_eq!(bill.total, bill.subtotal + bill.tax - bill.discount);
                    }
                }
            }
        }
    }

    #[test]
    fn test_each_component_rounded_independently() {
        // subtotal 10.50: 5% tax = 0.525 → 0.52, 15% discount = 1.575 → 1.58
        let bill = compute_bill(
            &[line("Idli", 1050, 1)],
            DiscountRate::from_bps(1500),
            TaxRate::from_bps(500),
        );

        assert_eq!(bill.tax.cents(), 52);
        assert_eq!(bill.discount.cents(), 158);
        assert_eq!(bill.total.cents(), 1050 + 52 - 158);
    }

    #[test]
    fn test_negative_quantity_is_not_rejected() {
        let bill = compute_bill(&[line("Refund", 1000, -1)], DiscountRate::none(), TaxRate::from_bps(500));
        assert_eq!(bill.subtotal.cents(), -1000);
        assert_eq!(bill.tax.cents(), -50);
        assert_eq!(bill.total.cents(), -1050);
    }
}
