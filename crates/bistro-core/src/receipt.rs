//! # Receipt Rendering
//!
//! Produces the plain-text receipt for a committed order. Writing it to disk
//! or a printer is someone else's job; this module only builds the text.
//!
//! ## Layout
//! ```text
//! BISTRO POS
//! -------------------------
//! Order ID: 12
//! Date: 2026-10-19 13:45:07
//! Order Type: Dine-In
//! Table: 4
//! -------------------------
//! ITEMS:
//! Masala Dosa x2 @ ₹80.00 = ₹160.00
//! -------------------------
//! Subtotal: ₹160.00
//! Tax (5%): ₹8.00
//! Discount: ₹0.00
//! -------------------------
//! TOTAL: ₹168.00
//! -------------------------
//! Payment Method: Cash
//! ```

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Order, OrderLine, TaxRate};

const RULE: &str = "-------------------------";

/// Presentation settings that do not belong to the order itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptOptions {
    /// Printed as the first line.
    pub store_name: String,
    /// Prefix for every amount.
    pub currency_symbol: String,
    /// Shown next to the tax line when known.
    pub tax_rate: Option<TaxRate>,
}

impl Default for ReceiptOptions {
    fn default() -> Self {
        ReceiptOptions {
            store_name: "RESTAURANT BILLING SYSTEM".to_string(),
            currency_symbol: "$".to_string(),
            tax_rate: None,
        }
    }
}

/// Renders the receipt for an order and its lines.
pub fn render_receipt(order: &Order, lines: &[OrderLine], options: &ReceiptOptions) -> String {
    let money = |m: Money| m.format_with_symbol(&options.currency_symbol);
    let summary = order.summary();

    let mut out: Vec<String> = vec![
        options.store_name.to_uppercase(),
        RULE.to_string(),
        format!("Order ID: {}", order.id),
        format!("Date: {}", order.created_at.format("%Y-%m-%d %H:%M:%S")),
        format!("Order Type: {}", order.order_type),
    ];

    if let Some(table) = order.table_number {
        out.push(format!("Table: {}", table));
    }

    out.push(RULE.to_string());
    out.push("ITEMS:".to_string());

    for line in lines {
        out.push(format!(
            "{} x{} @ {} = {}",
            line.item_name,
            line.quantity,
            money(line.unit_price()),
            money(line.extension())
        ));
    }

    let tax_label = match options.tax_rate {
        Some(rate) => format!("Tax ({}%)", rate.to_percent_string()),
        None => "Tax".to_string(),
    };

    out.extend([
        RULE.to_string(),
        format!("Subtotal: {}", money(summary.subtotal)),
        format!("{}: {}", tax_label, money(summary.tax)),
        format!("Discount: {}", money(summary.discount)),
        RULE.to_string(),
        format!("TOTAL: {}", money(summary.total)),
        RULE.to_string(),
        format!("Payment Method: {}", order.payment_method),
    ]);

    let mut text = out.join("\n");
    text.push('\n');
    text
}

// =============================================================================
// Unit Tests
// =============================================================================
