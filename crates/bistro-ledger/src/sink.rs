//! # Auxiliary Sink
//!
//! The seam between the order pipeline and every secondary record of an
//! order. A sink sees a committed order exactly once, after the database
//! commit, as a [`BillRecord`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use bistro_core::{BillSummary, Order, OrderLine, OrderType, PaymentMethod};

use crate::error::{LedgerError, LedgerResult};

/// A committed order as the auxiliary logs see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillRecord {
    pub order_id: i64,
    pub items: Vec<OrderLine>,
    pub payment_method: PaymentMethod,
    /// Dine-In or Takeaway.
    pub mode: OrderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<i64>,
    /// Amounts in cents.
    pub summary: BillSummary,
    pub created_at: DateTime<Utc>,
}

impl BillRecord {
    pub fn new(order: &Order, lines: &[OrderLine]) -> Self {
        BillRecord {
            order_id: order.id,
            items: lines.to_vec(),
            payment_method: order.payment_method,
            mode: order.order_type,
            table_number: order.table_number,
            summary: order.summary(),
            created_at: order.created_at,
        }
    }

    /// Rebuilds the order header this record was taken from.
    pub fn order(&self) -> Order {
        Order {
            id: self.order_id,
            order_type: self.mode,
            payment_method: self.payment_method,
            table_number: self.table_number,
            subtotal_cents: self.summary.subtotal.cents(),
            tax_cents: self.summary.tax.cents(),
            discount_cents: self.summary.discount.cents(),
            total_cents: self.summary.total.cents(),
            created_at: self.created_at,
        }
    }
}

/// A best-effort, append-only destination for committed orders.
#[async_trait]
pub trait AuxiliarySink: Send + Sync {
    /// Short label used in logs and in `PlacedOrder::failed_sinks`.
    fn name(&self) -> &'static str;

    /// Records one committed order.
    async fn append(&self, record: &BillRecord) -> LedgerResult<()>;
}

/// Creates the parent directory of `path` if it has one.
pub(crate) async fn ensure_parent(path: &Path) -> LedgerResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LedgerError::io(parent, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use bistro_core::{compute_bill, DiscountRate, TaxRate};
    use chrono::TimeZone;

    /// 2 × Masala Dosa and 1 × Butter Naan at table 3, 10% off, under the
    /// given `order_id`.
    pub fn record(order_id: i64) -> BillRecord {
        let items = vec![
            OrderLine {
                item_name: "Masala Dosa".to_string(),
                unit_price_cents: 8000,
                quantity: 2,
            },
            OrderLine {
                item_name: "Butter Naan".to_string(),
                unit_price_cents: 3000,
                quantity: 1,
            },
        ];
        BillRecord {
            order_id,
            summary: compute_bill(&items, DiscountRate::from_bps(1000), TaxRate::from_bps(500)),
            items,
            payment_method: PaymentMethod::Cash,
            mode: OrderType::DineIn,
            table_number: Some(3),
            created_at: Utc.with_ymd_and_hms(2026, 10, 19, 19, 5, 42).unwrap(),
        }
    }
}
