//! # Order Pipeline
//!
//! Turns a list of lines into a committed order.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  place_order(lines, type, payment, table, discount)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Validate ─── empty? ─► EmptyOrder                                   │
//! │       │     ─── dine-in without table? ─► InvalidTable                  │
//! │       │     ─── quantity / price / discount out of range? ─► Invalid    │
//! │       ▼                                                                 │
//! │  2. compute_bill(lines, discount, tax)                                  │
//! │       ▼                                                                 │
//! │  3. OrderStore::commit_order  (header + lines, one transaction)         │
//! │       ▼                                                                 │
//! │  4. Fan out BillRecord to every AuxiliarySink, each in its own task     │
//! │       │                                                                 │
//! │       └── failures are logged and listed in PlacedOrder::failed_sinks   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is written until step 3, so a rejected order leaves no trace.

use chrono::{SubsecRound, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use bistro_core::validation::{
    validate_discount_bps, validate_price_cents, validate_quantity, validate_table,
};
use bistro_core::{
    compute_bill, CoreError, DiscountRate, NewOrder, Order, OrderLine, OrderType, PaymentMethod,
    TaxRate, MAX_ORDER_LINES,
};
use bistro_db::OrderStore;
use bistro_ledger::{AuxiliarySink, BillRecord};

use crate::error::OrderError;

/// A committed order and how its auxiliary records went.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub lines: Vec<OrderLine>,
    /// Sinks that did not record the order. Empty on full success.
    pub failed_sinks: Vec<&'static str>,
}

impl PlacedOrder {
    pub fn fully_recorded(&self) -> bool {
        self.failed_sinks.is_empty()
    }
}

/// Validates, commits and fans out orders.
pub struct OrderPipeline {
    store: Arc<dyn OrderStore>,
    sinks: Vec<Arc<dyn AuxiliarySink>>,
    tax: TaxRate,
}

impl OrderPipeline {
    pub fn new(store: Arc<dyn OrderStore>, tax: TaxRate) -> Self {
        OrderPipeline {
            store,
            sinks: Vec::new(),
            tax,
        }
    }

    /// Adds an auxiliary sink. Sinks see every committed order.
    pub fn with_sink(mut self, sink: Arc<dyn AuxiliarySink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax
    }

    pub fn store(&self) -> &Arc<dyn OrderStore> {
        &self.store
    }

    /// Places an order.
    ///
    /// For a takeaway order any table number is dropped. The returned order
    /// carries the id assigned by the store.
    pub async fn place_order(
        &self,
        lines: &[OrderLine],
        order_type: OrderType,
        payment_method: PaymentMethod,
        table_number: Option<i64>,
        discount: DiscountRate,
    ) -> Result<PlacedOrder, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let table_number = validate_table(order_type, table_number)?;
        validate_lines(lines, discount)?;

        let summary = compute_bill(lines, discount, self.tax);
        let new_order = NewOrder {
            order_type,
            payment_method,
            table_number,
            summary,
            lines: lines.to_vec(),
            created_at: Utc::now().trunc_subsecs(0),
        };

        let order = self.store.commit_order(&new_order).await?;
        info!(
            order_id = order.id,
            order_type = %order.order_type,
            payment = %order.payment_method,
            lines = lines.len(),
            total = %order.total(),
            "Order placed"
        );

        let record = BillRecord::new(&order, lines);
        let failed_sinks = self.emit(record).await;

        Ok(PlacedOrder {
            order,
            lines: new_order.lines,
            failed_sinks,
        })
    }

    /// Hands the record to every sink concurrently and waits for all of them.
    async fn emit(&self, record: BillRecord) -> Vec<&'static str> {
        let record = Arc::new(record);

        let handles: Vec<_> = self
            .sinks
            .iter()
            .map(|sink| {
                let sink = Arc::clone(sink);
                let record = Arc::clone(&record);
                let name = sink.name();
                (name, tokio::spawn(async move { sink.append(&record).await }))
            })
            .collect();

        let mut failed = Vec::new();
        for (name, handle) in handles {
            match handle.await {
                Ok(Ok(())) => debug!(sink = name, order_id = record.order_id, "Sink recorded order"),
                Ok(Err(e)) => {
                    warn!(sink = name, order_id = record.order_id, error = %e, "Sink failed, order kept");
                    failed.push(name);
                }
                Err(e) => {
                    warn!(sink = name, order_id = record.order_id, error = %e, "Sink task aborted, order kept");
                    failed.push(name);
                }
            }
        }
        failed
    }
}

fn validate_lines(lines: &[OrderLine], discount: DiscountRate) -> Result<(), CoreError> {
    if lines.len() > MAX_ORDER_LINES {
        return Err(CoreError::OrderTooLarge {
            max: MAX_ORDER_LINES,
        });
    }

    for line in lines {
        validate_quantity(line.quantity)?;
        validate_price_cents(line.unit_price_cents)?;
    }
    validate_discount_bps(discount.bps())?;
    Ok(())
}
