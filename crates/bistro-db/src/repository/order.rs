//! # Order Repository
//!
//! Database operations for orders and their line items.
//!
//! ## Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       commit_order(NewOrder)                            │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   ├── INSERT INTO orders (...)          → id from AUTOINCREMENT         │
//! │   ├── INSERT INTO order_items (id, ...) × lines                         │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure before COMMIT drops the transaction, which rolls back.     │
//! │  Readers see the header and its lines together or not at all.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::SubsecRound;
use sqlx::SqlitePool;
use tracing::{debug, info};

use bistro_core::{NewOrder, Order, OrderLine};

use crate::error::{DbError, DbResult};
use crate::store::OrderStore;

const ORDER_COLUMNS: &str = r#"
    id, order_type, payment_method, table_number,
    subtotal_cents, tax_cents, discount_cents, total_cents,
    created_at
"#;

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Most recent orders first.
    pub async fn recent(&self, limit: i64) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM orders ORDER BY id DESC LIMIT ?1",
            ORDER_COLUMNS
        );
        let orders: Vec<Order> = sqlx::query_as(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn commit_order(&self, order: &NewOrder) -> DbResult<Order> {
        if order.lines.is_empty() {
            return Err(DbError::ConstraintViolation {
                message: "an order must have at least one line".to_string(),
            });
        }

        // Stored at second precision so every sink shows the same time
        let created_at = order.created_at.trunc_subsecs(0);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let id = sqlx::query(
            r#"
            INSERT INTO orders (
                order_type, payment_method, table_number,
                subtotal_cents, tax_cents, discount_cents, total_cents,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(order.order_type)
        .bind(order.payment_method)
        .bind(order.table_number)
        .bind(order.summary.subtotal.cents())
        .bind(order.summary.tax.cents())
        .bind(order.summary.discount.cents())
        .bind(order.summary.total.cents())
        .bind(created_at)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for line in &order.lines {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, item_name, quantity, unit_price_cents)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(id)
            .bind(&line.item_name)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            order_id = id,
            lines = order.lines.len(),
            total_cents = order.summary.total.cents(),
            "Order committed"
        );

        Ok(Order {
            id,
            order_type: order.order_type,
            payment_method: order.payment_method,
            table_number: order.table_number,
            subtotal_cents: order.summary.subtotal.cents(),
            tax_cents: order.summary.tax.cents(),
            discount_cents: order.summary.discount.cents(),
            total_cents: order.summary.total.cents(),
            created_at,
        })
    }

    async fn get_order(&self, id: i64) -> DbResult<Option<Order>> {
        debug!(order_id = id, "Fetching order");

        let sql = format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS);
        let order: Option<Order> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    async fn get_lines(&self, order_id: i64) -> DbResult<Vec<OrderLine>> {
        let lines: Vec<OrderLine> = sqlx::query_as(
            r#"
            SELECT item_name, unit_price_cents, quantity
            FROM order_items
            WHERE order_id = ?1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    async fn count_orders(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_lines(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
