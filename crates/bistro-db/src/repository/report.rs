//! # Sales Reports
//!
//! Read-only aggregation over committed orders.
//!
//! ## Available Reports
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  daily_sales(date)          one row per order placed that day + summary │
//! │                             → daily_sales_report_{date}.csv             │
//! │                                                                         │
//! │  top_items(days, limit)     dishes ranked by quantity sold              │
//! │                             → top_items_report_{days}days.csv           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dates are calendar days in UTC, matching the stored timestamps.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use bistro_core::money::round_half_even;
use bistro_core::{Money, OrderType, PaymentMethod};

use crate::error::DbResult;

// =============================================================================
// Report Types
// =============================================================================

/// One order in the daily report.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DailyOrderRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub order_type: OrderType,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    /// Number of line rows on the order.
    pub item_count: i64,
}

/// Aggregates over one day's orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySummary {
    pub total_orders: usize,
    pub total_sales: Money,
    /// Rounded half-to-even to the cent.
    pub average_order_value: Money,
    /// Most frequent first.
    pub payment_method_distribution: Vec<(PaymentMethod, usize)>,
    /// Most frequent first.
    pub order_type_distribution: Vec<(OrderType, usize)>,
}

/// The daily sales report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySalesReport {
    pub date: NaiveDate,
    pub orders: Vec<DailyOrderRow>,
    pub summary: DailySummary,
}

/// One dish in the top items report.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TopItemRow {
    pub name: String,
    /// From the current menu; `None` for dishes no longer on it.
    pub category: Option<String>,
    pub total_quantity: i64,
    pub total_sales_cents: i64,
}

/// The top items report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopItemsReport {
    pub days: u32,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub items: Vec<TopItemRow>,
}

// CSV layouts

#[derive(Serialize)]
struct DailyCsvRow<'a> {
    order_id: i64,
    order_date: String,
    order_type: &'a str,
    subtotal: String,
    tax: String,
    discount: String,
    total: String,
    payment_method: &'a str,
    item_count: i64,
}

#[derive(Serialize)]
struct TopItemCsvRow<'a> {
    name: &'a str,
    category: &'a str,
    total_quantity: i64,
    total_sales: String,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for report queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Orders placed on `date`. `None` when there were none.
    pub async fn daily_sales(&self, date: NaiveDate) -> DbResult<Option<DailySalesReport>> {
        let day = date.format("%Y-%m-%d").to_string();
        debug!(date = %day, "Building daily sales report");

        let orders: Vec<DailyOrderRow> = sqlx::query_as(
            r#"
            SELECT
                o.id,
                o.created_at,
                o.order_type,
                o.subtotal_cents,
                o.tax_cents,
                o.discount_cents,
                o.total_cents,
                o.payment_method,
                COUNT(oi.id) AS item_count
            FROM orders o
            JOIN order_items oi ON oi.order_id = o.id
            WHERE date(o.created_at) = ?1
            GROUP BY o.id
            ORDER BY o.id
            "#,
        )
        .bind(&day)
        .fetch_all(&self.pool)
        .await?;

        if orders.is_empty() {
            return Ok(None);
        }

        let summary = summarize(&orders);
        info!(date = %day, orders = summary.total_orders, "Daily sales report built");

        Ok(Some(DailySalesReport {
            date,
            orders,
            summary,
        }))
    }

    /// Dishes sold from `today - days` through `today`, both ends inclusive
    /// (`days + 1` calendar days), ranked by quantity. `None` when nothing
    /// was sold.
    pub async fn top_items(
        &self,
        days: u32,
        limit: u32,
        today: NaiveDate,
    ) -> DbResult<Option<TopItemsReport>> {
        let from = today - Duration::days(i64::from(days));
        debug!(%from, to = %today, limit, "Building top items report");

        let items: Vec<TopItemRow> = sqlx::query_as(
            r#"
            SELECT
                oi.item_name AS name,
                mi.category AS category,
                SUM(oi.quantity) AS total_quantity,
                SUM(oi.quantity * oi.unit_price_cents) AS total_sales_cents
            FROM order_items oi
            JOIN orders o ON oi.order_id = o.id
            LEFT JOIN menu_items mi ON mi.name = oi.item_name
            WHERE date(o.created_at) BETWEEN ?1 AND ?2
            GROUP BY oi.item_name
            ORDER BY total_quantity DESC, oi.item_name ASC
            LIMIT ?3
            "#,
        )
        .bind(from.format("%Y-%m-%d").to_string())
        .bind(today.format("%Y-%m-%d").to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        if items.is_empty() {
            return Ok(None);
        }

        Ok(Some(TopItemsReport {
            days,
            from,
            to: today,
            items,
        }))
    }
}

fn summarize(orders: &[DailyOrderRow]) -> DailySummary {
    let total_sales: Money = orders.iter().map(|o| Money::from_cents(o.total_cents)).sum();
    let average = round_half_even(total_sales.cents() as i128, orders.len() as i128) as i64;

    DailySummary {
        total_orders: orders.len(),
        total_sales,
        average_order_value: Money::from_cents(average),
        payment_method_distribution: distribution(orders.iter().map(|o| o.payment_method)),
        order_type_distribution: distribution(orders.iter().map(|o| o.order_type)),
    }
}

/// Counts values, most frequent first; ties keep first-seen order.
fn distribution<T: PartialEq + Copy>(values: impl Iterator<Item = T>) -> Vec<(T, usize)> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

// =============================================================================
// CSV Export
// =============================================================================

async fn write_csv(path: PathBuf, data: Vec<u8>) -> DbResult<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(&path, data).await?;
    info!(path = %path.display(), "Report exported");
    Ok(path)
}

fn into_bytes(writer: csv::Writer<Vec<u8>>) -> DbResult<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()).into())
}

impl DailySalesReport {
    /// File name used by [`export_csv`](Self::export_csv).
    pub fn file_name(&self) -> String {
        format!("daily_sales_report_{}.csv", self.date.format("%Y-%m-%d"))
    }

    /// Writes one CSV row per order into `dir`. Returns the file path.
    pub async fn export_csv(&self, dir: &Path) -> DbResult<PathBuf> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for order in &self.orders {
            writer.serialize(DailyCsvRow {
                order_id: order.id,
                order_date: order.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                order_type: order.order_type.as_str(),
                subtotal: Money::from_cents(order.subtotal_cents).to_decimal_string(),
                tax: Money::from_cents(order.tax_cents).to_decimal_string(),
                discount: Money::from_cents(order.discount_cents).to_decimal_string(),
                total: Money::from_cents(order.total_cents).to_decimal_string(),
                payment_method: order.payment_method.as_str(),
                item_count: order.item_count,
            })?;
        }

        write_csv(dir.join(self.file_name()), into_bytes(writer)?).await
    }
}

impl TopItemsReport {
    pub fn file_name(&self) -> String {
        format!("top_items_report_{}days.csv", self.days)
    }

    /// Writes one CSV row per dish into `dir`. Returns the file path.
    pub async fn export_csv(&self, dir: &Path) -> DbResult<PathBuf> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for item in &self.items {
            writer.serialize(TopItemCsvRow {
                name: &item.name,
                category: item.category.as_deref().unwrap_or(""),
                total_quantity: item.total_quantity,
                total_sales: Money::from_cents(item.total_sales_cents).to_decimal_string(),
            })?;
        }

        write_csv(dir.join(self.file_name()), into_bytes(writer)?).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::store::{default_menu, MenuStore, OrderStore};
    use bistro_core::{compute_bill, DiscountRate, NewOrder, OrderLine, TaxRate};
    use chrono::TimeZone;

    fn line(name: &str, price: i64, qty: i64) -> OrderLine {
        OrderLine {
            item_name: name.to_string(),
            unit_price_cents: price,
            quantity: qty,
        }
    }

    async fn place(
        db: &Database,
        lines: Vec<OrderLine>,
        payment_method: PaymentMethod,
        created_at: DateTime<Utc>,
    ) {
        let order = NewOrder {
            order_type: OrderType::Takeaway,
            payment_method,
            table_number: None,
            summary: compute_bill(&lines, DiscountRate::none(), TaxRate::from_bps(500)),
            lines,
            created_at,
        };
        db.orders().commit_order(&order).await.unwrap();
    }

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.menu().seed_if_empty(&default_menu()).await.unwrap();

        let day = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        place(&db, vec![line("Idli", 4000, 2), line("Masala Dosa", 8000, 1)], PaymentMethod::Cash, day).await;
        place(&db, vec![line("Idli", 4000, 3)], PaymentMethod::Upi, day + Duration::hours(3)).await;
        place(&db, vec![line("Old Special", 9900, 1)], PaymentMethod::Cash, day + Duration::hours(5)).await;
        place(&db, vec![line("Veg Thali", 15000, 1)], PaymentMethod::Card, day - Duration::days(2)).await;
        db
    }

    #[tokio::test]
    async fn test_daily_sales() {
        let db = seeded().await;
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let report = db.reports().daily_sales(date).await.unwrap().unwrap();

        assert_eq!(report.orders.len(), 3);
        assert_eq!(report.orders[0].item_count, 2);
        // 168.00 + 126.00 + 103.95
        assert_eq!(report.summary.total_sales.cents(), 39795);
        assert_eq!(report.summary.average_order_value.cents(), 13265);
        assert_eq!(
            report.summary.payment_method_distribution,
            vec![(PaymentMethod::Cash, 2), (PaymentMethod::Upi, 1)]
        );
        assert_eq!(report.summary.order_type_distribution, vec![(OrderType::Takeaway, 3)]);
    }

    #[tokio::test]
    async fn test_daily_sales_empty_day() {
        let db = seeded().await;
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(db.reports().daily_sales(date).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_top_items() {
        let db = seeded().await;
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let report = db.reports().top_items(7, 5, today).await.unwrap().unwrap();

        assert_eq!(report.items.len(), 4);
        assert_eq!(report.items[0].name, "Idli");
        assert_eq!(report.items[0].category.as_deref(), Some("South Indian"));
        assert_eq!(report.items[0].total_quantity, 5);
        assert_eq!(report.items[0].total_sales_cents, 20000);

        let old = report.items.iter().find(|i| i.name == "Old Special").unwrap();
        assert_eq!(old.category, None);

        let limited = db.reports().top_items(1, 1, today).await.unwrap().unwrap();
        assert_eq!(limited.items.len(), 1);

        // the window reaches back exactly `days` days before today
        let thali = |r: &TopItemsReport| r.items.iter().any(|i| i.name == "Veg Thali");
        assert!(thali(&db.reports().top_items(2, 5, today).await.unwrap().unwrap()));
        assert!(!thali(&db.reports().top_items(1, 5, today).await.unwrap().unwrap()));

        let later = today + Duration::days(30);
        assert!(db.reports().top_items(7, 5, later).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exports() {
        let db = seeded().await;
        let dir = tempfile::tempdir().unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let daily = db.reports().daily_sales(today).await.unwrap().unwrap();
        let path = daily.export_csv(dir.path()).await.unwrap();
        assert!(path.ends_with("daily_sales_report_2026-10-19.csv"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(
            "order_id,order_date,order_type,subtotal,tax,discount,total,payment_method,item_count\n"
        ));
        assert!(text.contains("1,2026-10-19 09:00:00,Takeaway,160.00,8.00,0.00,168.00,Cash,2\n"));

        let top = db.reports().top_items(7, 5, today).await.unwrap().unwrap();
        let path = top.export_csv(&dir.path().join("reports")).await.unwrap();
        assert!(path.ends_with("top_items_report_7days.csv"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Idli,South Indian,5,200.00\n"));
    }
}
