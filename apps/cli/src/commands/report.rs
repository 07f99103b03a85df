//! `bistro report`
//!
//! Prints a report and writes the same rows as CSV into the reports
//! directory.

use chrono::{NaiveDate, Utc};
use std::io::Write;

use bistro_core::Money;

use crate::state::AppState;

pub async fn daily(state: &AppState, date: Option<NaiveDate>, out: &mut impl Write) -> anyhow::Result<()> {
    let date = date.unwrap_or_else(|| Utc::now().date_naive());
    let symbol = &state.config.store.currency_symbol;

    let Some(report) = state.reports().daily_sales(date).await? else {
        writeln!(out, "No orders found for {}", date)?;
        return Ok(());
    };

    writeln!(out, "Daily Sales Report: {}", report.date)?;
    writeln!(out, "{}", "-".repeat(40))?;
    for row in &report.orders {
        writeln!(
            out,
            "#{:<6} {}  {:<8} {:>12}  {:<4}  {} items",
            row.id,
            row.created_at.format("%H:%M:%S"),
            row.order_type,
            Money::from_cents(row.total_cents).format_with_symbol(symbol),
            row.payment_method,
            row.item_count,
        )?;
    }

    let summary = &report.summary;
    writeln!(out, "{}", "-".repeat(40))?;
    writeln!(out, "Total orders: {}", summary.total_orders)?;
    writeln!(out, "Total sales: {}", summary.total_sales.format_with_symbol(symbol))?;
    writeln!(
        out,
        "Average order value: {}",
        summary.average_order_value.format_with_symbol(symbol)
    )?;
    for (method, count) in &summary.payment_method_distribution {
        writeln!(out, "  {}: {}", method, count)?;
    }
    for (order_type, count) in &summary.order_type_distribution {
        writeln!(out, "  {}: {}", order_type, count)?;
    }

    let path = report.export_csv(&state.config.reports_dir()).await?;
    writeln!(out, "Report exported to {}", path.display())?;
    Ok(())
}

pub async fn top_items(state: &AppState, days: u32, limit: u32, out: &mut impl Write) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();
    let symbol = &state.config.store.currency_symbol;

    let Some(report) = state.reports().top_items(days, limit, today).await? else {
        writeln!(out, "No sales in the last {} days", days)?;
        return Ok(());
    };

    writeln!(out, "Top {} items, {} to {}", report.items.len(), report.from, report.to)?;
    for (rank, item) in report.items.iter().enumerate() {
        writeln!(
            out,
            "{:>2}. {:<24} {:<14} {:>5}  {:>12}",
            rank + 1,
            item.name,
            item.category.as_deref().unwrap_or("-"),
            item.total_quantity,
            Money::from_cents(item.total_sales_cents).format_with_symbol(symbol),
        )?;
    }

    let path = report.export_csv(&state.config.reports_dir()).await?;
    writeln!(out, "Report exported to {}", path.display())?;
    Ok(())
}
