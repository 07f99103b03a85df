//! # Storage Capabilities
//!
//! The traits the rest of the system talks to. Each has more than one
//! backend, chosen from configuration at start-up.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Trait          Backends                      Used by                   │
//! │  ─────          ────────                      ───────                   │
//! │  MenuStore      SqliteMenuStore, CsvMenuStore menu commands, console    │
//! │  OrderStore     OrderRepository (SQLite)      OrderPipeline             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use bistro_core::{MenuItem, Money, NewOrder, Order, OrderLine, TaxRate, DEFAULT_TAX_RATE_BPS};

use crate::error::DbResult;

/// Name-keyed menu storage.
///
/// ## Contract
/// - Names are matched exactly (case-sensitive)
/// - No sequence of upserts ever leaves two items with the same name
/// - `load` returns items in the order they were first added
#[async_trait]
pub trait MenuStore: Send + Sync {
    /// Short backend label for logs (`sqlite`, `csv`).
    fn backend(&self) -> &'static str;

    /// Returns every item on the menu.
    async fn load(&self) -> DbResult<Vec<MenuItem>>;

    /// Looks an item up by its exact name.
    async fn find_by_name(&self, name: &str) -> DbResult<Option<MenuItem>>;

    /// Overwrites category, price and tax of the item with the same name,
    /// or appends it when the name is new.
    async fn upsert(&self, item: &MenuItem) -> DbResult<()>;

    /// Writes `defaults` only when the menu is empty. Returns how many
    /// items were written.
    async fn seed_if_empty(&self, defaults: &[MenuItem]) -> DbResult<usize>;
}

/// Durable order storage.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists the header and every line as one unit and returns the
    /// stored order with its new id.
    async fn commit_order(&self, order: &NewOrder) -> DbResult<Order>;

    async fn get_order(&self, id: i64) -> DbResult<Option<Order>>;

    /// Lines of an order in the order they were submitted.
    async fn get_lines(&self, order_id: i64) -> DbResult<Vec<OrderLine>>;

    async fn count_orders(&self) -> DbResult<i64>;

    async fn count_lines(&self) -> DbResult<i64>;
}

/// The sample menu written on first run.
pub fn default_menu() -> Vec<MenuItem> {
    let gst = TaxRate::from_bps(DEFAULT_TAX_RATE_BPS);
    [
        ("Masala Dosa", "South Indian", 80),
        ("Idli", "South Indian", 40),
        ("Veg Thali", "Meals", 150),
        ("Paneer Butter Masala", "North Indian", 180),
        ("Butter Naan", "North Indian", 30),
    ]
    .into_iter()
    .map(|(name, category, price)| {
        MenuItem::new(name, category, Money::from_major_minor(price, 0)).with_tax_rate(gst)
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_menu_has_unique_names() {
        let menu = default_menu();
        assert_eq!(menu.len(), 5);

        let mut names: Vec<_> = menu.iter().map(|i| i.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 5);

        assert_eq!(menu[0].price_cents, 8000);
        assert!(menu.iter().all(|i| i.tax_rate_bps == 500));
    }
}
