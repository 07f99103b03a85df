//! # SQLite Menu Store
//!
//! Menu items live in the `menu_items` table. The UNIQUE constraint on
//! `name` is what keeps the menu free of duplicates; upsert leans on it
//! with `ON CONFLICT(name) DO UPDATE`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use bistro_core::validation::validate_menu_item;
use bistro_core::MenuItem;

use crate::error::DbResult;
use crate::store::MenuStore;

/// Repository for menu items in SQLite.
#[derive(Debug, Clone)]
pub struct SqliteMenuStore {
    pool: SqlitePool,
}

impl SqliteMenuStore {
    /// Creates a new SqliteMenuStore.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteMenuStore { pool }
    }

    /// Number of items on the menu.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl MenuStore for SqliteMenuStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn load(&self) -> DbResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = sqlx::query_as(
            r#"
            SELECT name, category, price_cents, tax_rate_bps
            FROM menu_items
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = items.len(), "Loaded menu");
        Ok(items)
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Option<MenuItem>> {
        let item: Option<MenuItem> = sqlx::query_as(
            r#"
            SELECT name, category, price_cents, tax_rate_bps
            FROM menu_items
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn upsert(&self, item: &MenuItem) -> DbResult<()> {
        validate_menu_item(item)?;

        let now = Utc::now();
        debug!(name = %item.name, price_cents = item.price_cents, "Upserting menu item");

        sqlx::query(
            r#"
            INSERT INTO menu_items (
                name, category, price_cents, tax_rate_bps, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            ON CONFLICT(name) DO UPDATE SET
                category = excluded.category,
                price_cents = excluded.price_cents,
                tax_rate_bps = excluded.tax_rate_bps,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.price_cents)
        .bind(item.tax_rate_bps)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn seed_if_empty(&self, defaults: &[MenuItem]) -> DbResult<usize> {
        for item in defaults {
            validate_menu_item(item)?;
        }

        let mut tx = self.pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
            .fetch_one(&mut *tx)
            .await?;

        if existing > 0 {
            debug!(existing, "Menu already populated, skipping seed");
            return Ok(0);
        }

        let now = Utc::now();
        for item in defaults {
            sqlx::query(
                r#"
                INSERT INTO menu_items (
                    name, category, price_cents, tax_rate_bps, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                ON CONFLICT(name) DO NOTHING
                "#,
            )
            .bind(&item.name)
            .bind(&item.category)
            .bind(item.price_cents)
            .bind(item.tax_rate_bps)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(count = defaults.len(), "Seeded default menu");
        Ok(defaults.len())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::store::default_menu;
    use crate::DbError;
    use bistro_core::{Money, TaxRate};

    async fn store() -> SqliteMenuStore {
        Database::new(DbConfig::in_memory()).await.unwrap().menu()
    }

    #[tokio::test]
    async fn test_seed_if_empty_only_once() {
        let menu = store().await;

        assert_eq!(menu.seed_if_empty(&default_menu()).await.unwrap(), 5);
        assert_eq!(menu.seed_if_empty(&default_menu()).await.unwrap(), 0);
        assert_eq!(menu.count().await.unwrap(), 5);

        let items = menu.load().await.unwrap();
        assert_eq!(items[0].name, "Masala Dosa");
        assert_eq!(items[4].name, "Butter Naan");
    }

    #[tokio::test]
    async fn test_upsert_overwrites_existing_name() {
        let menu = store().await;
        menu.seed_if_empty(&default_menu()).await.unwrap();

        let updated = MenuItem::new("Idli", "Breakfast", Money::from_cents(4500))
            .with_tax_rate(TaxRate::from_bps(1200));
        menu.upsert(&updated).await.unwrap();

        assert_eq!(menu.count().await.unwrap(), 5);
        let idli = menu.find_by_name("Idli").await.unwrap().unwrap();
        assert_eq!(idli, updated);
    }

    #[tokio::test]
    async fn test_upsert_appends_new_name() {
        let menu = store().await;
        menu.seed_if_empty(&default_menu()).await.unwrap();

        menu.upsert(&MenuItem::new("Filter Coffee", "Beverage", Money::from_cents(2500)))
            .await
            .unwrap();

        assert_eq!(menu.count().await.unwrap(), 6);
        assert_eq!(menu.load().await.unwrap()[5].name, "Filter Coffee");
    }

    #[tokio::test]
    async fn test_names_are_case_sensitive() {
        let menu = store().await;
        menu.upsert(&MenuItem::new("Idli", "", Money::from_cents(4000)))
            .await
            .unwrap();
        menu.upsert(&MenuItem::new("idli", "", Money::from_cents(4100)))
            .await
            .unwrap();

        assert_eq!(menu.count().await.unwrap(), 2);
        assert!(menu.find_by_name("IDLI").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_rejects_negative_price() {
        let menu = store().await;
        let mut item = MenuItem::new("Refund", "", Money::zero());
        item.price_cents = -100;

        assert!(matches!(menu.upsert(&item).await, Err(DbError::Invalid(_))));
        assert_eq!(menu.count().await.unwrap(), 0);
    }
}
