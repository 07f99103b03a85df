//! # Database Migrations
//!
//! Embedded schema migrations for the SQLite store.
//!
//! ## Migration Files
//! ```text
//! migrations/sqlite/
//! └── 001_initial_schema.sql   menu_items, orders, order_items
//! ```
//!
//! The files are compiled into the binary with `sqlx::migrate!`, so a fresh
//! install needs nothing but the database path.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Migrations embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations.
///
/// Idempotent: safe to run on every start.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)` for diagnostics.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}
