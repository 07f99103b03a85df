//! # bistro-db: Storage Layer for Bistro POS
//!
//! This crate provides durable storage for the Bistro POS system: orders
//! and the menu in SQLite (via sqlx), and an alternative flat-file menu.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bistro POS Data Flow                             │
//! │                                                                         │
//! │  OrderPipeline::place_order / menu commands / reports                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     bistro-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ SqliteMenu    │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ OrderRepo     │    │ 001_initial  │  │   │
//! │  │   │               │    │ ReportRepo    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                         CsvMenuStore ──► menu.csv              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/bistro.db                                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`store`] - `MenuStore` / `OrderStore` traits and the default menu
//! - [`error`] - Storage error types
//! - [`repository`] - Backend implementations and reports
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bistro_db::{Database, DbConfig, MenuStore, OrderStore};
//!
//! let db = Database::new(DbConfig::new("data/bistro.db")).await?;
//! db.menu().seed_if_empty(&bistro_db::default_menu()).await?;
//!
//! let order = db.orders().commit_order(&new_order).await?;
//! let lines = db.orders().get_lines(order.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use store::{default_menu, MenuStore, OrderStore};

// Repository re-exports for convenience
pub use repository::menu::SqliteMenuStore;
pub use repository::menu_file::CsvMenuStore;
pub use repository::order::OrderRepository;
pub use repository::report::{
    DailyOrderRow, DailySalesReport, DailySummary, ReportRepository, TopItemRow, TopItemsReport,
};
