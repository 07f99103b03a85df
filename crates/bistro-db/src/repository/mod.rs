//! # Repository Module
//!
//! Storage implementations for Bistro POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command / pipeline                                                     │
//! │       │                                                                 │
//! │       │  menu.upsert(item)      orders.commit_order(new_order)          │
//! │       ▼                                                                 │
//! │  MenuStore ─┬─ SqliteMenuStore    OrderStore ── OrderRepository         │
//! │             └─ CsvMenuStore                                             │
//! │       │                                                                 │
//! │       │  SQL / CSV                                                      │
//! │       ▼                                                                 │
//! │  bistro.db, menu.csv                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SqliteMenuStore`](menu::SqliteMenuStore) - Menu in the `menu_items` table
//! - [`CsvMenuStore`](menu_file::CsvMenuStore) - Menu in a flat CSV file
//! - [`OrderRepository`](order::OrderRepository) - Atomic order commits and lookups
//! - [`ReportRepository`](report::ReportRepository) - Daily and top items reports

pub mod menu;
pub mod menu_file;
pub mod order;
pub mod report;
