//! # bistro-core: Pure Business Logic for Bistro POS
//!
//! This crate is the **heart** of Bistro POS. It contains the bill math,
//! the in-progress order and the receipt text as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bistro POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    bistro (CLI / console)                       │   │
//! │  │    menu list ──► order place ──► receipt ──► reports            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bistro-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌──────┐ │   │
//! │  │   │  types  │  │  money  │  │  bill   │  │  order  │  │receipt│ │   │
//! │  │   │MenuItem │  │  Money  │  │ compute │  │  Order  │  │ text │ │   │
//! │  │   │ Order   │  │rounding │  │  _bill  │  │  Draft  │  │      │ │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └─────────┘  └──────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO FILES • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          bistro-db (SQLite, menu CSV) / bistro-ledger           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MenuItem, Order, OrderLine, rates, enums)
//! - [`money`] - Money type with integer arithmetic and half-even rounding
//! - [`bill`] - Subtotal, tax, discount and total for a set of lines
//! - [`order`] - The in-progress order at the till
//! - [`receipt`] - Plain-text receipt rendering
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use bistro_core::{compute_bill, DiscountRate, Money, OrderLine, TaxRate};
//!
//! let lines = vec![OrderLine {
//!     item_name: "Veg Thali".to_string(),
//!     unit_price_cents: 15000,
//!     quantity: 1,
//! }];
//!
//! let bill = compute_bill(&lines, DiscountRate::none(), TaxRate::from_bps(500));
//! assert_eq!(bill.total, Money::from_cents(15750));
//! ```

pub mod bill;
pub mod error;
pub mod money;
pub mod order;
pub mod receipt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use bill::{compute_bill, BillSummary};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::OrderDraft;
pub use receipt::{render_receipt, ReceiptOptions};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// House tax rate in basis points (5%), used when a menu row has none.
pub const DEFAULT_TAX_RATE_BPS: u32 = 500;

/// Maximum distinct lines in a single order.
pub const MAX_ORDER_LINES: usize = 100;

/// Highest menu price in cents (1,000,000.00).
///
/// With MAX_ITEM_QUANTITY and MAX_ORDER_LINES this keeps every subtotal far
/// inside i64 cents.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Maximum quantity of a single dish in an order.
///
/// ## Business Reason
/// Prevents accidental over-ordering (typing 100 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
