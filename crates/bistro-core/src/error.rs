//! # Error Types
//!
//! Domain-specific error types for bistro-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bistro-core errors (this file)                                         │
//! │  ├── CoreError        - Order rules (EmptyOrder, InvalidTable, ...)     │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  bistro-db errors     └── DbError      - storage failures               │
//! │  bistro-ledger errors └── LedgerError  - auxiliary file failures        │
//! │  bistro-cli errors    └── OrderError   - what place_order returns       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Order rule violations, detected before anything is persisted.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No lines were submitted.
    #[error("Cannot place an empty order")]
    EmptyOrder,

    /// Dine-in order without a usable table number.
    ///
    /// ## When This Occurs
    /// - Table number missing
    /// - Table number zero or negative
    /// - Table number text that is not an integer
    #[error("Invalid table number: {reason}")]
    InvalidTable { reason: String },

    /// The named item is not on the menu.
    #[error("Menu item not found: {0}")]
    ItemNotFound(String),

    /// The named item is not part of the in-progress order.
    #[error("{0} is not in the current order")]
    NotInOrder(String),

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Order has exceeded maximum allowed lines.
    #[error("An order cannot have more than {max} lines")]
    OrderTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    pub fn invalid_table(reason: impl Into<String>) -> Self {
        CoreError::InvalidTable {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. not a number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
