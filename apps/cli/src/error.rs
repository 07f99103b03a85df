//! # Order Errors
//!
//! What `place_order` can report back to the till.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Source                        OrderError           Persisted?          │
//! │  ──────                        ──────────           ──────────          │
//! │  no lines                      EmptyOrder           nothing             │
//! │  bad / missing table           InvalidTable         nothing             │
//! │  bad quantity or price         Invalid              nothing             │
//! │  commit failed                 Storage              rolled back         │
//! │  auxiliary sink failed         (not an error)       order stays         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bistro_core::CoreError;
use bistro_db::DbError;
use thiserror::Error;

/// Why an order was not placed.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Cannot place an empty order")]
    EmptyOrder,

    #[error("Invalid table number: {reason}")]
    InvalidTable { reason: String },

    /// Any other rule violation (quantity, price, order size).
    #[error(transparent)]
    Invalid(CoreError),

    #[error("Failed to save order: {0}")]
    Storage(#[from] DbError),
}

impl From<CoreError> for OrderError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyOrder => OrderError::EmptyOrder,
            CoreError::InvalidTable { reason } => OrderError::InvalidTable { reason },
            other => OrderError::Invalid(other),
        }
    }
}

impl OrderError {
    /// Whether the cashier can fix this by changing the order.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, OrderError::Storage(_))
    }
}
