//! Unified error types for the ledger.
//!
//! Every failure a caller can recover from is a variant here. Permission
//! failures on directory operations are not errors; they come back as
//! [`crate::core::directory::DirectoryOutcome`] values.

use thiserror::Error;

/// All errors produced by the ledger.
#[derive(Debug, Error)]
pub enum Error {
    /// The cart was asked to take the current item but none has been inspected
    #[error("No item has been selected")]
    NoItemSelected,

    /// An operation that charges a member was attempted with no member logged in
    #[error("No member is logged in")]
    NotLoggedIn,

    /// The inspected item showed no stock when it was added to the cart
    #[error("Item '{barcode}' is out of stock")]
    OutOfStock {
        /// Barcode of the item
        barcode: String,
    },

    /// The cart already holds its maximum number of entries
    #[error("Cart is full (capacity {capacity})")]
    CapacityExceeded {
        /// Configured cart capacity
        capacity: usize,
    },

    /// Malformed or out-of-range input
    #[error("Invalid input: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// The record store could not complete the request
    #[error("Record store unavailable: {message}")]
    StoreUnavailable {
        /// Underlying failure
        message: String,
    },

    /// Configuration could not be read or is inconsistent
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Console I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether this error came from the persistence layer rather than from the
    /// caller's input or the session state.
    #[must_use]
    pub const fn is_store_failure(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }
}

impl From<sea_orm::DbErr> for Error {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::StoreUnavailable {
            message: value.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
