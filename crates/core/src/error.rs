//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger layer.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Validation and not-found variants are deterministic business failures and
/// must surface to the caller as non-fatal, user-visible conditions.
/// `StorageUnavailable` is the only infrastructure variant: every failure of
/// the backing tabular store maps into it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A quantity or count failed validation (negative, zero where a positive
    /// value is required, or out of range).
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// No stock entry matched the requested medicine name.
    #[error("medicine not found: {0}")]
    MedicineNotFound(String),

    /// The matched stock entry has zero quantity on hand.
    #[error("stock exhausted: {0}")]
    StockExhausted(String),

    /// The matched stock entry holds less than the requested count.
    #[error("insufficient stock for {name}: requested {requested}, available {available}")]
    InsufficientStock {
        name: String,
        requested: u32,
        available: u32,
    },

    /// The backing store could not be reached, timed out, or returned a
    /// malformed table.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// No dispatch record matched the given identifier.
    #[error("dispatch record not found: {0}")]
    RecordNotFound(String),
}

impl LedgerError {
    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn medicine_not_found(name: impl Into<String>) -> Self {
        Self::MedicineNotFound(name.into())
    }

    pub fn stock_exhausted(name: impl Into<String>) -> Self {
        Self::StockExhausted(name.into())
    }

    pub fn storage_unavailable(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    pub fn record_not_found(id: impl Into<String>) -> Self {
        Self::RecordNotFound(id.into())
    }

    /// Whether retrying the same call could possibly succeed.
    ///
    /// Only storage failures qualify; every other variant is deterministic.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}
