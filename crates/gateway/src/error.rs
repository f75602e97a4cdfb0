use thiserror::Error;

use crate::CellKey;
use aggregator::AggregatorError;
use ledger::{LedgerError, TransactionKind};

/// A submission the caller can fix and resubmit. Never retried
/// automatically, never used for normal control flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `type` is not one of the recognized kinds.
    #[error("unknown transaction type {value:?}")]
    UnknownType { value: String },

    /// `product_sku` or `warehouse_code` references no master-data record.
    #[error("unknown {field} {value:?}")]
    UnknownReference { field: &'static str, value: String },

    /// `quantity` violates the sign rule for the submitted kind.
    #[error("invalid quantity {quantity} for transaction type {kind}")]
    InvalidQuantity {
        kind: TransactionKind,
        quantity: i64,
    },

    /// The decrease would drive the cell's on-hand negative.
    #[error("insufficient stock for {cell}: on_hand {on_hand}, requested delta {delta}")]
    InsufficientStock {
        cell: CellKey,
        on_hand: i64,
        delta: i64,
    },
}

/// Errors surfaced by transaction admission.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The submission failed a validation rule; nothing was persisted.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The ledger store is unavailable; the admission failed with no
    /// partial state (no sequence consumed, no aggregate mutated).
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// The aggregator failed to fold the appended transaction.
    #[error("aggregator error: {0}")]
    Aggregator(#[from] AggregatorError),
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
