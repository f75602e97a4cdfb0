use thiserror::Error;

use crate::{CellKey, SequenceId};
use ledger::LedgerError;

/// Errors that can occur while maintaining derived stock cells.
#[derive(Debug, Error)]
pub enum AggregatorError {
    /// An error occurred reading the ledger during rebuild.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Applying a transaction would drive a cell's on-hand negative.
    ///
    /// Raised by `rebuild` when replay produces negative stock, which
    /// indicates a historical admission bug. Fatal to the rebuild and
    /// reported, never clamped.
    #[error(
        "negative on_hand for cell {cell} applying sequence {sequence_id}: would become {on_hand}"
    )]
    NegativeOnHand {
        cell: CellKey,
        sequence_id: SequenceId,
        on_hand: i64,
    },
}

/// Result type for aggregator operations.
pub type Result<T> = std::result::Result<T, AggregatorError>;
