use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::{NewTransaction, Result, SequenceId, StockTransaction};

/// An ordered stream of stock transactions.
pub type TransactionStream = Pin<Box<dyn Stream<Item = Result<StockTransaction>> + Send>>;

/// Core trait for ledger store implementations.
///
/// A ledger store is a durable, ordered, append-only record of every
/// admitted transaction. All implementations must be thread-safe
/// (Send + Sync) and must serialize sequence assignment globally:
/// concurrent `append` calls observe a total order, and no two
/// transactions receive the same sequence number.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Appends a transaction, assigning the next sequence number
    /// atomically with the write.
    ///
    /// Returns the stored transaction carrying its assigned sequence.
    /// Fails with [`crate::LedgerError`] if persistence is unavailable;
    /// a failed append consumes no sequence number.
    async fn append(&self, txn: NewTransaction) -> Result<StockTransaction>;

    /// Streams transactions with `sequence_id > cursor` in sequence order.
    ///
    /// The stream is restartable: callers resume from the last sequence
    /// they saw. Used for aggregator catch-up, rebuild, and audit.
    async fn list_since(&self, cursor: SequenceId) -> Result<TransactionStream>;

    /// Returns the highest assigned sequence number, or
    /// [`SequenceId::start`] for an empty ledger.
    async fn head(&self) -> Result<SequenceId>;
}
