use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    LedgerError, NewTransaction, Result, SequenceId, StockTransaction,
    store::{LedgerStore, TransactionStream},
};

struct Inner {
    transactions: Vec<StockTransaction>,
    available: bool,
}

/// In-memory ledger store.
///
/// Holds the full transaction log in a Vec under a single lock, which
/// gives the global append serialization the ledger requires for free.
/// Suitable for tests and single-process deployments; the PostgreSQL
/// implementation provides the same interface with durability.
#[derive(Clone)]
pub struct InMemoryLedgerStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryLedgerStore {
    /// Creates a new empty in-memory ledger.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                transactions: Vec::new(),
                available: true,
            })),
        }
    }

    /// Returns the total number of transactions stored.
    pub async fn transaction_count(&self) -> usize {
        self.inner.read().await.transactions.len()
    }

    /// Toggles availability. While unavailable every operation fails with
    /// [`LedgerError::Unavailable`]; used to exercise storage-failure paths.
    pub async fn set_available(&self, available: bool) {
        self.inner.write().await.available = available;
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn append(&self, txn: NewTransaction) -> Result<StockTransaction> {
        let mut inner = self.inner.write().await;
        if !inner.available {
            return Err(LedgerError::Unavailable("in-memory store closed".into()));
        }

        // Sequence assignment and write happen under the same lock, so the
        // sequence is gapless and never handed out twice.
        let sequence_id = SequenceId::new(inner.transactions.len() as i64 + 1);
        let stored = txn.into_stored(sequence_id);
        inner.transactions.push(stored.clone());

        metrics::counter!("ledger_transactions_appended").increment(1);
        Ok(stored)
    }

    async fn list_since(&self, cursor: SequenceId) -> Result<TransactionStream> {
        use futures_util::stream;

        let inner = self.inner.read().await;
        if !inner.available {
            return Err(LedgerError::Unavailable("in-memory store closed".into()));
        }

        // The Vec is already in sequence order; sequence N lives at index N-1.
        let start = cursor.as_i64().max(0) as usize;
        let transactions: Vec<_> = inner.transactions.iter().skip(start).cloned().collect();

        Ok(Box::pin(stream::iter(transactions.into_iter().map(Ok))))
    }

    async fn head(&self) -> Result<SequenceId> {
        let inner = self.inner.read().await;
        if !inner.available {
            return Err(LedgerError::Unavailable("in-memory store closed".into()));
        }
        Ok(SequenceId::new(inner.transactions.len() as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransactionKind;
    use futures_util::StreamExt;

    fn draft(kind: TransactionKind, quantity: i64) -> NewTransaction {
        NewTransaction::new(kind, "SKU-001", "WH-1", quantity)
    }

    #[tokio::test]
    async fn append_assigns_increasing_gapless_sequence() {
        let store = InMemoryLedgerStore::new();

        let t1 = store
            .append(draft(TransactionKind::In, 10))
            .await
            .unwrap();
        let t2 = store.append(draft(TransactionKind::Out, 4)).await.unwrap();
        let t3 = store
            .append(draft(TransactionKind::Adjustment, -1))
            .await
            .unwrap();

        assert_eq!(t1.sequence_id, SequenceId::new(1));
        assert_eq!(t2.sequence_id, SequenceId::new(2));
        assert_eq!(t3.sequence_id, SequenceId::new(3));
        assert_eq!(store.head().await.unwrap(), SequenceId::new(3));
    }

    #[tokio::test]
    async fn concurrent_appends_never_share_a_sequence() {
        let store = InMemoryLedgerStore::new();

        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.append(draft(TransactionKind::In, 1)).await.unwrap()
            }));
        }

        let mut seqs: Vec<i64> = Vec::new();
        for handle in handles {
            seqs.push(handle.await.unwrap().sequence_id.as_i64());
        }
        seqs.sort_unstable();

        let expected: Vec<i64> = (1..=50).collect();
        assert_eq!(seqs, expected);
    }

    #[tokio::test]
    async fn list_since_resumes_from_cursor() {
        let store = InMemoryLedgerStore::new();
        for _ in 0..5 {
            store.append(draft(TransactionKind::In, 1)).await.unwrap();
        }

        let stream = store.list_since(SequenceId::new(3)).await.unwrap();
        let rest: Vec<_> = stream.map(|r| r.unwrap().sequence_id.as_i64()).collect().await;
        assert_eq!(rest, vec![4, 5]);

        let stream = store.list_since(SequenceId::start()).await.unwrap();
        let all: Vec<_> = stream.map(|r| r.unwrap().sequence_id.as_i64()).collect().await;
        assert_eq!(all, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn unavailable_store_fails_without_consuming_sequence() {
        let store = InMemoryLedgerStore::new();
        store.append(draft(TransactionKind::In, 10)).await.unwrap();

        store.set_available(false).await;
        let err = store.append(draft(TransactionKind::In, 1)).await;
        assert!(matches!(err, Err(LedgerError::Unavailable(_))));

        store.set_available(true).await;
        assert_eq!(store.head().await.unwrap(), SequenceId::new(1));
        let next = store.append(draft(TransactionKind::In, 1)).await.unwrap();
        assert_eq!(next.sequence_id, SequenceId::new(2));
    }

    #[tokio::test]
    async fn empty_ledger_head_is_start() {
        let store = InMemoryLedgerStore::new();
        assert_eq!(store.head().await.unwrap(), SequenceId::start());

        let stream = store.list_since(SequenceId::start()).await.unwrap();
        assert_eq!(stream.count().await, 0);
    }
}
