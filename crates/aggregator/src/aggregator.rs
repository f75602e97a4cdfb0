use std::collections::HashMap;
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::RwLock;

use crate::{AggregatorError, CellKey, Result, SequenceId, Sku, StockCell, WarehouseCode};
use ledger::{LedgerStore, StockTransaction};

/// Per-cell state tracked alongside the quantities.
#[derive(Debug, Clone, Default)]
struct CellState {
    on_hand: i64,
    reserved: i64,
    /// Highest sequence folded into this cell. Admission is serialized per
    /// cell, so sequence order within a cell is total and `seq <=
    /// last_applied` is an exact duplicate test.
    last_applied: SequenceId,
}

/// Maintains and serves current [`StockCell`] values.
///
/// Cells are created lazily on first transaction and never deleted; a cell
/// that reaches zero persists. The whole table sits behind one `RwLock`:
/// `apply` takes a write guard (serializing same-cell applies), reads share,
/// and `rebuild` holds the guard for its full duration so replay never
/// interleaves with incremental application.
#[derive(Clone)]
pub struct StockAggregator {
    cells: Arc<RwLock<HashMap<CellKey, CellState>>>,
}

impl StockAggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self {
            cells: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Folds one admitted transaction's signed delta into its cell.
    ///
    /// Idempotent on `sequence_id`: re-applying a sequence the cell has
    /// already seen is a no-op, which makes crash-recovery replay from the
    /// ledger safe.
    pub async fn apply(&self, txn: &StockTransaction) -> Result<()> {
        let key = txn.cell_key();
        let mut cells = self.cells.write().await;
        let state = cells.entry(key.clone()).or_default();

        if txn.sequence_id <= state.last_applied {
            return Ok(());
        }

        let next = state.on_hand + txn.delta();
        if next < 0 {
            return Err(AggregatorError::NegativeOnHand {
                cell: key,
                sequence_id: txn.sequence_id,
                on_hand: next,
            });
        }

        state.on_hand = next;
        state.last_applied = txn.sequence_id;
        metrics::counter!("aggregator_transactions_applied").increment(1);
        Ok(())
    }

    /// Returns the cell for a key.
    ///
    /// Keys no transaction has touched yield a transient zero cell; nothing
    /// is persisted for them.
    pub async fn get(&self, sku: &Sku, code: &WarehouseCode) -> StockCell {
        let key = CellKey {
            product_sku: sku.clone(),
            warehouse_code: code.clone(),
        };
        let cells = self.cells.read().await;
        match cells.get(&key) {
            Some(state) => StockCell {
                product_sku: key.product_sku,
                warehouse_code: key.warehouse_code,
                on_hand: state.on_hand,
                reserved: state.reserved,
            },
            None => StockCell::empty(key),
        }
    }

    /// Returns all cells with nonzero `on_hand` or `reserved`, ordered by
    /// (product_sku, warehouse_code) for stable listings.
    pub async fn list(&self) -> Vec<StockCell> {
        let cells = self.cells.read().await;
        let mut out: Vec<StockCell> = cells
            .iter()
            .filter(|(_, state)| state.on_hand != 0 || state.reserved != 0)
            .map(|(key, state)| StockCell {
                product_sku: key.product_sku.clone(),
                warehouse_code: key.warehouse_code.clone(),
                on_hand: state.on_hand,
                reserved: state.reserved,
            })
            .collect();
        out.sort_by(|a, b| {
            a.product_sku
                .cmp(&b.product_sku)
                .then_with(|| a.warehouse_code.cmp(&b.warehouse_code))
        });
        out
    }

    /// Returns every persisted cell, including those that have drained to
    /// zero. Cells are never deleted, so a product that sold out still
    /// shows up here (and in low-stock views built on top).
    pub async fn list_all(&self) -> Vec<StockCell> {
        let cells = self.cells.read().await;
        let mut out: Vec<StockCell> = cells
            .iter()
            .map(|(key, state)| StockCell {
                product_sku: key.product_sku.clone(),
                warehouse_code: key.warehouse_code.clone(),
                on_hand: state.on_hand,
                reserved: state.reserved,
            })
            .collect();
        out.sort_by(|a, b| {
            a.product_sku
                .cmp(&b.product_sku)
                .then_with(|| a.warehouse_code.cmp(&b.warehouse_code))
        });
        out
    }

    /// Counts cells with nonzero `on_hand` or `reserved` (the dashboard's
    /// `stock_items` total).
    pub async fn nonzero_count(&self) -> usize {
        let cells = self.cells.read().await;
        cells
            .values()
            .filter(|state| state.on_hand != 0 || state.reserved != 0)
            .count()
    }

    /// Sets the reserved quantity for a cell, creating it if needed.
    ///
    /// Boundary hook for the out-of-scope reservation subsystem. The
    /// `reserved <= on_hand` target invariant is the caller's to uphold;
    /// the aggregator stores and serves the value as-is.
    pub async fn set_reserved(&self, sku: &Sku, code: &WarehouseCode, reserved: i64) {
        let key = CellKey {
            product_sku: sku.clone(),
            warehouse_code: code.clone(),
        };
        let mut cells = self.cells.write().await;
        cells.entry(key).or_default().reserved = reserved;
    }

    /// Recomputes every cell from scratch by replaying the ledger.
    ///
    /// Holds the table lock for the whole replay (stop-the-world) and only
    /// swaps the new table in on success, so a failed rebuild leaves the
    /// previous state untouched. Reserved quantities are carried over from
    /// the existing table since they do not derive from the ledger.
    #[tracing::instrument(skip(self, store))]
    pub async fn rebuild(&self, store: &dyn LedgerStore) -> Result<()> {
        let mut cells = self.cells.write().await;

        // Seed with existing cells so reserved quantities and zero cells
        // survive; on-hand is recomputed from the ledger alone.
        let mut rebuilt: HashMap<CellKey, CellState> = cells
            .iter()
            .map(|(key, state)| {
                (
                    key.clone(),
                    CellState {
                        on_hand: 0,
                        reserved: state.reserved,
                        last_applied: SequenceId::start(),
                    },
                )
            })
            .collect();

        let mut stream = store.list_since(SequenceId::start()).await?;
        let mut replayed: u64 = 0;
        while let Some(result) = stream.next().await {
            let txn = result?;
            let state = rebuilt.entry(txn.cell_key()).or_default();

            let next = state.on_hand + txn.delta();
            if next < 0 {
                return Err(AggregatorError::NegativeOnHand {
                    cell: txn.cell_key(),
                    sequence_id: txn.sequence_id,
                    on_hand: next,
                });
            }
            state.on_hand = next;
            state.last_applied = txn.sequence_id;
            replayed += 1;
        }

        *cells = rebuilt;
        metrics::counter!("aggregator_rebuilds").increment(1);
        tracing::info!(transactions_replayed = replayed, "rebuild complete");
        Ok(())
    }
}

impl Default for StockAggregator {
    fn default() -> Self {
        Self::new()
    }
}
