use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    CellKey, GatewayError, MasterDataLookup, Result, SubmitRequest, ValidationError,
};
use aggregator::StockAggregator;
use ledger::{LedgerStore, NewTransaction, StockTransaction, TransactionKind};

/// Admits client-submitted transactions into the ledger.
///
/// Validation rules run in order, first failure wins:
/// 1. recognized `type`
/// 2. `product_sku` and `warehouse_code` reference existing master data
/// 3. `quantity` obeys the kind's sign rule
/// 4. a decrease must not drive the cell's on-hand negative
///
/// Rule 4, the append, and the aggregate apply form one admission unit
/// under a per-cell mutex, so two concurrent `out` submissions against the
/// same cell cannot both observe pre-decrement stock as sufficient.
/// Submissions against different cells admit fully in parallel.
pub struct TransactionGateway<S: LedgerStore, M: MasterDataLookup> {
    store: S,
    aggregator: StockAggregator,
    master_data: M,
    cell_locks: Mutex<HashMap<CellKey, Arc<Mutex<()>>>>,
}

impl<S: LedgerStore, M: MasterDataLookup> TransactionGateway<S, M> {
    /// Creates a gateway over a ledger store, an aggregator, and a
    /// master-data lookup.
    pub fn new(store: S, aggregator: StockAggregator, master_data: M) -> Self {
        Self {
            store,
            aggregator,
            master_data,
            cell_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the aggregator serving derived cells.
    pub fn aggregator(&self) -> &StockAggregator {
        &self.aggregator
    }

    /// Returns the underlying ledger store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates and admits one submission.
    ///
    /// On success the transaction is durable, sequenced, and folded into
    /// its cell. On any failure nothing is persisted: rejected submissions
    /// never consume a sequence number.
    #[tracing::instrument(skip(self, request), fields(kind = %request.kind))]
    pub async fn submit(&self, request: SubmitRequest) -> Result<StockTransaction> {
        let draft = self.validate(&request).await?;
        let key = draft.cell_key();

        // One admission unit per cell: sufficiency check, append, apply.
        let cell_lock = {
            let mut locks = self.cell_locks.lock().await;
            locks.entry(key.clone()).or_default().clone()
        };
        let _admission = cell_lock.lock().await;

        let delta = draft.delta();
        if delta < 0 {
            let cell = self
                .aggregator
                .get(&key.product_sku, &key.warehouse_code)
                .await;
            if cell.on_hand + delta < 0 {
                metrics::counter!("gateway_rejections", "kind" => "insufficient_stock")
                    .increment(1);
                return Err(ValidationError::InsufficientStock {
                    cell: key,
                    on_hand: cell.on_hand,
                    delta,
                }
                .into());
            }
        }

        let stored = self.store.append(draft).await?;
        self.aggregator.apply(&stored).await?;

        metrics::counter!("gateway_admissions").increment(1);
        tracing::debug!(sequence_id = %stored.sequence_id, cell = %key, "transaction admitted");
        Ok(stored)
    }

    /// Runs rules 1-3 and builds the timestamped draft.
    async fn validate(&self, request: &SubmitRequest) -> Result<NewTransaction> {
        let kind = TransactionKind::parse(&request.kind).ok_or_else(|| {
            metrics::counter!("gateway_rejections", "kind" => "unknown_type").increment(1);
            ValidationError::UnknownType {
                value: request.kind.clone(),
            }
        })?;

        let sku = crate::Sku::new(request.product_sku.as_str());
        if !self.master_data.product_exists(&sku).await {
            metrics::counter!("gateway_rejections", "kind" => "unknown_reference").increment(1);
            return Err(ValidationError::UnknownReference {
                field: "product_sku",
                value: request.product_sku.clone(),
            }
            .into());
        }

        let code = crate::WarehouseCode::new(request.warehouse_code.as_str());
        if !self.master_data.warehouse_exists(&code).await {
            metrics::counter!("gateway_rejections", "kind" => "unknown_reference").increment(1);
            return Err(ValidationError::UnknownReference {
                field: "warehouse_code",
                value: request.warehouse_code.clone(),
            }
            .into());
        }

        let valid_quantity = match kind {
            TransactionKind::In | TransactionKind::Out => request.quantity > 0,
            TransactionKind::Adjustment => request.quantity != 0,
        };
        if !valid_quantity {
            metrics::counter!("gateway_rejections", "kind" => "invalid_quantity").increment(1);
            return Err(ValidationError::InvalidQuantity {
                kind,
                quantity: request.quantity,
            }
            .into());
        }

        let mut draft = NewTransaction {
            id: ledger::TransactionId::new(),
            kind,
            product_sku: sku,
            warehouse_code: code,
            quantity: request.quantity,
            reference: request.reference.clone(),
            // Server-assigned; client timestamps are never trusted.
            recorded_at: Utc::now(),
        };
        if draft.reference.as_deref() == Some("") {
            draft.reference = None;
        }
        Ok(draft)
    }
}
