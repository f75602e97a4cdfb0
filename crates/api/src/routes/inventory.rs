//! Stock transaction submission and stock level endpoints.

use std::sync::Arc;

use aggregator::StockCell;
use axum::Json;
use axum::extract::State;
use dashboard::DashboardSummarizer;
use gateway::{SubmitRequest, TransactionGateway};
use ledger::{LedgerStore, StockTransaction};

use crate::error::ApiError;
use crate::masterdata::InMemoryMasterData;

/// Shared application state accessible from all handlers.
pub struct AppState<S: LedgerStore> {
    pub gateway: TransactionGateway<S, InMemoryMasterData>,
    pub summarizer: DashboardSummarizer<InMemoryMasterData>,
    pub master_data: InMemoryMasterData,
}

/// POST /inventory/transactions — submit a stock transaction for admission.
///
/// Returns the stored transaction, including its assigned `sequence_id`,
/// on success. Validation failures return 400 (409 for insufficient stock)
/// and consume no sequence number.
#[tracing::instrument(skip(state, req))]
pub async fn submit_transaction<S: LedgerStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<SubmitRequest>,
) -> Result<(axum::http::StatusCode, Json<StockTransaction>), ApiError> {
    let stored = state.gateway.submit(req).await?;
    Ok((axum::http::StatusCode::CREATED, Json(stored)))
}

/// GET /inventory/stock — returns all cells with nonzero on-hand or
/// reserved, ordered by product SKU then warehouse code.
///
/// Cells drained to zero drop out of this view; they still feed the
/// dashboard's low-stock list.
#[tracing::instrument(skip(state))]
pub async fn list_stock<S: LedgerStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<Vec<StockCell>> {
    Json(state.gateway.aggregator().list().await)
}
