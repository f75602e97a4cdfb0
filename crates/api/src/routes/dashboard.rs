//! Dashboard summary endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use dashboard::{DashboardTotals, LowStockEntry};
use ledger::LedgerStore;
use serde::Serialize;

use crate::routes::inventory::AppState;

#[derive(Serialize)]
pub struct DashboardResponse {
    pub totals: DashboardTotals,
    pub low_stock: Vec<LowStockEntry>,
}

/// GET /dashboard — entity totals plus the low-stock list at the
/// configured threshold.
#[tracing::instrument(skip(state))]
pub async fn get<S: LedgerStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<DashboardResponse> {
    let totals = state.summarizer.totals().await;
    let low_stock = state.summarizer.low_stock_configured().await;
    Json(DashboardResponse { totals, low_stock })
}
