use async_trait::async_trait;
use serde::Serialize;

/// Plain entity counts owned by out-of-scope master-data stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub products: usize,
    pub customers: usize,
    pub suppliers: usize,
    pub open_sales_orders: usize,
    pub invoices: usize,
    pub payments: usize,
}

/// Supplies the dashboard's non-stock totals.
///
/// Implemented by whatever holds the master-data and document stores;
/// the dashboard only ever sees the counts.
#[async_trait]
pub trait EntityCounters: Send + Sync {
    /// Current counts of each entity.
    async fn counts(&self) -> EntityCounts;
}
