//! Read-only dashboard views over the aggregator and master-data counts.

pub mod counters;
pub mod summarizer;
pub mod threshold;

pub use common::{Sku, WarehouseCode};
pub use counters::{EntityCounters, EntityCounts};
pub use summarizer::{DashboardSummarizer, DashboardTotals, LowStockEntry};
pub use threshold::{DEFAULT_LOW_STOCK_THRESHOLD, ThresholdPolicy};
