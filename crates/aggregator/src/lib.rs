//! Derived stock levels.
//!
//! The aggregator owns the table of [`StockCell`]s, folding admitted ledger
//! transactions into current `on_hand` per (product, warehouse). It applies
//! incrementally on the write path and can rebuild the whole table from the
//! ledger, which is the authoritative recovery path after a crash or
//! corruption of cached aggregates.

pub mod aggregator;
pub mod cell;
pub mod error;

pub use aggregator::StockAggregator;
pub use cell::StockCell;
pub use common::{CellKey, SequenceId, Sku, WarehouseCode};
pub use error::{AggregatorError, Result};
