//! Shared identifier types used across the stock ledger workspace.

pub mod types;

pub use types::{CellKey, SequenceId, Sku, TransactionId, WarehouseCode};
