//! Append-only ledger of stock transactions.
//!
//! The ledger is the source of truth for stock movement. Every admitted
//! transaction is recorded with a store-assigned, strictly increasing,
//! gapless sequence number; sequence order is the canonical history order.
//! The store only persists — derived quantities live in the aggregator.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod transaction;

pub use common::{CellKey, SequenceId, Sku, TransactionId, WarehouseCode};
pub use error::{LedgerError, Result};
pub use memory::InMemoryLedgerStore;
pub use postgres::PostgresLedgerStore;
pub use store::{LedgerStore, TransactionStream};
pub use transaction::{NewTransaction, StockTransaction, TransactionKind};
