//! Transaction admission.
//!
//! The gateway is the only entry point by which a client-submitted
//! transaction becomes durable: it validates the raw request against the
//! ordered rule set, then runs the stock-sufficiency check, ledger append,
//! and aggregate application as one admission unit under a per-cell lock.

pub mod error;
pub mod gateway;
pub mod masterdata;
pub mod request;

pub use common::{CellKey, SequenceId, Sku, WarehouseCode};
pub use error::{GatewayError, Result, ValidationError};
pub use gateway::TransactionGateway;
pub use masterdata::MasterDataLookup;
pub use request::SubmitRequest;
