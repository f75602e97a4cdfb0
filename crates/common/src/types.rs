use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product identifier (SKU).
///
/// Wraps a string to provide type safety and prevent mixing up
/// SKUs with other string-based identifiers such as warehouse codes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Creates a SKU from a string.
    pub fn new(sku: impl Into<String>) -> Self {
        Self(sku.into())
    }

    /// Returns the SKU as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Sku {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Sku {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Warehouse identifier (code).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WarehouseCode(String);

impl WarehouseCode {
    /// Creates a warehouse code from a string.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WarehouseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WarehouseCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WarehouseCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for WarehouseCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Key of a stock cell: one product in one warehouse.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub product_sku: Sku,
    pub warehouse_code: WarehouseCode,
}

impl CellKey {
    /// Creates a cell key from a SKU and a warehouse code.
    pub fn new(product_sku: impl Into<Sku>, warehouse_code: impl Into<WarehouseCode>) -> Self {
        Self {
            product_sku: product_sku.into(),
            warehouse_code: warehouse_code.into(),
        }
    }
}

impl std::fmt::Display for CellKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.product_sku, self.warehouse_code)
    }
}

/// Ledger sequence number.
///
/// Assigned by the ledger store at append time, strictly increasing and
/// gapless across admitted transactions. Sequence order is the ledger's
/// canonical history order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SequenceId(i64);

impl SequenceId {
    /// Creates a sequence ID from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the zero cursor, before the first admitted transaction.
    pub fn start() -> Self {
        Self(0)
    }

    /// Returns the next sequence ID.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for SequenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SequenceId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<SequenceId> for i64 {
    fn from(id: SequenceId) -> Self {
        id.0
    }
}

/// Unique identifier for a stock transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Creates a new random transaction ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a transaction ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for TransactionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<TransactionId> for Uuid {
    fn from(id: TransactionId) -> Self {
        id.0
    }
}
