use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CellKey, SequenceId, Sku, TransactionId, WarehouseCode};

/// Kind of a stock transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Stock received into a warehouse. Quantity must be positive.
    In,
    /// Stock issued out of a warehouse. Quantity must be positive and is
    /// applied as a decrease.
    Out,
    /// Manual correction. Quantity is a signed, non-zero delta.
    Adjustment,
}

impl TransactionKind {
    /// Returns the wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::In => "in",
            TransactionKind::Out => "out",
            TransactionKind::Adjustment => "adjustment",
        }
    }

    /// Parses a wire name into a kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(TransactionKind::In),
            "out" => Some(TransactionKind::Out),
            "adjustment" => Some(TransactionKind::Adjustment),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stock transaction accepted for appending but not yet sequenced.
///
/// The ledger store assigns the sequence number atomically with the write;
/// clients never supply one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Unique identifier for this transaction.
    pub id: TransactionId,

    /// Kind of movement.
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Product the movement applies to.
    pub product_sku: Sku,

    /// Warehouse the movement applies to.
    pub warehouse_code: WarehouseCode,

    /// Quantity as submitted. Sign conventions depend on `kind`.
    pub quantity: i64,

    /// Optional free-text reference (PO number, note, ...).
    pub reference: Option<String>,

    /// When the transaction was admitted.
    pub recorded_at: DateTime<Utc>,
}

impl NewTransaction {
    /// Creates a transaction draft with a fresh ID and the current time.
    pub fn new(
        kind: TransactionKind,
        product_sku: impl Into<Sku>,
        warehouse_code: impl Into<WarehouseCode>,
        quantity: i64,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            kind,
            product_sku: product_sku.into(),
            warehouse_code: warehouse_code.into(),
            quantity,
            reference: None,
            recorded_at: Utc::now(),
        }
    }

    /// Attaches a free-text reference.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Returns the signed delta this transaction applies to its cell.
    pub fn delta(&self) -> i64 {
        match self.kind {
            TransactionKind::In => self.quantity,
            TransactionKind::Out => -self.quantity,
            TransactionKind::Adjustment => self.quantity,
        }
    }

    /// Returns the key of the stock cell this transaction targets.
    pub fn cell_key(&self) -> CellKey {
        CellKey {
            product_sku: self.product_sku.clone(),
            warehouse_code: self.warehouse_code.clone(),
        }
    }

    /// Promotes the draft to a stored transaction with its assigned sequence.
    pub fn into_stored(self, sequence_id: SequenceId) -> StockTransaction {
        StockTransaction {
            id: self.id,
            sequence_id,
            kind: self.kind,
            product_sku: self.product_sku,
            warehouse_code: self.warehouse_code,
            quantity: self.quantity,
            reference: self.reference,
            recorded_at: self.recorded_at,
        }
    }
}

/// An admitted, immutable stock transaction.
///
/// Corrections are new transactions, never edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockTransaction {
    /// Unique identifier for this transaction.
    pub id: TransactionId,

    /// Store-assigned position in the ledger's total order.
    pub sequence_id: SequenceId,

    /// Kind of movement.
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Product the movement applies to.
    pub product_sku: Sku,

    /// Warehouse the movement applies to.
    pub warehouse_code: WarehouseCode,

    /// Quantity as submitted. Sign conventions depend on `kind`.
    pub quantity: i64,

    /// Optional free-text reference.
    pub reference: Option<String>,

    /// When the transaction was admitted.
    pub recorded_at: DateTime<Utc>,
}

impl StockTransaction {
    /// Returns the signed delta this transaction applies to its cell.
    pub fn delta(&self) -> i64 {
        match self.kind {
            TransactionKind::In => self.quantity,
            TransactionKind::Out => -self.quantity,
            TransactionKind::Adjustment => self.quantity,
        }
    }

    /// Returns the key of the stock cell this transaction targets.
    pub fn cell_key(&self) -> CellKey {
        CellKey {
            product_sku: self.product_sku.clone(),
            warehouse_code: self.warehouse_code.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_wire_names_roundtrip() {
        for kind in [
            TransactionKind::In,
            TransactionKind::Out,
            TransactionKind::Adjustment,
        ] {
            assert_eq!(TransactionKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(TransactionKind::parse("transfer"), None);
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&TransactionKind::Adjustment).unwrap();
        assert_eq!(json, "\"adjustment\"");
    }

    #[test]
    fn delta_sign_conventions() {
        let txn = NewTransaction::new(TransactionKind::In, "SKU-1", "WH-1", 5);
        assert_eq!(txn.delta(), 5);

        let txn = NewTransaction::new(TransactionKind::Out, "SKU-1", "WH-1", 5);
        assert_eq!(txn.delta(), -5);

        let txn = NewTransaction::new(TransactionKind::Adjustment, "SKU-1", "WH-1", -3);
        assert_eq!(txn.delta(), -3);
    }

    #[test]
    fn transaction_json_uses_wire_field_names() {
        let txn = NewTransaction::new(TransactionKind::In, "SKU-1", "WH-1", 5)
            .with_reference("PO-42")
            .into_stored(SequenceId::new(1));

        let value = serde_json::to_value(&txn).unwrap();
        assert_eq!(value["type"], "in");
        assert_eq!(value["product_sku"], "SKU-1");
        assert_eq!(value["warehouse_code"], "WH-1");
        assert_eq!(value["quantity"], 5);
        assert_eq!(value["reference"], "PO-42");
        assert_eq!(value["sequence_id"], 1);
    }

    #[test]
    fn into_stored_preserves_fields() {
        let draft = NewTransaction::new(TransactionKind::Out, "SKU-9", "WH-2", 7);
        let id = draft.id;
        let stored = draft.into_stored(SequenceId::new(3));
        assert_eq!(stored.id, id);
        assert_eq!(stored.sequence_id, SequenceId::new(3));
        assert_eq!(stored.delta(), -7);
        assert_eq!(stored.cell_key(), CellKey::new("SKU-9", "WH-2"));
    }
}
