use serde::{Deserialize, Serialize};

use crate::{CellKey, Sku, WarehouseCode};

/// Current stock of one product in one warehouse.
///
/// `on_hand` is the sum of signed deltas of all admitted transactions
/// against this cell, in sequence order. `reserved` is set by the
/// (out-of-scope) reservation subsystem and served as-is; `reserved <=
/// on_hand` is a target invariant at that boundary, not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockCell {
    pub product_sku: Sku,
    pub warehouse_code: WarehouseCode,
    pub on_hand: i64,
    pub reserved: i64,
}

impl StockCell {
    /// Creates an empty cell for a key. Used as the transient default for
    /// keys no transaction has touched yet.
    pub fn empty(key: CellKey) -> Self {
        Self {
            product_sku: key.product_sku,
            warehouse_code: key.warehouse_code,
            on_hand: 0,
            reserved: 0,
        }
    }

    /// Returns the cell's key.
    pub fn key(&self) -> CellKey {
        CellKey {
            product_sku: self.product_sku.clone(),
            warehouse_code: self.warehouse_code.clone(),
        }
    }

    /// True when both quantities are zero.
    pub fn is_zero(&self) -> bool {
        self.on_hand == 0 && self.reserved == 0
    }
}
