use async_trait::async_trait;

use crate::{Sku, WarehouseCode};

/// Reference checks against master data.
///
/// Master-data records (products, warehouses, ...) live with out-of-scope
/// collaborators; the gateway only needs existence checks to validate
/// references before admitting a transaction.
#[async_trait]
pub trait MasterDataLookup: Send + Sync {
    /// True when a product with this SKU exists.
    async fn product_exists(&self, sku: &Sku) -> bool;

    /// True when a warehouse with this code exists.
    async fn warehouse_exists(&self, code: &WarehouseCode) -> bool;
}
