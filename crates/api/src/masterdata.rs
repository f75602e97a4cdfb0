//! In-memory master-data stores.
//!
//! Plain keyed record stores with no business logic: products, customers,
//! suppliers, warehouses, taxes, plus bare counters for the document stores
//! the dashboard reports on. Implements the lookup and counter traits the
//! core consumes, keeping the ledger/aggregator free of any knowledge of
//! the record shapes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::{Sku, WarehouseCode};
use dashboard::{EntityCounters, EntityCounts};
use gateway::MasterDataLookup;

/// A record field conflicts with or fails a basic record check.
#[derive(Debug, Clone, Error)]
pub enum MasterDataError {
    #[error("duplicate {field} {value:?}")]
    Duplicate { field: &'static str, value: String },

    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub price: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: Uuid,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tax {
    pub id: Uuid,
    pub name: String,
    pub rate: f64,
}

#[derive(Default)]
struct State {
    products: Vec<Product>,
    customers: Vec<Customer>,
    suppliers: Vec<Supplier>,
    warehouses: Vec<Warehouse>,
    taxes: Vec<Tax>,
    open_sales_orders: usize,
    invoices: usize,
    payments: usize,
}

/// In-memory master-data store shared across handlers.
#[derive(Clone, Default)]
pub struct InMemoryMasterData {
    inner: Arc<RwLock<State>>,
}

impl InMemoryMasterData {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_product(
        &self,
        sku: String,
        name: String,
        price: f64,
        cost: f64,
    ) -> Result<Product, MasterDataError> {
        if price < 0.0 {
            return Err(MasterDataError::NegativeAmount {
                field: "price",
                value: price,
            });
        }
        if cost < 0.0 {
            return Err(MasterDataError::NegativeAmount {
                field: "cost",
                value: cost,
            });
        }

        let mut state = self.inner.write().await;
        if state.products.iter().any(|p| p.sku == sku) {
            return Err(MasterDataError::Duplicate {
                field: "sku",
                value: sku,
            });
        }

        let product = Product {
            id: Uuid::new_v4(),
            sku,
            name,
            price,
            cost,
        };
        state.products.push(product.clone());
        Ok(product)
    }

    pub async fn add_customer(&self, name: String, email: String) -> Customer {
        let customer = Customer {
            id: Uuid::new_v4(),
            name,
            email,
        };
        self.inner.write().await.customers.push(customer.clone());
        customer
    }

    pub async fn add_supplier(&self, name: String, email: String) -> Supplier {
        let supplier = Supplier {
            id: Uuid::new_v4(),
            name,
            email,
        };
        self.inner.write().await.suppliers.push(supplier.clone());
        supplier
    }

    pub async fn add_warehouse(
        &self,
        name: String,
        code: String,
    ) -> Result<Warehouse, MasterDataError> {
        let mut state = self.inner.write().await;
        if state.warehouses.iter().any(|w| w.code == code) {
            return Err(MasterDataError::Duplicate {
                field: "code",
                value: code,
            });
        }

        let warehouse = Warehouse {
            id: Uuid::new_v4(),
            name,
            code,
        };
        state.warehouses.push(warehouse.clone());
        Ok(warehouse)
    }

    pub async fn add_tax(&self, name: String, rate: f64) -> Result<Tax, MasterDataError> {
        if rate < 0.0 {
            return Err(MasterDataError::NegativeAmount {
                field: "rate",
                value: rate,
            });
        }

        let tax = Tax {
            id: Uuid::new_v4(),
            name,
            rate,
        };
        self.inner.write().await.taxes.push(tax.clone());
        Ok(tax)
    }

    pub async fn products(&self) -> Vec<Product> {
        self.inner.read().await.products.clone()
    }

    pub async fn customers(&self) -> Vec<Customer> {
        self.inner.read().await.customers.clone()
    }

    pub async fn suppliers(&self) -> Vec<Supplier> {
        self.inner.read().await.suppliers.clone()
    }

    pub async fn warehouses(&self) -> Vec<Warehouse> {
        self.inner.read().await.warehouses.clone()
    }

    pub async fn taxes(&self) -> Vec<Tax> {
        self.inner.read().await.taxes.clone()
    }

    /// Sets the bare document counters the dashboard reports. The document
    /// stores themselves live outside this system.
    pub async fn set_document_counts(
        &self,
        open_sales_orders: usize,
        invoices: usize,
        payments: usize,
    ) {
        let mut state = self.inner.write().await;
        state.open_sales_orders = open_sales_orders;
        state.invoices = invoices;
        state.payments = payments;
    }
}

#[async_trait]
impl MasterDataLookup for InMemoryMasterData {
    async fn product_exists(&self, sku: &Sku) -> bool {
        self.inner
            .read()
            .await
            .products
            .iter()
            .any(|p| p.sku == sku.as_str())
    }

    async fn warehouse_exists(&self, code: &WarehouseCode) -> bool {
        self.inner
            .read()
            .await
            .warehouses
            .iter()
            .any(|w| w.code == code.as_str())
    }
}

#[async_trait]
impl EntityCounters for InMemoryMasterData {
    async fn counts(&self) -> EntityCounts {
        let state = self.inner.read().await;
        EntityCounts {
            products: state.products.len(),
            customers: state.customers.len(),
            suppliers: state.suppliers.len(),
            open_sales_orders: state.open_sales_orders,
            invoices: state.invoices,
            payments: state.payments,
        }
    }
}
