//! Master-data record endpoints.
//!
//! Plain create/list endpoints for the keyed record stores the gateway's
//! reference checks and the dashboard's entity totals read from.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use ledger::LedgerStore;
use serde::Deserialize;

use crate::error::ApiError;
use crate::masterdata::{Customer, Product, Supplier, Tax, Warehouse};
use crate::routes::inventory::AppState;

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub sku: String,
    pub name: String,
    pub price: f64,
    pub cost: f64,
}

#[derive(Deserialize)]
pub struct CreateContactRequest {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct CreateWarehouseRequest {
    pub name: String,
    pub code: String,
}

#[derive(Deserialize)]
pub struct CreateTaxRequest {
    pub name: String,
    pub rate: f64,
}

/// POST /products — register a product. SKUs must be unique.
pub async fn create_product<S: LedgerStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state
        .master_data
        .add_product(req.sku, req.name, req.price, req.cost)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products — list all products.
pub async fn list_products<S: LedgerStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<Vec<Product>> {
    Json(state.master_data.products().await)
}

/// POST /customers — register a customer.
pub async fn create_customer<S: LedgerStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateContactRequest>,
) -> (StatusCode, Json<Customer>) {
    let customer = state.master_data.add_customer(req.name, req.email).await;
    (StatusCode::CREATED, Json(customer))
}

/// GET /customers — list all customers.
pub async fn list_customers<S: LedgerStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<Vec<Customer>> {
    Json(state.master_data.customers().await)
}

/// POST /suppliers — register a supplier.
pub async fn create_supplier<S: LedgerStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateContactRequest>,
) -> (StatusCode, Json<Supplier>) {
    let supplier = state.master_data.add_supplier(req.name, req.email).await;
    (StatusCode::CREATED, Json(supplier))
}

/// GET /suppliers — list all suppliers.
pub async fn list_suppliers<S: LedgerStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<Vec<Supplier>> {
    Json(state.master_data.suppliers().await)
}

/// POST /warehouses — register a warehouse. Codes must be unique.
pub async fn create_warehouse<S: LedgerStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateWarehouseRequest>,
) -> Result<(StatusCode, Json<Warehouse>), ApiError> {
    let warehouse = state.master_data.add_warehouse(req.name, req.code).await?;
    Ok((StatusCode::CREATED, Json(warehouse)))
}

/// GET /warehouses — list all warehouses.
pub async fn list_warehouses<S: LedgerStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<Vec<Warehouse>> {
    Json(state.master_data.warehouses().await)
}

/// POST /taxes — register a tax rate.
pub async fn create_tax<S: LedgerStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateTaxRequest>,
) -> Result<(StatusCode, Json<Tax>), ApiError> {
    let tax = state.master_data.add_tax(req.name, req.rate).await?;
    Ok((StatusCode::CREATED, Json(tax)))
}

/// GET /taxes — list all tax rates.
pub async fn list_taxes<S: LedgerStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<Vec<Tax>> {
    Json(state.master_data.taxes().await)
}
