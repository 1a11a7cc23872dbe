//! Supplier registry endpoints

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;
use crate::server::state::AppState;
use crate::storage::suppliers::{
    export_csv, filter_suppliers, search_suppliers, statistics, suppliers_by_country,
    suppliers_by_material,
};
use crate::types::{Supplier, SupplierPatch, SupplierStatistics};

/// Query parameters for listing suppliers
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListSuppliersQuery {
    pub country: Option<String>,
    pub material: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SupplierListResponse {
    pub suppliers: Vec<Supplier>,
    pub total: usize,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub exclude_origins: Vec<String>,
}

/// GET /api/suppliers
pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(params): Query<ListSuppliersQuery>,
) -> Result<Json<SupplierListResponse>> {
    let mut suppliers = state.suppliers().lock().load()?;

    if let Some(country) = params.country.as_deref().filter(|c| !c.is_empty()) {
        suppliers = suppliers_by_country(&suppliers, country);
    }
    if let Some(material) = params.material.as_deref().filter(|m| !m.is_empty()) {
        suppliers = suppliers_by_material(&suppliers, material);
    }
    if let Some(term) = params.search.as_deref().filter(|s| !s.is_empty()) {
        suppliers = search_suppliers(&suppliers, term);
    }

    let total = suppliers.len();
    let materials: Vec<&str> = params.material.as_deref().into_iter().collect();
    state.log(|db| {
        db.log_supplier_search(
            json!({
                "country": params.country,
                "materials": materials,
                "search": params.search,
            }),
            total,
        )
    });

    Ok(Json(SupplierListResponse { suppliers, total }))
}

/// POST /api/suppliers
pub async fn add_supplier(
    State(state): State<AppState>,
    Json(supplier): Json<Supplier>,
) -> Result<(StatusCode, Json<Supplier>)> {
    state.suppliers().lock().add(supplier.clone())?;
    state.log(|db| db.upsert_supplier(&supplier));
    tracing::info!("Added supplier {}", supplier.company_name);
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// PUT /api/suppliers/:company
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(company): Path<String>,
    Json(patch): Json<SupplierPatch>,
) -> Result<Json<Supplier>> {
    let updated = state.suppliers().lock().update(&company, patch)?;
    state.log(|db| db.upsert_supplier(&updated));
    Ok(Json(updated))
}

/// DELETE /api/suppliers/:company
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(company): Path<String>,
) -> Result<Json<serde_json::Value>> {
    state.suppliers().lock().delete(&company)?;
    state.log(|db| db.delete_supplier(&company).map(|_| ()));
    tracing::info!("Deleted supplier {}", company);
    Ok(Json(json!({ "deleted": company })))
}

/// POST /api/suppliers/filter
pub async fn filter(
    State(state): State<AppState>,
    Json(request): Json<FilterRequest>,
) -> Result<Json<SupplierListResponse>> {
    let suppliers = state.suppliers().lock().load()?;
    let suppliers = filter_suppliers(&suppliers, &request.materials, &request.exclude_origins);
    let total = suppliers.len();

    state.log(|db| db.log_supplier_search(json!(request), total));
    Ok(Json(SupplierListResponse { suppliers, total }))
}

/// GET /api/suppliers/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<SupplierStatistics>> {
    let suppliers = state.suppliers().lock().load()?;
    Ok(Json(statistics(&suppliers)))
}

/// GET /api/suppliers/export
pub async fn export(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let suppliers = state.suppliers().lock().load()?;
    let body = export_csv(&suppliers)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"suppliers.csv\""),
        ],
        body,
    ))
}
