//! API routes for the tender processing server

pub mod activity;
pub mod deadlines;
pub mod documents;
pub mod emails;
pub mod orders;
pub mod suppliers;
pub mod terms;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Documents - larger body limit for uploads
        .route(
            "/documents/parse",
            post(documents::parse_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/documents/parse-text", post(documents::parse_text))
        // Supplier registry
        .route(
            "/suppliers",
            get(suppliers::list_suppliers).post(suppliers::add_supplier),
        )
        .route(
            "/suppliers/:company",
            put(suppliers::update_supplier).delete(suppliers::delete_supplier),
        )
        .route("/suppliers/filter", post(suppliers::filter))
        .route("/suppliers/stats", get(suppliers::stats))
        .route("/suppliers/export", get(suppliers::export))
        // Quotation emails
        .route("/emails/generate", post(emails::generate))
        .route("/emails/export", post(emails::export))
        .route("/emails/follow-up", post(emails::follow_up))
        .route("/emails/validate", get(emails::validate))
        // Deadlines
        .route("/deadlines/calculate", post(deadlines::calculate))
        .route("/deadlines/extract", post(deadlines::extract))
        .route("/deadlines/status", post(deadlines::status))
        .route("/deadlines/suggest", post(deadlines::suggest))
        // Orders
        .route("/orders", get(orders::list_orders))
        .route("/orders/pending", get(orders::pending_orders))
        .route("/orders/stats", get(orders::stats))
        .route("/orders/:id/status", put(orders::update_status))
        // Terms and activity
        .route("/terms", get(terms::get_terms))
        .route("/terms/accept", post(terms::accept))
        .route("/activity/stats", get(activity::stats))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "hamada-tool",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Tender processing: document extraction, supplier registry, quotation emails and deadlines",
        "endpoints": {
            "POST /api/documents/parse": "Upload a tender document (PDF, DOCX, XLSX, TXT)",
            "POST /api/documents/parse-text": "Extract tender fields from plain text",
            "GET /api/suppliers": "List suppliers (?country, ?material, ?search)",
            "POST /api/suppliers": "Add a supplier",
            "PUT /api/suppliers/:company": "Update a supplier",
            "DELETE /api/suppliers/:company": "Delete a supplier",
            "POST /api/suppliers/filter": "Suppliers for materials, excluding origins",
            "GET /api/suppliers/stats": "Registry statistics and regional compliance",
            "GET /api/suppliers/export": "Registry as CSV",
            "POST /api/emails/generate": "Draft quotation requests and record an order",
            "POST /api/emails/export": "Drafts as CSV",
            "POST /api/emails/follow-up": "Follow-up body for a draft",
            "GET /api/emails/validate": "Check supplier email addresses",
            "POST /api/deadlines/calculate": "Supplier deadline from a client deadline",
            "POST /api/deadlines/extract": "Find a deadline in text",
            "POST /api/deadlines/status": "Urgency of a deadline",
            "POST /api/deadlines/suggest": "Complexity-adjusted supplier deadline",
            "GET /api/orders": "All tracked orders",
            "GET /api/orders/pending": "Orders awaiting responses",
            "GET /api/orders/stats": "Order statistics",
            "PUT /api/orders/:id/status": "Change an order's status",
            "GET /api/terms": "Terms and conditions",
            "POST /api/terms/accept": "Accept the terms",
            "GET /api/activity/stats": "Usage statistics"
        }
    }))
}
