//! API routes for the newsletter server

pub mod generate;
pub mod past_issues;
pub mod runs;
pub mod sectors;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate::generate))
        .route("/sectors", get(sectors::list_sectors))
        // Past issues - larger body limit for uploads
        .route("/past-issues/:sector", get(past_issues::get_past_issues))
        .route(
            "/upload-past-issue",
            post(past_issues::upload).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Runs
        .route("/download-run/:sector/:date", get(runs::download))
        .route("/run-status/:sector/:date", get(runs::status))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "aedco-newsletter",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Weekly sector newsletters for AEDCO, drafted by a hosted LLM",
        "endpoints": {
            "POST /api/generate": "Generate both editions for a sector ({sector, mode})",
            "GET /api/sectors": "Sector names, prompt files and sections",
            "GET /api/past-issues/:sector": "Past issue text used for deduplication",
            "POST /api/upload-past-issue": "Upload a past issue (multipart: sector, edition, date, file)",
            "GET /api/download-run/:sector/:date": "Run files as a ZIP archive",
            "GET /api/run-status/:sector/:date": "Run manifest"
        }
    }))
}
