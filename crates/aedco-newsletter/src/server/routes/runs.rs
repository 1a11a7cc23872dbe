//! Run download and status endpoints

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::error::Result;
use crate::sectors::Sector;
use crate::server::state::AppState;
use crate::types::RunManifest;

/// GET /api/download-run/:sector/:date
pub async fn download(
    State(state): State<AppState>,
    Path((sector, date)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let sector: Sector = sector.parse()?;
    let archive = state.generator().zip_run(sector, date.clone()).await?;

    let disposition = format!(
        "attachment; filename=\"{}_{}_newsletters.zip\"",
        sector.key(),
        date
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        archive,
    ))
}

/// GET /api/run-status/:sector/:date
pub async fn status(
    State(state): State<AppState>,
    Path((sector, date)): Path<(String, String)>,
) -> Result<Json<RunManifest>> {
    let sector: Sector = sector.parse()?;
    let manifest = state.generator().load_manifest(sector, date).await?;
    Ok(Json(manifest))
}
