//! Newsletter generation endpoint

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schedule::Mode;
use crate::sectors::Sector;
use crate::server::state::AppState;
use crate::types::GenerationOutcome;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub sector: String,
    /// `production` or anything else for a test run
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(flatten)]
    pub outcome: GenerationOutcome,
}

/// POST /api/generate
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    let sector: Sector = request.sector.parse()?;
    let mode = Mode::from_request(request.mode.as_deref());

    let generator = state.generator();
    let outcome = generator.generate(sector, mode, generator.now()).await?;

    Ok(Json(GenerateResponse {
        success: true,
        outcome,
    }))
}
