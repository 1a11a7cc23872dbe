//! Terms and conditions endpoints

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;

use crate::error::Result;
use crate::server::state::AppState;
use crate::terms::TermsConditions;
use crate::types::TermsAcceptance;

#[derive(Debug, Deserialize)]
pub struct AcceptRequest {
    pub user_id: String,
    #[serde(default)]
    pub data_collection_consent: bool,
}

/// GET /api/terms
pub async fn get_terms(State(state): State<AppState>) -> Json<TermsConditions> {
    Json(state.terms().clone())
}

/// POST /api/terms/accept
pub async fn accept(
    State(state): State<AppState>,
    Json(request): Json<AcceptRequest>,
) -> Result<Json<TermsAcceptance>> {
    let acceptance = state
        .terms()
        .accept(&request.user_id, request.data_collection_consent, Utc::now())?;

    state.activity().record_terms_acceptance(&acceptance)?;
    tracing::info!("Terms {} accepted by {}", acceptance.terms_version, acceptance.user_id);
    Ok(Json(acceptance))
}
