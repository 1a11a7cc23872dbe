//! Activity log endpoints

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::UsageStatistics;

/// GET /api/activity/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<UsageStatistics>> {
    Ok(Json(state.activity().usage_statistics()?))
}
