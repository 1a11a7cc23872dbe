//! Sector catalogue endpoint

use axum::Json;
use std::collections::BTreeMap;

use crate::sectors::{sector_catalog, SectorInfo};

/// GET /api/sectors
pub async fn list_sectors() -> Json<BTreeMap<&'static str, SectorInfo>> {
    Json(sector_catalog())
}
