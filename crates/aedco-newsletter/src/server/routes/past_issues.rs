//! Past issue endpoints

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::sectors::Sector;
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub file_path: String,
}

/// GET /api/past-issues/:sector
pub async fn get_past_issues(
    State(state): State<AppState>,
    Path(sector): Path<String>,
) -> Result<Json<Value>> {
    let sector: Sector = sector.parse()?;
    let past_issues = state.generator().load_past_issues(sector).await?;
    Ok(Json(json!({ "past_issues": past_issues })))
}

/// POST /api/upload-past-issue - multipart `sector`, `edition`, `date`, `file`
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut sector = None;
    let mut edition = None;
    let mut date = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::validation(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| Error::validation(format!("Failed to read upload: {}", e)))?;
                file = Some((filename, data.to_vec()));
            }
            "sector" | "edition" | "date" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| Error::validation(format!("Failed to read field {}: {}", name, e)))?;
                let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
                match name.as_str() {
                    "sector" => sector = value,
                    "edition" => edition = value,
                    _ => date = value,
                }
            }
            _ => {}
        }
    }

    let (Some(sector), Some(edition), Some(date)) = (sector, edition, date) else {
        return Err(Error::validation("Missing required fields: sector, edition, date"));
    };
    let sector: Sector = sector.parse()?;

    let (filename, data) = file.ok_or_else(|| Error::validation("No file uploaded"))?;
    if filename.is_empty() || data.is_empty() {
        return Err(Error::validation("No file selected"));
    }

    let path = state
        .generator()
        .save_past_issue(sector, edition, date, data)
        .await?;

    Ok(Json(UploadResponse {
        success: true,
        message: "Past issue uploaded successfully".to_string(),
        file_path: path.display().to_string(),
    }))
}
