//! Tender document endpoints

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ingestion::{FileParser, TenderExtractor};
use crate::server::state::AppState;
use crate::types::{extension_of, FileInfo, FileType, TenderExtraction};

/// Result of processing one document
#[derive(Debug, Serialize)]
pub struct ParseResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_info: Option<FileInfo>,
    pub extraction: TenderExtraction,
}

#[derive(Debug, Deserialize)]
pub struct ParseTextRequest {
    pub text: String,
}

/// POST /api/documents/parse - multipart `file`
pub async fn parse_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParseResponse>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::validation(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::file_parse(&filename, format!("Failed to read upload: {}", e)))?;
        upload = Some((filename, data.to_vec()));
    }

    let (filename, data) = upload.ok_or_else(|| Error::validation("Missing multipart field 'file'"))?;

    let file_type = FileType::from_filename(&filename);
    if !file_type.is_supported() {
        return Err(Error::UnsupportedFileType(extension_of(&filename).to_string()));
    }

    let file_info = FileInfo {
        filename: filename.clone(),
        file_type,
        size: data.len() as u64,
    };
    tracing::info!("Parsing {} ({} bytes)", filename, data.len());

    let text = tokio::task::spawn_blocking(move || FileParser::parse(&filename, &data))
        .await
        .map_err(|e| Error::internal(format!("Parser task failed: {}", e)))??;

    let extraction = analyze(&state, &text);

    state.log(|db| db.record_processed_document(&file_info, &extraction));
    state.log(|db| db.log_document_processing(&file_info, &extraction));

    Ok(Json(ParseResponse {
        file_info: Some(file_info),
        extraction,
    }))
}

/// POST /api/documents/parse-text
pub async fn parse_text(
    State(state): State<AppState>,
    Json(request): Json<ParseTextRequest>,
) -> Result<Json<ParseResponse>> {
    if request.text.trim().is_empty() {
        return Err(Error::validation("text must not be empty"));
    }

    let extraction = analyze(&state, &request.text);
    Ok(Json(ParseResponse {
        file_info: None,
        extraction,
    }))
}

/// Extract fields and derive the supplier deadline from the client deadline
fn analyze(state: &AppState, text: &str) -> TenderExtraction {
    let mut extraction = TenderExtractor::analyze(text);
    extraction.supplier_deadline = extraction
        .deadline
        .and_then(|deadline| state.deadlines().calculate_supplier_deadline(deadline, state.today()));
    extraction
}
