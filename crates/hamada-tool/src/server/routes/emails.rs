//! Quotation email endpoints

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::generation::email::DEFAULT_FOLLOW_UP_DAYS;
use crate::scheduling::DeadlineCalculator;
use crate::server::state::AppState;
use crate::storage::{categorize_suppliers, filter_suppliers};
use crate::types::{EmailDraft, EmailIssue, EmailValidation, NewOrder, ProjectDetails, QuoteDeadline};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub details: ProjectDetails,
    /// Material categories to request
    #[serde(default)]
    pub materials: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub emails: Vec<EmailDraft>,
    pub summary: String,
    pub order_id: String,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub emails: Vec<EmailDraft>,
}

#[derive(Debug, Deserialize)]
pub struct FollowUpRequest {
    pub email: EmailDraft,
    #[serde(default)]
    pub days_since_sent: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct FollowUpResponse {
    pub company_name: String,
    pub email: String,
    pub subject: String,
    pub email_body: String,
}

#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub results: Vec<EmailValidation>,
    pub valid: usize,
    pub missing: usize,
    pub invalid: usize,
}

/// POST /api/emails/generate
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    let GenerateRequest { mut details, materials } = request;
    let deadline = validate_request(&details, &materials)?;
    let follow_up_date = deadline
        .succ_opt()
        .ok_or_else(|| Error::validation("quote_deadline is out of range"))?;
    details.quote_deadline = Some(QuoteDeadline::Date(deadline));

    let suppliers = state.suppliers().lock().load()?;
    let suppliers = filter_suppliers(&suppliers, &materials, &details.exclude_origins);
    if suppliers.is_empty() {
        return Err(Error::NoMatchingSuppliers);
    }

    let emails = state.generator().generate_emails(&suppliers, &details);
    let summary = state.generator().bulk_summary(&emails, &details);

    state.log(|db| db.log_email_generation(&details, suppliers.len()));
    state.log(|db| db.record_generated_emails(&details, &emails));

    let new_order = NewOrder {
        project_name: details.project_name.clone(),
        tender_reference: details.tender_reference.clone(),
        materials: materials.clone(),
        total_suppliers: suppliers.len() as u32,
        emails_sent: emails.len() as u32,
        supplier_categories: categorize_suppliers(&emails),
        follow_up_date: follow_up_date.to_string(),
        notes: format!("Generated for materials: {}", materials.join(", ")),
    };
    let order = state
        .orders()
        .lock()
        .add_processed_order(new_order, state.now())?;

    let addresses: Vec<String> = emails
        .iter()
        .filter(|e| !e.email.is_empty())
        .map(|e| e.email.clone())
        .collect();
    state.log(|db| db.upsert_order_tracking(&order, &addresses));
    state.log(|db| db.log_order_tracking(&order));

    Ok(Json(GenerateResponse {
        total: emails.len(),
        emails,
        summary,
        order_id: order.order_id,
    }))
}

/// Required fields are present and the deadline is a date
fn validate_request(details: &ProjectDetails, materials: &[String]) -> Result<NaiveDate> {
    if details.project_name.trim().is_empty() {
        return Err(Error::validation("project_name is required"));
    }
    if materials.is_empty() {
        return Err(Error::validation("At least one material is required"));
    }
    if details.requirements.trim().is_empty() {
        return Err(Error::validation("requirements are required"));
    }

    match &details.quote_deadline {
        Some(QuoteDeadline::Date(date)) => Ok(*date),
        Some(QuoteDeadline::Text(text)) => DeadlineCalculator::parse_date_string(text)
            .ok_or_else(|| Error::validation(format!("quote_deadline '{}' is not a date", text))),
        None => Err(Error::validation("quote_deadline is required")),
    }
}

/// POST /api/emails/export
pub async fn export(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<impl IntoResponse> {
    let body = state.generator().export_emails_csv(&request.emails)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"quotation_emails.csv\""),
        ],
        body,
    ))
}

/// POST /api/emails/follow-up
pub async fn follow_up(
    State(state): State<AppState>,
    Json(request): Json<FollowUpRequest>,
) -> Json<FollowUpResponse> {
    let days = request.days_since_sent.unwrap_or(DEFAULT_FOLLOW_UP_DAYS);
    let email_body = state.generator().follow_up_email(&request.email, days);

    Json(FollowUpResponse {
        subject: format!("Follow-up: {}", request.email.subject),
        company_name: request.email.company_name,
        email: request.email.email,
        email_body,
    })
}

/// GET /api/emails/validate
pub async fn validate(State(state): State<AppState>) -> Result<Json<ValidationResponse>> {
    let suppliers = state.suppliers().lock().load()?;
    let results = state.generator().validate_email_addresses(&suppliers);

    let count = |issue: EmailIssue| results.iter().filter(|r| r.issue == issue).count();
    Ok(Json(ValidationResponse {
        valid: count(EmailIssue::Valid),
        missing: count(EmailIssue::Missing),
        invalid: count(EmailIssue::InvalidFormat),
        results,
    }))
}
