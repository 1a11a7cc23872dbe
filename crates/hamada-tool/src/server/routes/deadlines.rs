//! Deadline arithmetic endpoints

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scheduling::{DeadlineCalculator, DeadlineStatus};
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    pub client_deadline: String,
    /// Overrides the configured buffer for this call
    #[serde(default)]
    pub buffer_days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub client_deadline: NaiveDate,
    pub supplier_deadline: NaiveDate,
    pub buffer_days: i64,
    pub status: DeadlineStatus,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub deadline: Option<NaiveDate>,
    pub supplier_deadline: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub deadline: String,
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub client_deadline: String,
    #[serde(default = "default_complexity")]
    pub complexity_factor: f64,
}

fn default_complexity() -> f64 {
    1.0
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub client_deadline: NaiveDate,
    pub supplier_deadline: NaiveDate,
    pub complexity_factor: f64,
    pub business_days_available: u32,
}

fn parse(input: &str, field: &str) -> Result<NaiveDate> {
    DeadlineCalculator::parse_date_string(input)
        .ok_or_else(|| Error::validation(format!("{} '{}' is not a recognised date", field, input)))
}

/// POST /api/deadlines/calculate
pub async fn calculate(
    State(state): State<AppState>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<CalculateResponse>> {
    let client_deadline = parse(&request.client_deadline, "client_deadline")?;
    let calculator = match request.buffer_days {
        Some(days) if days < 0 => return Err(Error::validation("buffer_days must not be negative")),
        Some(days) => DeadlineCalculator::new(days),
        None => state.deadlines().clone(),
    };

    let today = state.today();
    let supplier_deadline = calculator
        .calculate_supplier_deadline(client_deadline, today)
        .ok_or_else(|| Error::validation("buffer_days is out of range for client_deadline"))?;
    let status = calculator.deadline_status(supplier_deadline, today);

    state.log(|db| {
        db.log_deadline_calculation(
            &client_deadline.to_string(),
            &supplier_deadline.to_string(),
            calculator.buffer_days(),
        )
    });

    Ok(Json(CalculateResponse {
        client_deadline,
        supplier_deadline,
        buffer_days: calculator.buffer_days(),
        status,
    }))
}

/// POST /api/deadlines/extract
pub async fn extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Json<ExtractResponse> {
    let today = state.today();
    let deadline = state.deadlines().extract_deadline_from_text(&request.text, today);
    let supplier_deadline =
        deadline.and_then(|d| state.deadlines().calculate_supplier_deadline(d, today));

    Json(ExtractResponse {
        deadline,
        supplier_deadline,
    })
}

/// POST /api/deadlines/status
pub async fn status(
    State(state): State<AppState>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<DeadlineStatus>> {
    let deadline = parse(&request.deadline, "deadline")?;
    Ok(Json(state.deadlines().deadline_status(deadline, state.today())))
}

/// POST /api/deadlines/suggest
pub async fn suggest(
    State(state): State<AppState>,
    Json(request): Json<SuggestRequest>,
) -> Result<Json<SuggestResponse>> {
    let client_deadline = parse(&request.client_deadline, "client_deadline")?;
    if !request.complexity_factor.is_finite() || request.complexity_factor <= 0.0 {
        return Err(Error::validation("complexity_factor must be positive"));
    }

    let today = state.today();
    let supplier_deadline = state
        .deadlines()
        .suggest_optimal_supplier_deadline(client_deadline, request.complexity_factor, today)
        .ok_or_else(|| Error::validation("complexity_factor is out of range for client_deadline"))?;

    Ok(Json(SuggestResponse {
        client_deadline,
        supplier_deadline,
        complexity_factor: request.complexity_factor,
        business_days_available: DeadlineCalculator::business_days_between(today, supplier_deadline),
    }))
}
