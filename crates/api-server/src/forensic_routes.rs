//! Forensic Verdict API Routes
//!
//! Endpoints that normalize a provider record and classify it.

use analysis_core::NormalizationError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use fundamental_analysis::{ForensicReport, VerdictThresholds};
use serde::Serialize;

use crate::{ApiResponse, AppError, AppState};

#[cfg(test)]
#[path = "forensic_routes_tests.rs"]
mod forensic_routes_tests;

/// Upper bound on records per batch request.
pub const MAX_BATCH_SIZE: usize = 50;

#[derive(Serialize)]
pub struct BatchItem {
    pub symbol: Option<String>,
    pub report: Option<ForensicReport>,
    pub error: Option<String>,
}

pub fn forensic_routes() -> Router<AppState> {
    Router::new()
        .route("/api/forensic/verdict", post(classify_record))
        .route("/api/forensic/batch", post(classify_batch))
        .route("/api/forensic/thresholds", get(get_thresholds))
}

/// Map normalization failures to client errors.
fn normalization_err(e: NormalizationError) -> AppError {
    let status = match e {
        NormalizationError::PriceUnavailable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        NormalizationError::MalformedInput(_) => StatusCode::BAD_REQUEST,
    };
    AppError::with_status(status, anyhow::Error::new(e))
}

/// Body extraction failures answer 400 inside the envelope, never with
/// axum's plain-text rejection.
fn body_err(rejection: JsonRejection) -> AppError {
    AppError::with_status(
        StatusCode::BAD_REQUEST,
        anyhow::anyhow!("Malformed input: {}", rejection.body_text()),
    )
}

async fn classify_record(
    State(state): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<ApiResponse<ForensicReport>>, AppError> {
    let Json(record) = body.map_err(body_err)?;
    let report = state.engine.analyze_value(&record).map_err(normalization_err)?;
    Ok(Json(ApiResponse::success(report)))
}

async fn classify_batch(
    State(state): State<AppState>,
    body: Result<Json<Vec<serde_json::Value>>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<BatchItem>>>, AppError> {
    let Json(records) = body.map_err(body_err)?;
    if records.len() > MAX_BATCH_SIZE {
        return Err(AppError::with_status(
            StatusCode::PAYLOAD_TOO_LARGE,
            anyhow::anyhow!(
                "batch of {} records exceeds the limit of {}",
                records.len(),
                MAX_BATCH_SIZE
            ),
        ));
    }

    let items = records
        .iter()
        .map(|record| {
            let symbol = record
                .get("symbol")
                .and_then(|s| s.as_str())
                .map(|s| s.trim().to_uppercase());
            match state.engine.analyze_value(record) {
                Ok(report) => BatchItem {
                    symbol,
                    report: Some(report),
                    error: None,
                },
                Err(e) => {
                    tracing::warn!("Batch record {:?} skipped: {}", symbol, e);
                    BatchItem {
                        symbol,
                        report: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect();

    Ok(Json(ApiResponse::success(items)))
}

async fn get_thresholds(State(state): State<AppState>) -> Json<ApiResponse<VerdictThresholds>> {
    Json(ApiResponse::success(state.engine.thresholds().clone()))
}
