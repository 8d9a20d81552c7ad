//! Advice handler

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use tracing::{error, warn};

use crate::{AppError, AppState};
use pocketwise_core::{AdviceRequest, AdviceResponse, Error};

/// POST /api/advice - Advice for the current snapshot
///
/// The body is optional; `{}` or an empty body asks for general advice. The
/// whole request, model call included, is bounded by `advice_timeout`.
pub async fn get_advice(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AdviceResponse>, AppError> {
    let request = parse_request(&body)?;

    let summary = match state.engine.get_category_summary() {
        Ok(summary) => summary,
        Err(Error::NoTransactions) => return Err(AppError::empty("No transactions found")),
        Err(e) => {
            error!(error = %e, "Failed to summarize transactions for advice");
            return Err(AppError::internal("Failed to analyze financial data"));
        }
    };

    let timeout = state.config.advice_timeout;
    let advice = state
        .advisor
        .get_financial_advice(&summary, &request, tokio::time::sleep(timeout))
        .await
        .inspect_err(|_| warn!(timeout_secs = timeout.as_secs(), "Advice request timed out"))?;

    Ok(Json(advice))
}

fn parse_request(body: &[u8]) -> Result<AdviceRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AdviceRequest::default());
    }

    let mut request: AdviceRequest =
        serde_json::from_slice(body).map_err(|_| AppError::bad_request("Invalid request body"))?;
    if request.context.trim().is_empty() {
        request.context = AdviceRequest::default().context;
    }
    Ok(request)
}
