//! Summary handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use pocketwise_core::{CategorySummary, Granularity, TimelineResponse};

/// GET /api/summary/categories - Totals and shares per category
pub async fn category_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CategorySummary>, AppError> {
    Ok(Json(state.engine.get_category_summary()?))
}

#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    /// `monthly` (default) or `weekly`
    pub aggregation: Option<String>,
}

/// GET /api/summary/timeline - Income vs expenses per period
pub async fn timeline(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TimelineQuery>,
) -> Result<Json<TimelineResponse>, AppError> {
    let granularity = match params.aggregation.as_deref().map(str::trim) {
        None | Some("") => Granularity::default(),
        Some(value) => value
            .parse::<Granularity>()
            .map_err(|_| AppError::bad_request("Aggregation must be either 'monthly' or 'weekly'"))?,
    };

    Ok(Json(state.engine.get_timeline_with(granularity)?))
}
