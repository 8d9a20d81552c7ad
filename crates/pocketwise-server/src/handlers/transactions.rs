//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{AppError, AppState};
use pocketwise_core::{parse_date, TransactionFilter, TransactionType, TransactionsResponse};

/// Query parameters for listing transactions
#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    /// Inclusive start date (YYYY-MM-DD), requires `end_date`
    #[serde(alias = "startDate")]
    pub start_date: Option<String>,
    /// Inclusive end date (YYYY-MM-DD), requires `start_date`
    #[serde(alias = "endDate")]
    pub end_date: Option<String>,
    /// `income` or `expense`
    #[serde(rename = "type")]
    pub tx_type: Option<String>,
    /// Exact category name
    pub category: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn date_param(value: &str, name: &str) -> Result<NaiveDate, AppError> {
    parse_date(value).map_err(|_| {
        AppError::bad_request(&format!("Invalid {} format, expected YYYY-MM-DD", name))
    })
}

/// GET /api/transactions - List transactions
///
/// Filters combine; a date range also sets the reported period.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<TransactionsResponse>, AppError> {
    let range = match (non_blank(&params.start_date), non_blank(&params.end_date)) {
        (Some(start), Some(end)) => Some((
            date_param(start, "start_date")?,
            date_param(end, "end_date")?,
        )),
        (None, None) => None,
        _ => {
            return Err(AppError::bad_request(
                "Both start_date and end_date are required for a date range",
            ))
        }
    };
    let filter = TransactionFilter {
        range,
        tx_type: non_blank(&params.tx_type)
            .map(str::parse::<TransactionType>)
            .transpose()?,
        category: non_blank(&params.category).map(str::to_string),
    };

    Ok(Json(state.engine.find_transactions(&filter)?))
}
