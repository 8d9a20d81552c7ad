//! Health and API info handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;
use pocketwise_core::{LlmBackend, LoadReport};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    /// Outcome of loading the transaction snapshot
    pub transactions: LoadReport,
    pub llm_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_model: Option<String>,
}

/// GET /api/health - Liveness and snapshot status
///
/// Does not contact the LLM backend; `llm_configured` only reports whether
/// one was set up at startup.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let client = state.advisor.client();

    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        transactions: state.engine.store().load_report(),
        llm_configured: client.is_some(),
        llm_model: client.map(|c| c.model().to_string()),
    })
}

#[derive(Serialize)]
pub struct ApiInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

/// GET / - API info
pub async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo {
        name: "pocketwise",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec![
            "GET /api/health",
            "GET /api/transactions",
            "GET /api/summary/categories",
            "GET /api/summary/timeline",
            "POST /api/advice",
        ],
    })
}
