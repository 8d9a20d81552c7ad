//! Pocketwise Web Server
//!
//! Axum-based REST API over the transaction store, analytics engine and
//! advisory service.
//!
//! - Read-only: the store is loaded once and shared by every request
//! - CORS restricted to configured origins
//! - Advice requests bounded by a configurable timeout
//! - Sanitized error responses

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use pocketwise_core::config::ServerSettings;
use pocketwise_core::{AdvisoryService, AnalyticsEngine, LlmBackend};

mod handlers;

/// Preflight responses may be cached for a day
const CORS_MAX_AGE: Duration = Duration::from_secs(86_400);

#[derive(Clone)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only, `*` = any)
    pub allowed_origins: Vec<String>,
    /// Upper bound on a single advice request, including the model call
    pub advice_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from(&ServerSettings::default())
    }
}

impl From<&ServerSettings> for ServerConfig {
    fn from(settings: &ServerSettings) -> Self {
        Self {
            allowed_origins: settings.allowed_origins.clone(),
            advice_timeout: settings.advice_timeout,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub engine: AnalyticsEngine,
    pub advisor: AdvisoryService,
    pub config: ServerConfig,
}

/// Create the application router
pub fn create_router(
    engine: AnalyticsEngine,
    advisor: AdvisoryService,
    config: ServerConfig,
) -> Router {
    match advisor.client() {
        Some(client) => info!(
            "LLM backend configured: {} (model: {})",
            client.host(),
            client.model()
        ),
        None => info!("ℹ️  LLM backend not configured, advice will use the heuristic generator"),
    }

    let cors = cors_layer(&config.allowed_origins);

    let state = Arc::new(AppState {
        engine,
        advisor,
        config,
    });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/transactions", get(handlers::list_transactions))
        .route("/summary/categories", get(handlers::category_summary))
        .route("/summary/timeline", get(handlers::timeline))
        .route("/advice", post(handlers::get_advice));

    Router::new()
        .route("/", get(handlers::api_info))
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(CORS_MAX_AGE);

    if allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        return base;
    }

    if allowed_origins.iter().any(|o| o.trim() == "*") {
        warn!("⚠️  CORS allows any origin");
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .map(|o| o.trim().trim_end_matches('/'))
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(origins)
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    engine: AnalyticsEngine,
    advisor: AdvisoryService,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let report = engine.store().load_report();
    info!(
        loaded = report.loaded,
        skipped = report.skipped,
        flagged = report.flagged,
        "Serving transaction snapshot"
    );
    if report.skipped > 0 {
        warn!(
            "⚠️  {} record(s) were skipped while loading, see earlier warnings",
            report.skipped
        );
    }

    check_ai_connection(&advisor).await;

    let app = create_router(engine, advisor, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log LLM backend connection status
async fn check_ai_connection(advisor: &AdvisoryService) {
    let Some(client) = advisor.client() else {
        return;
    };

    if client.health_check().await {
        info!(
            "✅ LLM backend connected: {} (model: {})",
            client.host(),
            client.model()
        );
    } else {
        warn!(
            "⚠️  LLM backend configured but not responding: {} (model: {}), advice may fall back to heuristics",
            client.host(),
            client.model()
        );
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn timeout(msg: &str) -> Self {
        Self {
            status: StatusCode::GATEWAY_TIMEOUT,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// An empty result, reported as a successful response with a message
    pub fn empty(msg: &str) -> Self {
        Self {
            status: StatusCode::OK,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Map the core errors a client can act on; `None` for internal failures
    fn from_core(err: &pocketwise_core::Error) -> Option<Self> {
        use pocketwise_core::Error;

        let mapped = match err {
            Error::NoTransactions => Self::empty("No transactions found"),
            Error::InvalidDateRange => {
                Self::bad_request("Invalid date range: start date must be before end date")
            }
            Error::InvalidDate => Self::bad_request("Invalid date format, expected YYYY-MM-DD"),
            Error::InvalidCategory => Self::bad_request("Category cannot be empty"),
            Error::InvalidType => Self::bad_request("Type must be either 'income' or 'expense'"),
            Error::InvalidAmount => Self::bad_request("Amount sign must match transaction type"),
            Error::Cancelled => Self::timeout("Advice request timed out"),
            _ => return None,
        };
        Some(mapped)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = if self.status.is_success() {
            Json(serde_json::json!({ "message": self.message }))
        } else {
            Json(serde_json::json!({ "error": self.message }))
        };

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        if let Some(mapped) = err
            .downcast_ref::<pocketwise_core::Error>()
            .and_then(Self::from_core)
        {
            return mapped;
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
