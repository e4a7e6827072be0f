use axum::{extract::State, http::StatusCode, routing::{get, post}, Json, Router};
use mdl_core::{extract_error_message, is_recognized_format, parse_with, ParseOptions, Record};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub parse_options: ParseOptions,
    /// Allowed CORS origins; empty allows any.
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// Read `CORS_ALLOW_ORIGIN` (comma-separated) from the environment.
    pub fn from_env(escape_html: bool) -> Self {
        let cors_origins = std::env::var("CORS_ALLOW_ORIGIN")
            .map(|val| val.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();
        Self { parse_options: ParseOptions { escape_html }, cors_origins }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub parse_options: ParseOptions,
}

#[derive(Serialize)]
pub struct RecognizeResponse {
    pub recognized: bool,
}

#[derive(Serialize)]
pub struct ParseResponse {
    pub count: usize,
    pub records: Vec<Record>,
}

#[derive(Serialize)]
pub struct ParseFailure {
    /// User-facing text, from the body's own `message` when it has one.
    pub error: String,
    pub detail: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn build_app(config: AppConfig) -> Router {
    let origins: Vec<_> = config.cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
    let cors = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
    };

    let app_state = AppState { parse_options: config.parse_options };
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/recognize", post(recognize_handler))
        .route("/parse", post(parse_handler))
        .route("/error-message", post(error_message_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn recognize_handler(body: String) -> Json<RecognizeResponse> {
    Json(RecognizeResponse { recognized: is_recognized_format(&body) })
}

pub async fn parse_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ParseResponse>, (StatusCode, Json<ParseFailure>)> {
    match parse_with(&body, &state.parse_options) {
        Ok(records) => {
            let records = records.into_records();
            tracing::info!(count = records.len(), "parsed payload");
            Ok(Json(ParseResponse { count: records.len(), records }))
        }
        Err(e) => {
            tracing::warn!(error = %e, "rejected payload");
            let failure = ParseFailure { error: extract_error_message(&body), detail: e.to_string() };
            Err((StatusCode::UNPROCESSABLE_ENTITY, Json(failure)))
        }
    }
}

pub async fn error_message_handler(body: String) -> Json<MessageResponse> {
    Json(MessageResponse { message: extract_error_message(&body) })
}
