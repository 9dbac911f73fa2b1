//! HTTP request handlers
//!
//! Detection is CPU-bound, so each request runs the engine on the blocking
//! pool under the configured analysis timeout.

use crate::anonymization::{Detection, ScrubEngine};
use crate::domain::{Result, ScrubError};
use crate::server::auth::authorize;
use crate::server::errors::{ApiError, ApiResult};
use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body of `POST /scrub` and `POST /analyze`
#[derive(Debug, Clone, Deserialize)]
pub struct ScrubRequest {
    /// Text to scrub
    #[serde(alias = "text")]
    pub transcript: String,

    /// Language code; the engine default when absent
    #[serde(default, alias = "language")]
    pub lang: Option<String>,

    /// Extra context words for this request
    #[serde(default)]
    pub context: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrubResponse {
    pub scrubbed_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub language: String,
    pub detections: Vec<Detection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub languages: Vec<String>,
    pub recognizers: usize,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// `POST /scrub`
pub async fn scrub(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<ScrubRequest>, JsonRejection>,
) -> ApiResult<Json<ScrubResponse>> {
    authorize(&headers, &state.api_key)?;
    let Json(request) = payload?;

    let language = request_language(&state, &request);
    tracing::debug!(language = %language, chars = request.transcript.chars().count(), "Scrub request");

    let lang = language.clone();
    let outcome = run_blocking(&state, &language, move |engine| {
        engine.scrub_with_context(&request.transcript, &lang, &request.context)
    })
    .await?;

    Ok(Json(ScrubResponse {
        scrubbed_text: outcome.text,
    }))
}

/// `POST /analyze`
pub async fn analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<ScrubRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeResponse>> {
    authorize(&headers, &state.api_key)?;
    let Json(request) = payload?;

    let language = request_language(&state, &request);
    let lang = language.clone();
    let detections = run_blocking(&state, &language, move |engine| {
        engine.analyze(&request.transcript, &lang, &request.context)
    })
    .await?;

    Ok(Json(AnalyzeResponse {
        language,
        detections,
    }))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let analyzer = state.engine.analyzer();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        languages: analyzer.supported_languages().to_vec(),
        recognizers: analyzer.registry().len(),
    })
}

fn request_language(state: &AppState, request: &ScrubRequest) -> String {
    request
        .lang
        .as_deref()
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .unwrap_or_else(|| state.engine.default_language())
        .to_string()
}

async fn run_blocking<T, F>(state: &AppState, language: &str, work: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&ScrubEngine) -> Result<T> + Send + 'static,
{
    let engine = Arc::clone(&state.engine);
    let task = tokio::task::spawn_blocking(move || work(&engine));

    match tokio::time::timeout(state.timeout, task).await {
        Ok(Ok(result)) => Ok(result?),
        Ok(Err(e)) => Err(ApiError::Internal(format!("analysis task failed: {e}"))),
        Err(_) => Err(ScrubError::analysis(
            language,
            format!("analysis timed out after {} ms", state.timeout.as_millis()),
        )
        .into()),
    }
}
