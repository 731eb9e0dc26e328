//! HTTP API handlers.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::ApiError;
use crate::extractor::{ArticleFetcher, ExtractionRequest, ExtractionResult};
use crate::metrics;

/// Plain-text body of the liveness route.
pub const LIVENESS_MESSAGE: &str = "Article Extractor is running";

/// Application state shared with handlers.
///
/// Everything in here is immutable after startup.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Fetcher used by the extraction route.
    pub fetcher: ArticleFetcher,
    /// Prometheus handle, when a recorder was installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(fetcher: ArticleFetcher, metrics: Option<PrometheusHandle>) -> Self {
        Self { fetcher, metrics }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Liveness handler - always returns 200 with a fixed message.
pub async fn liveness() -> &'static str {
    info!("Liveness check");
    LIVENESS_MESSAGE
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Extraction handler.
///
/// The body is decoded as JSON whatever its content type. A body that is not
/// JSON, or has no non-empty `url`, is a 400; any extraction failure is a 500.
/// A body that cannot be read at all (e.g. over the size limit) is also a 400.
pub async fn extract(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ExtractionResult>, ApiError> {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "Could not read request body");
            metrics::inc_requests_rejected();
            return Err(ApiError::MissingInput);
        }
    };

    info!(payload = %String::from_utf8_lossy(&body), "Received extraction request");

    let Some(url) = ExtractionRequest::url_from_body(&body) else {
        warn!("No URL provided");
        metrics::inc_requests_rejected();
        return Err(ApiError::MissingInput);
    };

    metrics::inc_extractions_requested();
    let _timer = metrics::timer_extraction();

    match state.fetcher.extract(&url).await {
        Ok(article) => {
            info!(
                title = %article.title,
                domain = %article.domain,
                "Extraction successful"
            );
            metrics::inc_extractions_succeeded();
            Ok(Json(article))
        }
        Err(e) => {
            error!(url = %url, error = %e, "Extraction failed");
            metrics::inc_extractions_failed();
            Err(e.into())
        }
    }
}

/// Metrics handler - Prometheus text format, 404 without a recorder.
pub async fn metrics_export(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
