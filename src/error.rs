//! Unified error types for the article extractor.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::extractor::ErrorResult;

/// Message returned when the request carries no usable `url`.
pub const MISSING_URL_MESSAGE: &str = "Missing URL";

/// Top-level error type for the service binary.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Extraction error outside of a request (CLI one-shot mode).
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Metrics recorder could not be installed.
    #[error("metrics error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the extraction routine.
///
/// Every variant surfaces to HTTP callers as a 500; the variants only change
/// the wording of the message.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The input could not be parsed as an absolute URL.
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        /// The URL as received.
        url: String,
        /// Parser failure.
        source: url::ParseError,
    },

    /// The request could not be sent or timed out.
    #[error("failed to fetch URL: {0}")]
    Fetch(#[source] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{status} error for url: {url}")]
    Status {
        /// Response status code.
        status: reqwest::StatusCode,
        /// The URL that was fetched.
        url: String,
    },

    /// The response body could not be read as text.
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ExtractError {
    /// Whether the failure happened on the network side of the fetch.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Body(_))
    }

    /// Whether the failure was a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Fetch(e) | Self::Body(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/// Errors returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The client omitted or emptied the `url` field.
    #[error("{}", MISSING_URL_MESSAGE)]
    MissingInput,

    /// Anything that went wrong while extracting.
    #[error("{0}")]
    ExtractionFailed(String),
}

impl ApiError {
    /// HTTP status for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingInput => StatusCode::BAD_REQUEST,
            Self::ExtractionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        let message = if err.is_network() {
            format!("Request error: {err}")
        } else {
            err.to_string()
        };
        Self::ExtractionFailed(message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResult {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_is_bad_request() {
        let err = ApiError::MissingInput;
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), MISSING_URL_MESSAGE);
    }

    #[test]
    fn status_error_maps_to_internal_server_error() {
        let err: ApiError = ExtractError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            url: "https://example.com/missing".to_string(),
        }
        .into();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "404 Not Found error for url: https://example.com/missing"
        );
    }

    #[test]
    fn result_alias_converts_with_question_mark() {
        fn parse_port(raw: &str) -> Result<u16> {
            let port: u16 = serde_json::from_str(raw)?;
            Ok(port)
        }

        assert_eq!(parse_port("8080").unwrap(), 8080);
        assert!(matches!(parse_port("nope"), Err(AppError::Json(_))));
    }

    #[test]
    fn invalid_url_is_not_a_network_error() {
        let err = ExtractError::InvalidUrl {
            url: "not a url".to_string(),
            source: url::ParseError::RelativeUrlWithoutBase,
        };
        assert!(!err.is_network());
        assert!(!err.is_timeout());
        assert!(err.to_string().starts_with("invalid URL"));
    }
}
