//! Payload types for the extraction endpoint.

use serde::{Deserialize, Serialize};

/// Inbound body of `POST /extract`.
///
/// `url` is optional so that a body without it still decodes; the handler
/// decides what counts as missing.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExtractionRequest {
    /// Page to extract.
    #[serde(default)]
    pub url: Option<String>,
}

impl ExtractionRequest {
    /// Decode a raw body, ignoring the declared content type.
    ///
    /// Returns `None` when the body is not JSON or `url` is absent or empty.
    pub fn url_from_body(body: &[u8]) -> Option<String> {
        let request: Self = serde_json::from_slice(body).ok()?;
        request.url.filter(|url| !url.is_empty())
    }
}

/// A successfully extracted article.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtractionResult {
    /// Trimmed `<title>` text, or "No title".
    pub title: String,
    /// Host of the URL without a leading "www.".
    pub domain: String,
    /// The URL exactly as the caller sent it.
    pub url: String,
    /// Non-empty paragraph texts joined by single spaces.
    pub content: String,
}

/// Error payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorResult {
    /// Human-readable message.
    pub error: String,
}
