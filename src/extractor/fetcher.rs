//! Outbound page fetching.

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, instrument, warn};

use super::parser::{parse_article, parse_url};
use super::types::ExtractionResult;
use crate::config::Config;
use crate::error::ExtractError;
use crate::metrics;

/// Fetches pages and turns them into articles.
///
/// Holds one `reqwest::Client` so connections are pooled across requests.
#[derive(Debug, Clone)]
pub struct ArticleFetcher {
    /// HTTP client with the User-Agent and timeout baked in.
    http: reqwest::Client,
}

impl ArticleFetcher {
    /// Create a fetcher from the server configuration.
    pub fn new(config: &Config) -> Result<Self, ExtractError> {
        Self::with_settings(&config.user_agent, config.fetch_timeout())
    }

    /// Create a fetcher with an explicit User-Agent and timeout.
    pub fn with_settings(user_agent: &str, timeout: Duration) -> Result<Self, ExtractError> {
        let mut headers = HeaderMap::new();
        // An invalid UA falls back to reqwest's default rather than failing startup.
        match HeaderValue::from_str(user_agent) {
            Ok(value) => {
                headers.insert(USER_AGENT, value);
            }
            Err(e) => warn!(error = %e, "Ignoring invalid User-Agent"),
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(ExtractError::Client)?;

        Ok(Self { http })
    }

    /// Fetch `url` and extract its article.
    ///
    /// Non-2xx responses, timeouts and transport errors all fail. Nothing is
    /// retried.
    #[instrument(skip(self))]
    pub async fn extract(&self, url: &str) -> Result<ExtractionResult, ExtractError> {
        let html = self.fetch(url).await?;
        parse_article(url, &html)
    }

    /// GET `url` and return the body as text.
    async fn fetch(&self, url: &str) -> Result<String, ExtractError> {
        let target = parse_url(url)?;
        let start = Instant::now();

        let response = match self.http.get(target).send().await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_fetch_latency(start, metrics::FETCH_ERROR_STATUS);
                return Err(ExtractError::Fetch(e));
            }
        };

        let status = response.status();
        debug!(status = %status, "Received response");

        if !status.is_success() {
            metrics::record_fetch_latency(start, status.as_str());
            return Err(ExtractError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                metrics::record_fetch_latency(start, metrics::FETCH_ERROR_STATUS);
                return Err(ExtractError::Body(e));
            }
        };
        metrics::record_fetch_latency(start, status.as_str());
        debug!(bytes = body.len(), "Read response body");

        Ok(body)
    }
}
