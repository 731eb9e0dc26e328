//! Prometheus metrics for extraction requests.
//!
//! This module provides:
//! - Outbound fetch latency, labelled by status code
//! - Extraction outcome counters
//! - A timer guard for end-to-end extraction latency

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Outbound fetch latency metric name.
pub const METRIC_FETCH_LATENCY: &str = "fetch_latency_ms";
/// End-to-end extraction latency metric name.
pub const METRIC_EXTRACTION_LATENCY: &str = "extraction_latency_ms";
/// Extraction requests counter metric name.
pub const METRIC_EXTRACTIONS_REQUESTED: &str = "extractions_requested_total";
/// Successful extractions counter metric name.
pub const METRIC_EXTRACTIONS_SUCCEEDED: &str = "extractions_succeeded_total";
/// Failed extractions counter metric name.
pub const METRIC_EXTRACTIONS_FAILED: &str = "extractions_failed_total";
/// Rejected requests (missing URL) counter metric name.
pub const METRIC_REQUESTS_REJECTED: &str = "requests_rejected_total";

/// `status` label for fetches that never got a response (timeout, connect error).
pub const FETCH_ERROR_STATUS: &str = "error";

/// Install the Prometheus recorder and register metric descriptions.
/// Call this once at startup; a second call fails.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_histogram!(
        METRIC_FETCH_LATENCY,
        "Outbound page fetch latency in milliseconds"
    );
    describe_histogram!(
        METRIC_EXTRACTION_LATENCY,
        "End-to-end extraction latency in milliseconds"
    );

    describe_counter!(
        METRIC_EXTRACTIONS_REQUESTED,
        "Total number of extraction requests with a URL"
    );
    describe_counter!(
        METRIC_EXTRACTIONS_SUCCEEDED,
        "Total number of successful extractions"
    );
    describe_counter!(
        METRIC_EXTRACTIONS_FAILED,
        "Total number of failed extractions"
    );
    describe_counter!(
        METRIC_REQUESTS_REJECTED,
        "Total number of extraction requests rejected for missing URL"
    );

    debug!("Metrics initialized");
    Ok(handle)
}

/// Record outbound fetch latency, labelled by status code or [`FETCH_ERROR_STATUS`].
pub fn record_fetch_latency(start: Instant, status: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_FETCH_LATENCY, "status" => status.to_string()).record(latency_ms);
}

/// Increment extraction requested counter.
pub fn inc_extractions_requested() {
    counter!(METRIC_EXTRACTIONS_REQUESTED).increment(1);
}

/// Increment extraction succeeded counter.
pub fn inc_extractions_succeeded() {
    counter!(METRIC_EXTRACTIONS_SUCCEEDED).increment(1);
}

/// Increment extraction failed counter.
pub fn inc_extractions_failed() {
    counter!(METRIC_EXTRACTIONS_FAILED).increment(1);
}

/// Increment rejected request counter.
pub fn inc_requests_rejected() {
    counter!(METRIC_REQUESTS_REJECTED).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name).record(self.elapsed_ms());
    }
}

/// Create a latency timer for a whole extraction.
pub fn timer_extraction() -> LatencyTimer {
    LatencyTimer::new(METRIC_EXTRACTION_LATENCY)
}
