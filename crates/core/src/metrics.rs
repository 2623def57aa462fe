//! Metrics definitions for the connection resolver.
//!
//! This module defines all metrics used throughout the resolution pipeline.
//! Metrics are collected using the `metrics` crate and can be exported
//! to Prometheus via `metrics-exporter-prometheus` by the host.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Instant;

/// Initialize all metric descriptions.
/// Call this once at startup before any metrics are recorded.
pub fn init_metrics() {
    describe_counter!(
        "resolutions_total",
        "Total number of connection resolutions attempted"
    );
    describe_counter!(
        "malformed_cursors_total",
        "Total number of boundary cursors that failed to decode"
    );
    describe_counter!(
        "dropped_filters_total",
        "Total number of filter keys dropped during translation"
    );
    describe_counter!(
        "upstream_errors_total",
        "Total number of data source failures during resolution"
    );
    describe_histogram!(
        "resolve_duration_seconds",
        "Time taken to resolve a connection in seconds"
    );
}

/// Record a resolution attempt.
pub fn record_resolution() {
    counter!("resolutions_total").increment(1);
}

/// Record a boundary cursor that failed to decode.
pub fn record_malformed_cursor() {
    counter!("malformed_cursors_total").increment(1);
}

/// Record a filter key dropped by the translator.
///
/// # Arguments
/// * `key` - The unrecognized filter key
pub fn record_dropped_filter(key: &str) {
    counter!("dropped_filters_total", "key" => key.to_string()).increment(1);
}

/// Record a data source failure.
///
/// # Arguments
/// * `operation` - The failed operation ("fetch" or "count")
pub fn record_upstream_error(operation: &str) {
    counter!("upstream_errors_total", "operation" => operation.to_string()).increment(1);
}

/// Record resolution duration.
pub fn record_resolve_duration(duration_secs: f64) {
    histogram!("resolve_duration_seconds").record(duration_secs);
}

/// A timer that automatically records duration when dropped.
pub struct ResolveTimer {
    start: Instant,
}

impl ResolveTimer {
    /// Start a new resolution timer.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for ResolveTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ResolveTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_resolve_duration(duration);
    }
}
