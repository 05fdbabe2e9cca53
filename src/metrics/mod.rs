//! Basic metrics instrumentation.
//!
//! Counters for HTTP traffic against the residence API and for the outcome of
//! customer resolution passes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector shared by the client and the aggregator.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total number of HTTP requests made
    http_requests_total: Arc<AtomicU64>,

    /// Total number of HTTP errors
    http_errors_total: Arc<AtomicU64>,

    /// Total duration of all HTTP requests in milliseconds
    http_duration_total_ms: Arc<AtomicU64>,

    /// Number of service records fetched
    services_fetched_total: Arc<AtomicU64>,

    /// Number of customers successfully resolved
    customers_resolved_total: Arc<AtomicU64>,

    /// Number of customer fetches that failed or came back empty
    resolution_failures_total: Arc<AtomicU64>,

    /// Number of resolution passes discarded because a newer id set replaced them
    resolutions_superseded_total: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            http_requests_total: Arc::new(AtomicU64::new(0)),
            http_errors_total: Arc::new(AtomicU64::new(0)),
            http_duration_total_ms: Arc::new(AtomicU64::new(0)),
            services_fetched_total: Arc::new(AtomicU64::new(0)),
            customers_resolved_total: Arc::new(AtomicU64::new(0)),
            resolution_failures_total: Arc::new(AtomicU64::new(0)),
            resolutions_superseded_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record an HTTP request with duration.
    pub fn record_http_request(&self, duration: Duration) {
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
        self.http_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record an HTTP error.
    pub fn record_http_error(&self) {
        self.http_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_services_fetched(&self, count: usize) {
        self.services_fetched_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_customers_resolved(&self, count: usize) {
        self.customers_resolved_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record customers left out of a resolution pass.
    pub fn record_resolution_failures(&self, count: usize) {
        self.resolution_failures_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_resolution_superseded(&self) {
        self.resolutions_superseded_total
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Get total HTTP requests.
    pub fn http_requests_total(&self) -> u64 {
        self.http_requests_total.load(Ordering::Relaxed)
    }

    /// Get total HTTP errors.
    pub fn http_errors_total(&self) -> u64 {
        self.http_errors_total.load(Ordering::Relaxed)
    }

    /// Get total HTTP duration in milliseconds.
    pub fn http_duration_total_ms(&self) -> u64 {
        self.http_duration_total_ms.load(Ordering::Relaxed)
    }

    /// Get average HTTP request duration in milliseconds.
    pub fn http_duration_avg_ms(&self) -> f64 {
        let total = self.http_duration_total_ms.load(Ordering::Relaxed);
        let count = self.http_requests_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    pub fn services_fetched_total(&self) -> u64 {
        self.services_fetched_total.load(Ordering::Relaxed)
    }

    pub fn customers_resolved_total(&self) -> u64 {
        self.customers_resolved_total.load(Ordering::Relaxed)
    }

    pub fn resolution_failures_total(&self) -> u64 {
        self.resolution_failures_total.load(Ordering::Relaxed)
    }

    pub fn resolutions_superseded_total(&self) -> u64 {
        self.resolutions_superseded_total.load(Ordering::Relaxed)
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        self.http_requests_total.store(0, Ordering::Relaxed);
        self.http_errors_total.store(0, Ordering::Relaxed);
        self.http_duration_total_ms.store(0, Ordering::Relaxed);
        self.services_fetched_total.store(0, Ordering::Relaxed);
        self.customers_resolved_total.store(0, Ordering::Relaxed);
        self.resolution_failures_total.store(0, Ordering::Relaxed);
        self.resolutions_superseded_total.store(0, Ordering::Relaxed);
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            http_requests_total: self.http_requests_total(),
            http_errors_total: self.http_errors_total(),
            http_duration_total_ms: self.http_duration_total_ms(),
            http_duration_avg_ms: self.http_duration_avg_ms(),
            services_fetched_total: self.services_fetched_total(),
            customers_resolved_total: self.customers_resolved_total(),
            resolution_failures_total: self.resolution_failures_total(),
            resolutions_superseded_total: self.resolutions_superseded_total(),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub http_duration_total_ms: u64,
    pub http_duration_avg_ms: f64,
    pub services_fetched_total: u64,
    pub customers_resolved_total: u64,
    pub resolution_failures_total: u64,
    pub resolutions_superseded_total: u64,
}

/// Helper for timing HTTP requests.
pub struct HttpTimer {
    start: Instant,
    metrics: Metrics,
}

impl HttpTimer {
    /// Start timing an HTTP request.
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Complete the timing and record the duration.
    pub fn complete(self) {
        let duration = self.start.elapsed();
        self.metrics.record_http_request(duration);
    }

    /// Complete the timing and record as an error.
    pub fn complete_with_error(self) {
        let duration = self.start.elapsed();
        self.metrics.record_http_request(duration);
        self.metrics.record_http_error();
    }
}
