//! HTTP client for the residence management REST API.
//!
//! This module provides a synchronous HTTP client that can be used from async contexts
//! via `tokio::task::spawn_blocking`. The client handles error mapping and payload
//! validation for the service and customer endpoints.

mod async_wrapper;
pub use async_wrapper::{AsyncResidenceClient, AsyncResidenceClientImpl};

use crate::config::Config;
use crate::domain::CustomerId;
use crate::error::{ApiError, ApiResult};
use crate::metrics::{HttpTimer, Metrics};
use crate::models::{CustomerRecord, ServiceRecord, ServiceRequest};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// HTTP client for the residence management API.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct ResidenceClient {
    /// Base URL for the API
    base_url: String,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl ResidenceClient {
    /// Create a new ResidenceClient from configuration.
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .build();

        Self {
            base_url: config.api_base_url.clone(),
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Create a ResidenceClient with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            base_url,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Share an existing metrics collector with this client.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Time a request and record its outcome.
    fn execute(
        &self,
        method: &str,
        url: &str,
        request: impl FnOnce() -> Result<ureq::Response, ureq::Error>,
    ) -> ApiResult<ureq::Response> {
        tracing::debug!("{} {}", method, url);
        let timer = HttpTimer::new(self.metrics.clone());

        match request() {
            Ok(response) => {
                timer.complete();
                tracing::debug!("{} {} - status {}", method, url, response.status());
                Ok(response)
            }
            Err(e) => {
                timer.complete_with_error();
                let err = self.map_error(e);
                tracing::debug!("{} {} - error: {}", method, url, err);
                Err(err)
            }
        }
    }

    fn get(&self, path: &str) -> ApiResult<ureq::Response> {
        let url = self.build_url(path);
        self.execute("GET", &url, || {
            self.agent
                .get(&url)
                .set("Accept", "application/json")
                .call()
        })
    }

    fn post(&self, path: &str, body: &serde_json::Value) -> ApiResult<ureq::Response> {
        let url = self.build_url(path);
        self.execute("POST", &url, || {
            self.agent
                .post(&url)
                .set("Content-Type", "application/json")
                .send_json(body)
        })
    }

    fn put(&self, path: &str, body: &serde_json::Value) -> ApiResult<ureq::Response> {
        let url = self.build_url(path);
        self.execute("PUT", &url, || {
            self.agent
                .put(&url)
                .set("Content-Type", "application/json")
                .send_json(body)
        })
    }

    fn delete(&self, path: &str) -> ApiResult<ureq::Response> {
        let url = self.build_url(path);
        self.execute("DELETE", &url, || self.agent.delete(&url).call())
    }

    /// Read a response body and deserialize it.
    fn read_json<T: DeserializeOwned>(response: ureq::Response) -> ApiResult<T> {
        let body = response
            .into_string()
            .map_err(|e| ApiError::HttpError(e.to_string()))?;
        serde_json::from_str(&body).map_err(ApiError::JsonError)
    }

    /// Map a ureq error to an ApiError.
    fn map_error(&self, error: ureq::Error) -> ApiError {
        match error {
            ureq::Error::Status(code, response) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());

                match code {
                    401 | 403 => ApiError::Unauthorized,
                    404 => ApiError::NotFound(message),
                    429 => ApiError::RateLimitExceeded,
                    400 => ApiError::InvalidRequest(message),
                    _ => ApiError::ApiError {
                        status: code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    ApiError::HttpError("Connection failed".to_string())
                } else if transport.kind() == ureq::ErrorKind::Io {
                    ApiError::Timeout
                } else {
                    ApiError::HttpError(transport.to_string())
                }
            }
        }
    }

    // ========================= Service Operations =========================

    /// Get every service record.
    pub fn get_services(&self) -> ApiResult<Vec<ServiceRecord>> {
        let response = self.get("/services/")?;
        let services: Vec<ServiceRecord> = Self::read_json(response)?;
        self.metrics.record_services_fetched(services.len());
        Ok(services)
    }

    /// Get a single service record by ID.
    pub fn get_service(&self, service_id: u64) -> ApiResult<ServiceRecord> {
        let response = self.get(&format!("/services/{}/", service_id))?;
        let service: ServiceRecord = Self::read_json(response)?;
        self.metrics.record_services_fetched(1);
        Ok(service)
    }

    /// Create a new service.
    pub fn create_service(&self, request: &ServiceRequest) -> ApiResult<ServiceRecord> {
        tracing::info!(
            "Creating service for floor {} ({:?}/{})",
            request.floor,
            request.year,
            request.month
        );
        let body = serde_json::to_value(request).map_err(ApiError::JsonError)?;
        let response = self.post("/services/", &body)?;
        Self::read_json(response)
    }

    /// Update an existing service.
    pub fn update_service(
        &self,
        service_id: u64,
        request: &ServiceRequest,
    ) -> ApiResult<ServiceRecord> {
        let body = serde_json::to_value(request).map_err(ApiError::JsonError)?;
        let response = self.put(&format!("/services/{}/", service_id), &body)?;
        Self::read_json(response)
    }

    /// Delete a service.
    pub fn delete_service(&self, service_id: u64) -> ApiResult<()> {
        self.delete(&format!("/services/{}/", service_id))?;
        Ok(())
    }

    // ========================= Customer Operations =========================

    /// Get the canonical customer record for an ID.
    pub fn get_customer(&self, customer_id: &CustomerId) -> ApiResult<CustomerRecord> {
        let path = format!(
            "/api/customers/{}/",
            urlencoding::encode(customer_id.as_str())
        );
        let response = self.get(&path)?;
        Self::read_json(response)
    }
}
