//! Async wrapper around synchronous ResidenceClient.
//!
//! This module provides an async interface to the synchronous ResidenceClient by using
//! `tokio::task::spawn_blocking` to run HTTP operations on a dedicated thread pool,
//! preventing blocking of the async runtime.

use crate::client::ResidenceClient;
use crate::domain::CustomerId;
use crate::error::{ApiError, ApiResult};
use crate::models::{CustomerRecord, ServiceRecord, ServiceRequest};
use async_trait::async_trait;
use std::sync::Arc;

/// Async client operations for the residence API.
#[async_trait]
pub trait AsyncResidenceClient: Send + Sync {
    async fn get_services(&self) -> ApiResult<Vec<ServiceRecord>>;
    async fn get_service(&self, id: u64) -> ApiResult<ServiceRecord>;
    async fn create_service(&self, request: &ServiceRequest) -> ApiResult<ServiceRecord>;
    async fn update_service(&self, id: u64, request: &ServiceRequest)
        -> ApiResult<ServiceRecord>;
    async fn delete_service(&self, id: u64) -> ApiResult<()>;

    async fn get_customer(&self, id: &CustomerId) -> ApiResult<CustomerRecord>;
}

/// Async wrapper around synchronous ResidenceClient.
///
/// Uses `tokio::task::spawn_blocking` to run synchronous HTTP
/// operations on a dedicated thread pool.
#[derive(Clone)]
pub struct AsyncResidenceClientImpl {
    client: Arc<ResidenceClient>,
}

impl AsyncResidenceClientImpl {
    pub fn new(client: ResidenceClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

fn join_error(e: tokio::task::JoinError) -> ApiError {
    ApiError::HttpError(format!("Task join error: {}", e))
}

#[async_trait]
impl AsyncResidenceClient for AsyncResidenceClientImpl {
    async fn get_services(&self) -> ApiResult<Vec<ServiceRecord>> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.get_services())
            .await
            .map_err(join_error)?
    }

    async fn get_service(&self, id: u64) -> ApiResult<ServiceRecord> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.get_service(id))
            .await
            .map_err(join_error)?
    }

    async fn create_service(&self, request: &ServiceRequest) -> ApiResult<ServiceRecord> {
        let client = self.client.clone();
        let request = request.clone();

        tokio::task::spawn_blocking(move || client.create_service(&request))
            .await
            .map_err(join_error)?
    }

    async fn update_service(
        &self,
        id: u64,
        request: &ServiceRequest,
    ) -> ApiResult<ServiceRecord> {
        let client = self.client.clone();
        let request = request.clone();

        tokio::task::spawn_blocking(move || client.update_service(id, &request))
            .await
            .map_err(join_error)?
    }

    async fn delete_service(&self, id: u64) -> ApiResult<()> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.delete_service(id))
            .await
            .map_err(join_error)?
    }

    async fn get_customer(&self, id: &CustomerId) -> ApiResult<CustomerRecord> {
        let client = self.client.clone();
        let id = id.clone();

        tokio::task::spawn_blocking(move || client.get_customer(&id))
            .await
            .map_err(join_error)?
    }
}
