use crate::client::AsyncResidenceClient;
use crate::error::ApiResult;
use crate::models::{ServiceRecord, ServiceRequest};
use crate::repositories::traits::ServiceRepository;
use async_trait::async_trait;
use std::sync::Arc;

/// Service repository implementation using the residence API client.
///
/// Delegates all operations to the AsyncResidenceClient.
pub struct ApiServiceRepository {
    client: Arc<dyn AsyncResidenceClient>,
}

impl ApiServiceRepository {
    /// Create a new ApiServiceRepository with the given client.
    pub fn new(client: Arc<dyn AsyncResidenceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ServiceRepository for ApiServiceRepository {
    async fn list(&self) -> ApiResult<Vec<ServiceRecord>> {
        self.client.get_services().await
    }

    async fn get(&self, id: u64) -> ApiResult<ServiceRecord> {
        self.client.get_service(id).await
    }

    async fn create(&self, request: &ServiceRequest) -> ApiResult<ServiceRecord> {
        self.client.create_service(request).await
    }

    async fn update(&self, id: u64, request: &ServiceRequest) -> ApiResult<ServiceRecord> {
        self.client.update_service(id, request).await
    }

    async fn delete(&self, id: u64) -> ApiResult<()> {
        self.client.delete_service(id).await
    }
}
