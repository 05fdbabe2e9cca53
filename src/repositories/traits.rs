use crate::domain::CustomerId;
use crate::error::ApiResult;
use crate::models::{CustomerRecord, ServiceRecord, ServiceRequest};
use async_trait::async_trait;

/// Repository for service records.
///
/// The upstream source for the service catalog. Implementations may talk
/// to the REST API or hold records in memory for tests.
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Retrieve every service record.
    async fn list(&self) -> ApiResult<Vec<ServiceRecord>>;

    /// Retrieve a single service by ID.
    async fn get(&self, id: u64) -> ApiResult<ServiceRecord>;

    /// Create a new service.
    async fn create(&self, request: &ServiceRequest) -> ApiResult<ServiceRecord>;

    /// Update an existing service.
    async fn update(&self, id: u64, request: &ServiceRequest) -> ApiResult<ServiceRecord>;

    /// Delete a service.
    async fn delete(&self, id: u64) -> ApiResult<()>;
}

/// Resolves customer identifiers to canonical customer records.
///
/// This is the fetch capability handed to the customer aggregator at
/// construction. `Ok(None)` means the customer does not exist; `Err` means
/// the lookup itself failed. The aggregator treats both as "no data".
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn fetch(&self, id: &CustomerId) -> ApiResult<Option<CustomerRecord>>;
}
