use crate::client::AsyncResidenceClient;
use crate::domain::CustomerId;
use crate::error::ApiResult;
use crate::models::CustomerRecord;
use crate::repositories::traits::CustomerRepository;
use async_trait::async_trait;
use std::sync::Arc;

/// Customer repository backed by `GET /api/customers/{id}/`.
///
/// A 404 from the API is reported as an absent customer rather than an
/// error.
pub struct ApiCustomerRepository {
    client: Arc<dyn AsyncResidenceClient>,
}

impl ApiCustomerRepository {
    /// Create a new ApiCustomerRepository with the given client.
    pub fn new(client: Arc<dyn AsyncResidenceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CustomerRepository for ApiCustomerRepository {
    async fn fetch(&self, id: &CustomerId) -> ApiResult<Option<CustomerRecord>> {
        match self.client.get_customer(id).await {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
