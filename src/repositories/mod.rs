mod api_customer_repository;
mod api_service_repository;
mod traits;

pub use api_customer_repository::ApiCustomerRepository;
pub use api_service_repository::ApiServiceRepository;
pub use traits::{CustomerRepository, ServiceRepository};
