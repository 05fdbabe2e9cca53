pub mod mock_customer_repository;
pub mod mock_service_repository;

#[allow(unused_imports)]
pub use mock_customer_repository::MockCustomerRepository;
#[allow(unused_imports)]
pub use mock_service_repository::MockServiceRepository;
