//! Application service layer.
//!
//! Services orchestrate the catalog, the aggregator and pagination into the
//! operations the dashboard screens call. They sit between the rendering code
//! and the data access layer.

mod customer_view_service;

pub use customer_view_service::{CustomerDetails, CustomerViewService, CustomerViewServiceImpl};
