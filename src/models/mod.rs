//! Data models for the residence management API.
//!
//! Service records and the customers they embed, plus the canonical customer
//! record resolved by id. Required and optional fields are explicit so bad
//! payloads fail at deserialization rather than deep inside the aggregator.

pub mod customer;
pub mod service;

pub use customer::{CustomerRecord, CustomerSummary};
pub use service::{CustomerList, ServiceRecord, ServiceRequest};
