//! Residence Admin - client core for the residence management dashboard.
//!
//! This library talks to the residence management REST API and builds the
//! customer side of the services screen: it merges customer ids embedded in
//! service records, hydrates them into canonical customer records, and pages
//! through the result.
//!
//! # Architecture
//!
//! - **models**: Service records, customer summaries and customer records
//! - **domain**: Validated identifiers and floor numbers
//! - **error**: Custom error types for precise error handling
//! - **config**: Configuration management from environment variables
//! - **client**: HTTP client for the REST API
//! - **repositories**: Data access traits and API-backed implementations
//! - **catalog**: In-memory service list and floor index
//! - **aggregation**: Customer id deduplication and resolution
//! - **pagination**: Bounds-safe page window over any sequence
//! - **services**: The customer view wiring used by the dashboard

pub mod aggregation;
pub mod catalog;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod models;
pub mod pagination;
pub mod repositories;
pub mod services;

pub use aggregation::{CustomerAggregator, OrderedIdSet, ResolutionOutcome, ResolvedCustomers};
pub use catalog::{ServiceCatalog, ServiceFilter};
pub use client::ResidenceClient;
pub use config::Config;
pub use domain::{CustomerId, Floor};
pub use error::{ApiError, ApiResult, ConfigError};
pub use metrics::{HttpTimer, Metrics, MetricsSummary};
pub use models::{CustomerRecord, CustomerSummary, ServiceRecord, ServiceRequest};
pub use pagination::{PageState, Paginator};
pub use services::{CustomerDetails, CustomerViewService, CustomerViewServiceImpl};
