//! Domain value objects and types.
//!
//! Type-safe wrappers for the identifiers that join service records to
//! customer records, and for the floor numbers used to filter them. Both
//! validate at construction so malformed payloads are rejected at the REST
//! boundary.

pub mod customer_id;
pub mod errors;
pub mod floor;

pub use customer_id::CustomerId;
pub use errors::ValidationError;
pub use floor::Floor;
