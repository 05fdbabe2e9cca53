//! Customer aggregation across service records.
//!
//! - **id_set**: deduplicated, first-seen-ordered customer ids for the
//!   services in view, plus their inline summaries
//! - **aggregator**: snapshot-guarded resolution of those ids into canonical
//!   customer records

pub mod aggregator;
pub mod id_set;

pub use aggregator::{resolve_all, CustomerAggregator, ResolutionOutcome, ResolvedCustomers};
pub use id_set::{collect_summaries, recompute_id_set, services_in_view, OrderedIdSet};
