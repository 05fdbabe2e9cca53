//! Customer aggregator: turns the id set in view into hydrated customer
//! records.
//!
//! Every change to the id set starts a new snapshot. A resolution pass
//! remembers the snapshot it started from and only lands if that snapshot is
//! still current when all of its fetches are done, so a slow pass for an old
//! floor filter can never overwrite fresher data.

use super::id_set::{collect_summaries, recompute_id_set, OrderedIdSet};
use crate::domain::{CustomerId, Floor};
use crate::error::ApiResult;
use crate::metrics::Metrics;
use crate::models::{CustomerRecord, CustomerSummary, ServiceRecord};
use crate::repositories::CustomerRepository;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Resolved customers keyed by id.
pub type ResolvedCustomers = HashMap<CustomerId, CustomerRecord>;

/// What happened to a resolution request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The mapping was replaced with fresh results.
    Applied { resolved: usize, omitted: usize },
    /// The id set is empty; the mapping was cleared.
    Cleared,
    /// The mapping already reflects the current snapshot.
    AlreadyFresh,
    /// Another pass for the current snapshot is still running.
    InFlight,
    /// The id set changed while fetching; the results were dropped.
    Superseded,
}

/// Fetch every id in order and keep the ones that came back.
///
/// Failed and absent lookups are logged and left out of the mapping. They
/// never abort the remaining fetches and are not retried.
pub async fn resolve_all(ids: &OrderedIdSet, fetcher: &dyn CustomerRepository) -> ResolvedCustomers {
    let fetched: Vec<(CustomerId, ApiResult<Option<CustomerRecord>>)> =
        stream::iter(ids.iter().cloned())
            .then(move |id| async move {
                let result = fetcher.fetch(&id).await;
                (id, result)
            })
            .collect()
            .await;

    let mut resolved = ResolvedCustomers::with_capacity(fetched.len());
    for (id, result) in fetched {
        match result {
            Ok(Some(record)) => {
                resolved.insert(id, record);
            }
            Ok(None) => {
                tracing::warn!(customer_id = %id, "Customer not found; omitting from view");
            }
            Err(e) => {
                tracing::warn!(customer_id = %id, error = %e, "Failed to fetch customer; omitting from view");
            }
        }
    }
    resolved
}

#[derive(Debug, Default)]
struct AggregatorState {
    /// Bumped every time the id set changes
    generation: u64,
    ids: OrderedIdSet,
    summaries: HashMap<CustomerId, CustomerSummary>,
    resolved: ResolvedCustomers,
    /// Snapshot the current mapping was built from
    resolved_generation: Option<u64>,
    /// Snapshot a pass is currently fetching for
    in_flight: Option<u64>,
}

/// Releases the in-flight marker for a snapshot when a resolution pass ends,
/// including when its future is dropped part way through.
struct InFlightGuard<'a> {
    state: &'a Mutex<AggregatorState>,
    generation: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.in_flight == Some(self.generation) {
            state.in_flight = None;
        }
    }
}

/// Aggregates customers across service records and hydrates them.
pub struct CustomerAggregator {
    fetcher: Arc<dyn CustomerRepository>,
    state: Mutex<AggregatorState>,
    metrics: Metrics,
}

impl CustomerAggregator {
    /// Create an aggregator that resolves ids through `fetcher`.
    pub fn new(fetcher: Arc<dyn CustomerRepository>) -> Self {
        Self {
            fetcher,
            state: Mutex::new(AggregatorState::default()),
            metrics: Metrics::new(),
        }
    }

    /// Report resolution counters into a shared collector.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn lock(&self) -> MutexGuard<'_, AggregatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Recompute the id set for `services` under `floor_filter`.
    ///
    /// Returns true when the id set changed, which starts a new snapshot.
    /// An empty id set clears the resolved mapping immediately.
    pub fn update(&self, services: &[ServiceRecord], floor_filter: Option<Floor>) -> bool {
        let ids = recompute_id_set(services, floor_filter);
        let summaries = collect_summaries(services, floor_filter);

        let mut state = self.lock();
        state.summaries = summaries;
        if state.ids == ids {
            return false;
        }

        state.generation += 1;
        state.ids = ids;
        tracing::debug!(
            generation = state.generation,
            customers = state.ids.len(),
            "Customer id set changed"
        );

        if state.ids.is_empty() {
            state.resolved.clear();
            state.resolved_generation = Some(state.generation);
        }
        true
    }

    /// Resolve the current id set unless it is already resolved.
    ///
    /// If the returned future is dropped before it finishes, the snapshot is
    /// released so the next call fetches again.
    pub async fn resolve(&self) -> ResolutionOutcome {
        let (guard, ids) = {
            let mut state = self.lock();
            if state.resolved_generation == Some(state.generation) {
                return if state.ids.is_empty() {
                    ResolutionOutcome::Cleared
                } else {
                    ResolutionOutcome::AlreadyFresh
                };
            }
            if state.in_flight == Some(state.generation) {
                return ResolutionOutcome::InFlight;
            }
            state.in_flight = Some(state.generation);
            let guard = InFlightGuard {
                state: &self.state,
                generation: state.generation,
            };
            (guard, state.ids.clone())
        };
        let generation = guard.generation;

        let resolved = resolve_all(&ids, self.fetcher.as_ref()).await;
        let omitted = ids.len() - resolved.len();
        drop(guard);

        let mut state = self.lock();
        if state.generation != generation {
            tracing::warn!(
                stale_generation = generation,
                current_generation = state.generation,
                "Discarding customer resolution for a superseded id set"
            );
            self.metrics.record_resolution_superseded();
            return ResolutionOutcome::Superseded;
        }

        let count = resolved.len();
        state.resolved = resolved;
        state.resolved_generation = Some(generation);
        self.metrics.record_customers_resolved(count);
        self.metrics.record_resolution_failures(omitted);

        tracing::info!(generation, resolved = count, omitted, "Customer resolution applied");
        ResolutionOutcome::Applied {
            resolved: count,
            omitted,
        }
    }

    /// Recompute and, if needed, resolve in one step.
    pub async fn sync(
        &self,
        services: &[ServiceRecord],
        floor_filter: Option<Floor>,
    ) -> ResolutionOutcome {
        self.update(services, floor_filter);
        self.resolve().await
    }

    /// Current snapshot number.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Ids currently in view.
    pub fn ids(&self) -> OrderedIdSet {
        self.lock().ids.clone()
    }

    /// Copy of the resolved mapping.
    pub fn resolved(&self) -> ResolvedCustomers {
        self.lock().resolved.clone()
    }

    pub fn customer(&self, id: &CustomerId) -> Option<CustomerRecord> {
        self.lock().resolved.get(id).cloned()
    }

    /// Whether the mapping reflects the current id set.
    pub fn is_fresh(&self) -> bool {
        let state = self.lock();
        state.resolved_generation == Some(state.generation)
    }

    /// Resolved customers in id-set order.
    ///
    /// Ids whose resolution failed are skipped.
    pub fn customers_in_view(&self) -> Vec<(CustomerId, CustomerRecord)> {
        let state = self.lock();
        state
            .ids
            .iter()
            .filter_map(|id| state.resolved.get(id).map(|r| (id.clone(), r.clone())))
            .collect()
    }

    pub fn summary(&self, id: &CustomerId) -> Option<CustomerSummary> {
        self.lock().summaries.get(id).cloned()
    }

    /// Inline summaries whose name or father's name contains `term`,
    /// case-insensitively, in id-set order.
    pub fn search_summaries(&self, term: &str) -> Vec<(CustomerId, CustomerSummary)> {
        let state = self.lock();
        state
            .ids
            .iter()
            .filter_map(|id| state.summaries.get(id).map(|s| (id, s)))
            .filter(|(_, summary)| summary.matches(term))
            .map(|(id, summary)| (id.clone(), summary.clone()))
            .collect()
    }
}
