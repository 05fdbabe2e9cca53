//! Customer view service layer.
//!
//! Wires the service catalog, the customer aggregator and a paginator into
//! the customer panel of the services screen. Any change to the services or
//! to the floor filter recomputes the id set and resolves it again; the
//! paginator is kept in range against whatever the aggregator currently
//! shows.

use crate::aggregation::{CustomerAggregator, ResolutionOutcome};
use crate::catalog::{ServiceCatalog, ServiceFilter};
use crate::domain::{CustomerId, Floor};
use crate::error::ApiResult;
use crate::models::{CustomerRecord, CustomerSummary, ServiceRecord, ServiceRequest};
use crate::pagination::{PageState, Paginator};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::RwLock;

/// Everything the detail modal shows for one customer.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDetails {
    pub id: CustomerId,
    /// Inline data from the services in view
    pub summary: Option<CustomerSummary>,
    /// Canonical record, if it resolved
    pub record: Option<CustomerRecord>,
    /// Year of the first service listing this customer
    pub service_year: Option<String>,
    /// Billing period of that service
    pub service_time: Option<String>,
}

/// Customer view operations for the dashboard.
#[async_trait]
pub trait CustomerViewService: Send + Sync {
    /// Reload services from the API and bring the customer view up to date.
    ///
    /// Fails only when the service list cannot be loaded; stale services stay
    /// visible in that case.
    async fn refresh_services(&self) -> ApiResult<ResolutionOutcome>;

    /// Change the floor filter (`None` shows every floor).
    async fn select_floor(&self, floor: Option<Floor>) -> ResolutionOutcome;

    /// Recompute the id set and resolve it if it changed.
    async fn sync(&self) -> ResolutionOutcome;

    async fn available_floors(&self) -> Vec<Floor>;

    async fn filter_services(&self, filter: &ServiceFilter) -> Vec<ServiceRecord>;

    async fn customer_details(&self, id: &CustomerId) -> Option<CustomerDetails>;

    async fn add_service(&self, request: &ServiceRequest) -> ApiResult<ServiceRecord>;

    async fn update_service(&self, id: u64, request: &ServiceRequest)
        -> ApiResult<ServiceRecord>;

    async fn delete_service(&self, id: u64) -> ApiResult<()>;

    /// Re-read one service from the API and bring the customer view up to
    /// date with it.
    async fn reload_service(&self, id: u64) -> ApiResult<ServiceRecord>;

    fn selected_floor(&self) -> Option<Floor>;

    /// Resolved customers on the current page.
    fn page(&self) -> Vec<(CustomerId, CustomerRecord)>;

    fn next_page(&self) -> PageState;

    fn previous_page(&self) -> PageState;

    fn jump_to_page(&self, page: i64) -> PageState;

    fn page_state(&self) -> PageState;

    /// Customers in view whose inline name or father's name contains `term`.
    fn search(&self, term: &str) -> Vec<(CustomerId, CustomerSummary)>;
}

struct ViewState {
    floor_filter: Option<Floor>,
    paginator: Paginator,
}

/// Default implementation of CustomerViewService.
pub struct CustomerViewServiceImpl {
    catalog: RwLock<ServiceCatalog>,
    aggregator: CustomerAggregator,
    view: Mutex<ViewState>,
}

impl CustomerViewServiceImpl {
    /// Create a new customer view service.
    pub fn new(catalog: ServiceCatalog, aggregator: CustomerAggregator, paginator: Paginator) -> Self {
        Self {
            catalog: RwLock::new(catalog),
            aggregator,
            view: Mutex::new(ViewState {
                floor_filter: None,
                paginator,
            }),
        }
    }

    pub fn aggregator(&self) -> &CustomerAggregator {
        &self.aggregator
    }

    fn lock_view(&self) -> MutexGuard<'_, ViewState> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn in_view_len(&self) -> usize {
        self.aggregator.customers_in_view().len()
    }

    fn move_page(&self, step: impl FnOnce(&mut Paginator, usize)) -> PageState {
        let len = self.in_view_len();
        let mut view = self.lock_view();
        step(&mut view.paginator, len);
        view.paginator.state()
    }
}

#[async_trait]
impl CustomerViewService for CustomerViewServiceImpl {
    async fn refresh_services(&self) -> ApiResult<ResolutionOutcome> {
        self.catalog.write().await.refresh().await?;
        Ok(self.sync().await)
    }

    async fn select_floor(&self, floor: Option<Floor>) -> ResolutionOutcome {
        self.lock_view().floor_filter = floor;
        tracing::debug!(floor = ?floor, "Floor filter changed");
        self.sync().await
    }

    async fn sync(&self) -> ResolutionOutcome {
        let floor = self.selected_floor();
        {
            let catalog = self.catalog.read().await;
            self.aggregator.update(catalog.services(), floor);
        }
        let outcome = self.aggregator.resolve().await;

        let len = self.in_view_len();
        self.lock_view().paginator.observe(len);
        outcome
    }

    async fn available_floors(&self) -> Vec<Floor> {
        self.catalog.read().await.available_floors().to_vec()
    }

    async fn filter_services(&self, filter: &ServiceFilter) -> Vec<ServiceRecord> {
        self.catalog
            .read()
            .await
            .filter_services(filter)
            .into_iter()
            .cloned()
            .collect()
    }

    async fn customer_details(&self, id: &CustomerId) -> Option<CustomerDetails> {
        let summary = self.aggregator.summary(id);
        let record = self.aggregator.customer(id);
        if summary.is_none() && record.is_none() {
            tracing::warn!(customer_id = %id, "Customer is not in the current view");
            return None;
        }

        let catalog = self.catalog.read().await;
        let service = catalog.find_service_for_customer(id);
        Some(CustomerDetails {
            id: id.clone(),
            summary,
            record,
            service_year: service.and_then(|s| s.year.clone()),
            service_time: service.and_then(|s| s.time.clone()),
        })
    }

    async fn add_service(&self, request: &ServiceRequest) -> ApiResult<ServiceRecord> {
        let created = self.catalog.write().await.add_service(request).await?;
        self.sync().await;
        Ok(created)
    }

    async fn update_service(
        &self,
        id: u64,
        request: &ServiceRequest,
    ) -> ApiResult<ServiceRecord> {
        let updated = self.catalog.write().await.update_service(id, request).await?;
        self.sync().await;
        Ok(updated)
    }

    async fn delete_service(&self, id: u64) -> ApiResult<()> {
        self.catalog.write().await.delete_service(id).await?;
        self.sync().await;
        Ok(())
    }

    async fn reload_service(&self, id: u64) -> ApiResult<ServiceRecord> {
        let reloaded = self.catalog.write().await.reload_service(id).await?;
        self.sync().await;
        Ok(reloaded)
    }

    fn selected_floor(&self) -> Option<Floor> {
        self.lock_view().floor_filter
    }

    fn page(&self) -> Vec<(CustomerId, CustomerRecord)> {
        let customers = self.aggregator.customers_in_view();
        let mut view = self.lock_view();
        view.paginator.current_slice(&customers).to_vec()
    }

    fn next_page(&self) -> PageState {
        self.move_page(|paginator, len| {
            paginator.next(len);
        })
    }

    fn previous_page(&self) -> PageState {
        self.move_page(|paginator, len| {
            paginator.previous(len);
        })
    }

    fn jump_to_page(&self, page: i64) -> PageState {
        self.move_page(|paginator, len| {
            paginator.jump(page, len);
        })
    }

    fn page_state(&self) -> PageState {
        self.move_page(|paginator, len| paginator.observe(len))
    }

    fn search(&self, term: &str) -> Vec<(CustomerId, CustomerSummary)> {
        self.aggregator.search_summaries(term)
    }
}
