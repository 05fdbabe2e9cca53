//! Service catalog: the in-memory list of service records and the floors
//! they cover.
//!
//! The catalog is the upstream source for customer aggregation. Its service
//! list is replaced wholesale on refresh; individual records are never
//! patched field by field.

use crate::domain::{CustomerId, Floor};
use crate::error::ApiResult;
use crate::models::{ServiceRecord, ServiceRequest};
use crate::repositories::ServiceRepository;
use std::collections::HashSet;
use std::sync::Arc;

/// Conjunctive filter for the services table. `None` fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceFilter {
    pub year: Option<String>,
    pub month: Option<u8>,
    pub floor: Option<Floor>,
}

impl ServiceFilter {
    pub fn matches(&self, service: &ServiceRecord) -> bool {
        let year_ok = self
            .year
            .as_ref()
            .map_or(true, |year| service.year.as_ref() == Some(year));
        let month_ok = self.month.map_or(true, |month| service.month == Some(month));
        let floor_ok = self.floor.map_or(true, |floor| service.floor == floor);
        year_ok && month_ok && floor_ok
    }
}

/// Distinct floors in first-seen order.
fn distinct_floors(services: &[ServiceRecord]) -> Vec<Floor> {
    let mut seen = HashSet::new();
    services
        .iter()
        .map(|service| service.floor)
        .filter(|floor| seen.insert(*floor))
        .collect()
}

/// Holds the service records loaded from the API.
pub struct ServiceCatalog {
    repo: Arc<dyn ServiceRepository>,
    services: Vec<ServiceRecord>,
    floors: Vec<Floor>,
    revision: u64,
    last_error: Option<String>,
}

impl ServiceCatalog {
    pub fn new(repo: Arc<dyn ServiceRepository>) -> Self {
        Self {
            repo,
            services: Vec::new(),
            floors: Vec::new(),
            revision: 0,
            last_error: None,
        }
    }

    pub fn services(&self) -> &[ServiceRecord] {
        &self.services
    }

    /// Floors present in the catalog, in first-seen order.
    pub fn available_floors(&self) -> &[Floor] {
        &self.floors
    }

    /// Incremented on every change to the service list.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Message of the most recent failed refresh, cleared by a successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Replace the whole service list.
    pub fn replace(&mut self, services: Vec<ServiceRecord>) {
        self.floors = distinct_floors(&services);
        self.services = services;
        self.revision += 1;
    }

    fn touch(&mut self) {
        self.floors = distinct_floors(&self.services);
        self.revision += 1;
    }

    /// Reload every service from the repository.
    ///
    /// On failure the previous services stay in place and the error is both
    /// remembered and returned.
    pub async fn refresh(&mut self) -> ApiResult<usize> {
        match self.repo.list().await {
            Ok(services) => {
                let count = services.len();
                self.replace(services);
                self.last_error = None;
                tracing::info!(
                    services = count,
                    floors = self.floors.len(),
                    "Service catalog refreshed"
                );
                Ok(count)
            }
            Err(e) => {
                tracing::error!("Failed to load services: {}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Create a service and append it to the catalog.
    pub async fn add_service(&mut self, request: &ServiceRequest) -> ApiResult<ServiceRecord> {
        let created = self.repo.create(request).await?;
        self.services.push(created.clone());
        self.touch();
        tracing::info!(service_id = created.id, "Service added");
        Ok(created)
    }

    /// Update a service and swap in the record the API returns.
    pub async fn update_service(
        &mut self,
        id: u64,
        request: &ServiceRequest,
    ) -> ApiResult<ServiceRecord> {
        let updated = self.repo.update(id, request).await?;
        for service in self.services.iter_mut().filter(|s| s.id == id) {
            *service = updated.clone();
        }
        self.touch();
        tracing::info!(service_id = id, "Service updated");
        Ok(updated)
    }

    /// Re-read one service from the repository and swap it into the list,
    /// appending it if the catalog did not have it yet.
    pub async fn reload_service(&mut self, id: u64) -> ApiResult<ServiceRecord> {
        let fresh = self.repo.get(id).await?;
        match self.services.iter_mut().find(|s| s.id == id) {
            Some(existing) => *existing = fresh.clone(),
            None => self.services.push(fresh.clone()),
        }
        self.touch();
        tracing::debug!(service_id = id, "Service reloaded");
        Ok(fresh)
    }

    /// Delete a service and drop it from the catalog.
    pub async fn delete_service(&mut self, id: u64) -> ApiResult<()> {
        self.repo.delete(id).await?;
        self.services.retain(|s| s.id != id);
        self.touch();
        tracing::info!(service_id = id, "Service deleted");
        Ok(())
    }

    pub fn filter_services(&self, filter: &ServiceFilter) -> Vec<&ServiceRecord> {
        self.services.iter().filter(|s| filter.matches(s)).collect()
    }

    /// The first service that lists `id` among its customers.
    pub fn find_service_for_customer(&self, id: &CustomerId) -> Option<&ServiceRecord> {
        self.services
            .iter()
            .find(|service| service.customers_list.contains(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::models::CustomerSummary;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Repository returning a scripted list, or failing when `fail` is set.
    #[derive(Default)]
    struct ScriptedRepo {
        services: Mutex<Vec<ServiceRecord>>,
        fail: Mutex<bool>,
    }

    #[async_trait]
    impl ServiceRepository for ScriptedRepo {
        async fn list(&self) -> ApiResult<Vec<ServiceRecord>> {
            if *self.fail.lock().unwrap() {
                return Err(ApiError::HttpError("Connection failed".to_string()));
            }
            Ok(self.services.lock().unwrap().clone())
        }

        async fn get(&self, id: u64) -> ApiResult<ServiceRecord> {
            self.services
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.id == id)
                .cloned()
                .ok_or_else(|| ApiError::NotFound(format!("service {}", id)))
        }

        async fn create(&self, request: &ServiceRequest) -> ApiResult<ServiceRecord> {
            let mut services = self.services.lock().unwrap();
            let mut service = ServiceRecord::new(services.len() as u64 + 100, request.floor);
            service.year = Some(request.year.clone());
            service.month = Some(request.month);
            services.push(service.clone());
            Ok(service)
        }

        async fn update(&self, id: u64, request: &ServiceRequest) -> ApiResult<ServiceRecord> {
            let mut service = ServiceRecord::new(id, request.floor);
            service.year = Some(request.year.clone());
            service.month = Some(request.month);
            Ok(service)
        }

        async fn delete(&self, _id: u64) -> ApiResult<()> {
            Ok(())
        }
    }

    fn service(id: u64, floor: i64, year: &str, month: u8) -> ServiceRecord {
        let mut s = ServiceRecord::new(id, Floor::new(floor));
        s.year = Some(year.to_string());
        s.month = Some(month);
        s
    }

    fn seeded_repo() -> Arc<ScriptedRepo> {
        let repo = ScriptedRepo::default();
        *repo.services.lock().unwrap() = vec![
            service(1, 3, "1402", 1),
            service(2, 1, "1402", 2),
            service(3, 3, "1403", 1),
        ];
        Arc::new(repo)
    }

    #[tokio::test]
    async fn test_refresh_collects_distinct_floors_in_order() {
        let mut catalog = ServiceCatalog::new(seeded_repo());
        assert_eq!(catalog.refresh().await.unwrap(), 3);
        assert_eq!(catalog.available_floors(), &[Floor::new(3), Floor::new(1)]);
        assert_eq!(catalog.revision(), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_stale_services() {
        let repo = seeded_repo();
        let mut catalog = ServiceCatalog::new(repo.clone());
        catalog.refresh().await.unwrap();

        *repo.fail.lock().unwrap() = true;
        assert!(catalog.refresh().await.is_err());
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.revision(), 1);
        assert!(catalog.last_error().unwrap().contains("Connection failed"));

        *repo.fail.lock().unwrap() = false;
        catalog.refresh().await.unwrap();
        assert!(catalog.last_error().is_none());
    }

    #[tokio::test]
    async fn test_add_update_delete_keep_list_in_step() {
        let mut catalog = ServiceCatalog::new(seeded_repo());
        catalog.refresh().await.unwrap();

        let created = catalog
            .add_service(&ServiceRequest::new(Floor::new(7), "1403", 4, false))
            .await
            .unwrap();
        assert_eq!(catalog.len(), 4);
        assert!(catalog.available_floors().contains(&Floor::new(7)));

        catalog
            .update_service(2, &ServiceRequest::new(Floor::new(2), "1404", 9, true))
            .await
            .unwrap();
        let updated = catalog.services().iter().find(|s| s.id == 2).unwrap();
        assert_eq!(updated.floor, Floor::new(2));
        assert_eq!(updated.month, Some(9));

        catalog.delete_service(created.id).await.unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(!catalog.available_floors().contains(&Floor::new(7)));
    }

    #[tokio::test]
    async fn test_reload_service_replaces_or_appends() {
        let repo = seeded_repo();
        let mut catalog = ServiceCatalog::new(repo.clone());
        catalog.refresh().await.unwrap();

        repo.services.lock().unwrap()[1].is_approved = true;
        repo.services.lock().unwrap().push(service(9, 5, "1403", 2));

        let reloaded = catalog.reload_service(2).await.unwrap();
        assert!(reloaded.is_approved);
        assert_eq!(catalog.len(), 3);
        assert!(catalog.services().iter().find(|s| s.id == 2).unwrap().is_approved);

        catalog.reload_service(9).await.unwrap();
        assert_eq!(catalog.len(), 4);
        assert!(catalog.available_floors().contains(&Floor::new(5)));

        let revision = catalog.revision();
        assert!(catalog.reload_service(77).await.unwrap_err().is_not_found());
        assert_eq!(catalog.revision(), revision);
    }

    #[tokio::test]
    async fn test_filter_services() {
        let mut catalog = ServiceCatalog::new(seeded_repo());
        catalog.refresh().await.unwrap();

        let by_floor = ServiceFilter {
            floor: Some(Floor::new(3)),
            ..Default::default()
        };
        assert_eq!(catalog.filter_services(&by_floor).len(), 2);

        let narrow = ServiceFilter {
            year: Some("1402".to_string()),
            month: Some(1),
            floor: Some(Floor::new(3)),
        };
        let hits = catalog.filter_services(&narrow);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        assert_eq!(catalog.filter_services(&ServiceFilter::default()).len(), 3);
    }

    #[test]
    fn test_find_service_for_customer() {
        let mut catalog = ServiceCatalog::new(Arc::new(ScriptedRepo::default()));
        let c1 = CustomerId::new("c1").unwrap();
        catalog.replace(vec![
            ServiceRecord::new(1, Floor::new(1)),
            ServiceRecord::new(2, Floor::new(2)).with_customer(c1.clone(), CustomerSummary::named("A")),
            ServiceRecord::new(3, Floor::new(3)).with_customer(c1.clone(), CustomerSummary::named("A")),
        ]);

        assert_eq!(catalog.find_service_for_customer(&c1).map(|s| s.id), Some(2));
        assert!(catalog
            .find_service_for_customer(&CustomerId::new("zz").unwrap())
            .is_none());
    }
}
