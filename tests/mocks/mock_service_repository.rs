use async_trait::async_trait;
use residence_admin::error::{ApiError, ApiResult};
use residence_admin::models::{ServiceRecord, ServiceRequest};
use residence_admin::repositories::ServiceRepository;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock service repository for testing.
///
/// Keeps services in memory and can simulate the service list being
/// unreachable.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockServiceRepository {
    services: Arc<Mutex<Vec<ServiceRecord>>>,
    unreachable: Arc<Mutex<bool>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl MockServiceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_services(services: Vec<ServiceRecord>) -> Self {
        let repo = Self::new();
        repo.set_services(services);
        repo
    }

    /// Replace the services the next `list` call returns.
    pub fn set_services(&self, services: Vec<ServiceRecord>) {
        *self.services.lock().unwrap() = services;
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        *self.unreachable.lock().unwrap() = unreachable;
    }

    pub fn get_call_count(&self, method: &str) -> usize {
        *self.call_counts.lock().unwrap().get(method).unwrap_or(&0)
    }

    fn track_call(&self, method: &str) {
        *self
            .call_counts
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_insert(0) += 1;
    }

    fn check_reachable(&self) -> ApiResult<()> {
        if *self.unreachable.lock().unwrap() {
            return Err(ApiError::HttpError("Connection failed".to_string()));
        }
        Ok(())
    }

    fn from_request(id: u64, request: &ServiceRequest) -> ServiceRecord {
        let mut service = ServiceRecord::new(id, request.floor);
        service.year = Some(request.year.clone());
        service.month = Some(request.month);
        service.time = Some(request.time.to_string());
        service.is_approved = request.is_approved;
        service
    }
}

#[async_trait]
impl ServiceRepository for MockServiceRepository {
    async fn list(&self) -> ApiResult<Vec<ServiceRecord>> {
        self.track_call("list");
        self.check_reachable()?;
        Ok(self.services.lock().unwrap().clone())
    }

    async fn get(&self, id: u64) -> ApiResult<ServiceRecord> {
        self.track_call("get");
        self.check_reachable()?;
        self.services
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Service {} not found", id)))
    }

    async fn create(&self, request: &ServiceRequest) -> ApiResult<ServiceRecord> {
        self.track_call("create");
        self.check_reachable()?;
        let mut services = self.services.lock().unwrap();
        let id = services.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let service = Self::from_request(id, request);
        services.push(service.clone());
        Ok(service)
    }

    async fn update(&self, id: u64, request: &ServiceRequest) -> ApiResult<ServiceRecord> {
        self.track_call("update");
        self.check_reachable()?;
        let mut services = self.services.lock().unwrap();
        let existing = services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("Service {} not found", id)))?;
        let mut updated = Self::from_request(id, request);
        updated.customers_list = existing.customers_list.clone();
        *existing = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: u64) -> ApiResult<()> {
        self.track_call("delete");
        self.check_reachable()?;
        self.services.lock().unwrap().retain(|s| s.id != id);
        Ok(())
    }
}
