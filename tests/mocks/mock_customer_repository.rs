use async_trait::async_trait;
use residence_admin::domain::CustomerId;
use residence_admin::error::{ApiError, ApiResult};
use residence_admin::models::CustomerRecord;
use residence_admin::repositories::CustomerRepository;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Mock customer repository for testing.
///
/// Serves customers from memory, fails on demand for chosen ids, records
/// every fetch in order, and can hold a fetch open until the test releases
/// it.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockCustomerRepository {
    customers: Arc<Mutex<HashMap<CustomerId, CustomerRecord>>>,
    failing: Arc<Mutex<HashSet<CustomerId>>>,
    calls: Arc<Mutex<Vec<CustomerId>>>,
    gates: Arc<Mutex<HashMap<CustomerId, Arc<Notify>>>>,
}

#[allow(dead_code)]
impl MockCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a customer named after its id.
    pub fn add_customer(&self, id: &str, name: &str, father_name: &str) {
        let mut record = CustomerRecord::new(name, father_name);
        record.id = Some(CustomerId::new(id).unwrap());
        self.customers
            .lock()
            .unwrap()
            .insert(CustomerId::new(id).unwrap(), record);
    }

    /// Make every fetch of `id` fail with a server error.
    pub fn fail_on(&self, id: &str) {
        self.failing
            .lock()
            .unwrap()
            .insert(CustomerId::new(id).unwrap());
    }

    /// Hold the next fetch of `id` until the returned handle is notified.
    pub fn hold_next(&self, id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(CustomerId::new(id).unwrap(), gate.clone());
        gate
    }

    /// Ids fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|id| id.to_string())
            .collect()
    }

    pub fn call_count(&self, id: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == id)
            .count()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

#[async_trait]
impl CustomerRepository for MockCustomerRepository {
    async fn fetch(&self, id: &CustomerId) -> ApiResult<Option<CustomerRecord>> {
        let gate = {
            self.calls.lock().unwrap().push(id.clone());
            self.gates.lock().unwrap().remove(id)
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.failing.lock().unwrap().contains(id) {
            return Err(ApiError::ApiError {
                status: 500,
                message: format!("customer {} exploded", id),
            });
        }

        Ok(self.customers.lock().unwrap().get(id).cloned())
    }
}
