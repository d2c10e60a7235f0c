use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use grievance_desk::registry::{
    sort_for_listing, ComplaintId, ComplaintRecord, ComplaintRepository, ListFilter,
    RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Default repository binding: a process-local map. Durable storage slots in
/// behind the same trait without touching the registry.
#[derive(Default, Clone)]
pub(crate) struct InMemoryComplaintRepository {
    records: Arc<Mutex<HashMap<String, ComplaintRecord>>>,
}

impl ComplaintRepository for InMemoryComplaintRepository {
    fn insert(&self, record: ComplaintRecord) -> Result<ComplaintRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id.0) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.0.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ComplaintId) -> Result<Option<ComplaintRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }

    fn update(&self, record: ComplaintRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id.0) {
            guard.insert(record.id.0.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn list(&self, filter: &ListFilter) -> Result<Vec<ComplaintRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<ComplaintRecord> = guard
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        sort_for_listing(&mut records);
        Ok(records)
    }
}
