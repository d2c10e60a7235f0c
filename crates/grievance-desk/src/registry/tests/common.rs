use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::registry::classify::{Classification, ComplaintClassifier, KeywordClassifier};
use crate::registry::domain::{
    ComplaintCategory, ComplaintId, ComplaintPriority, ComplaintRecord, ComplaintSubmission,
    Identity,
};
use crate::registry::repository::{
    sort_for_listing, ComplaintRepository, ListFilter, RepositoryError,
};
use crate::registry::service::{ComplaintRegistry, IntakePolicy};

/// In-memory repository double mirroring the production binding.
#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<String, ComplaintRecord>>>,
}

impl ComplaintRepository for MemoryRepository {
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

/// Repository double whose every operation fails.
pub(super) struct UnavailableRepository;

impl ComplaintRepository for UnavailableRepository {
    fn insert(&self, _record: ComplaintRecord) -> Result<ComplaintRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance window".into()))
    }

    fn fetch(&self, _id: &ComplaintId) -> Result<Option<ComplaintRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance window".into()))
    }

    fn update(&self, _record: ComplaintRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance window".into()))
    }

    fn list(&self, _filter: &ListFilter) -> Result<Vec<ComplaintRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance window".into()))
    }
}

/// Repository double that rejects every insert as a duplicate, to exercise
/// the identifier-regeneration path.
pub(super) struct ConflictRepository;

impl ComplaintRepository for ConflictRepository {
    fn insert(&self, _record: ComplaintRecord) -> Result<ComplaintRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &ComplaintId) -> Result<Option<ComplaintRecord>, RepositoryError> {
        Ok(None)
    }

    fn update(&self, _record: ComplaintRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::NotFound)
    }

    fn list(&self, _filter: &ListFilter) -> Result<Vec<ComplaintRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

/// Classifier double returning a canned result.
pub(super) struct FixedClassifier(pub(super) Classification);

impl ComplaintClassifier for FixedClassifier {
    fn classify(&self, _text: &str) -> Classification {
        self.0
    }
}

pub(super) type TestRegistry = ComplaintRegistry<MemoryRepository, KeywordClassifier>;

pub(super) fn build_registry() -> (Arc<TestRegistry>, MemoryRepository) {
    let repository = MemoryRepository::default();
    let registry = ComplaintRegistry::new(
        Arc::new(repository.clone()),
        Arc::new(KeywordClassifier),
        IntakePolicy::default(),
    );
    (Arc::new(registry), repository)
}

pub(super) fn registry_with<R: ComplaintRepository + 'static>(
    repository: R,
) -> ComplaintRegistry<R, KeywordClassifier> {
    ComplaintRegistry::new(
        Arc::new(repository),
        Arc::new(KeywordClassifier),
        IntakePolicy::default(),
    )
}

pub(super) fn anonymous_submission() -> ComplaintSubmission {
    ComplaintSubmission {
        is_anonymous: true,
        identity: None,
        text: "The hostel water supply has been inconsistent for over two weeks now.".to_string(),
        category: None,
    }
}

pub(super) fn identified_submission() -> ComplaintSubmission {
    ComplaintSubmission {
        is_anonymous: false,
        identity: Some(sample_identity()),
        text: "Lab equipment in the chemistry department needs calibration before finals."
            .to_string(),
        category: None,
    }
}

pub(super) fn sample_identity() -> Identity {
    Identity {
        full_name: "Priya Nair".to_string(),
        roll_number: "20240117".to_string(),
        department: "Computer Science".to_string(),
        contact: Some("priya.nair@university.edu".to_string()),
    }
}

pub(super) fn assert_id_format(raw: &str) {
    let parts: Vec<&str> = raw.split('-').collect();
    assert_eq!(parts.len(), 3, "identifier has three segments: {raw}");
    assert_eq!(parts[0], "GRV");
    assert!(!parts[1].is_empty());
    assert_eq!(parts[2].len(), 4);
    for segment in &parts[1..] {
        assert!(
            segment
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()),
            "identifier segments are uppercase base36: {raw}"
        );
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Hand-built record for listing/metrics tests that need full control over
/// timestamps and classification fields.
pub(super) fn record_with(
    id: &str,
    created_at: chrono::DateTime<chrono::Utc>,
    status: crate::registry::domain::ComplaintStatus,
    category: ComplaintCategory,
    priority: ComplaintPriority,
    is_anonymous: bool,
) -> ComplaintRecord {
    ComplaintRecord {
        id: ComplaintId(id.to_string()),
        is_anonymous,
        identity: if is_anonymous {
            None
        } else {
            Some(sample_identity())
        },
        text: "A narrative long enough to pass intake validation checks.".to_string(),
        category,
        priority,
        safety_flag: category == ComplaintCategory::Safety,
        status,
        admin_remarks: None,
        audit_log: vec![crate::registry::domain::AuditEntry {
            timestamp: created_at,
            action: "Complaint submitted".to_string(),
            performed_by: "System".to_string(),
            details: None,
        }],
        created_at,
        updated_at: created_at,
    }
}

pub(super) fn safety_classification() -> Classification {
    Classification {
        category: ComplaintCategory::Safety,
        priority: ComplaintPriority::High,
        safety_flag: true,
    }
}
