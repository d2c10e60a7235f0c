use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::classify::ComplaintClassifier;
use super::domain::{
    AuditEntry, ComplaintId, ComplaintRecord, ComplaintStatus, ComplaintSubmission,
    DashboardMetrics, Identity, TrackingView, SYSTEM_ACTOR,
};
use super::repository::{ComplaintRepository, ListFilter, RepositoryError};

/// Same-millisecond suffix collisions are the only conflict source for
/// freshly generated identifiers; a handful of retries makes the residual
/// probability negligible.
const ID_GENERATION_ATTEMPTS: usize = 4;

/// Intake and listing knobs, normally sourced from [`crate::config`].
#[derive(Debug, Clone, Copy)]
pub struct IntakePolicy {
    pub min_narrative_chars: usize,
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for IntakePolicy {
    fn default() -> Self {
        IntakePolicy {
            min_narrative_chars: 20,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// Parameters for the privileged list surface. Pages are 1-indexed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListQuery {
    pub filter: ListFilter,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

/// One page of full records plus the total matching count.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintPage {
    pub complaints: Vec<ComplaintRecord>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// The complaint registry: sole owner of record creation and mutation.
///
/// Mutating operations are serialized through a registry-wide mutex so
/// concurrent status updates can never interleave audit appends or lose an
/// update. Reads go straight to the repository and observe whole-record
/// snapshots.
pub struct ComplaintRegistry<R, C> {
    repository: Arc<R>,
    classifier: Arc<C>,
    policy: IntakePolicy,
    mutation: Mutex<()>,
}

impl<R, C> ComplaintRegistry<R, C>
where
    R: ComplaintRepository + 'static,
    C: ComplaintClassifier + 'static,
{
    pub fn new(repository: Arc<R>, classifier: Arc<C>, policy: IntakePolicy) -> Self {
        Self {
            repository,
            classifier,
            policy,
            mutation: Mutex::new(()),
        }
    }

    /// Validate and store a new complaint, returning the created record.
    ///
    /// The receipt surface must expose only the identifier: for anonymous
    /// submissions it is the sole channel back to the complainant.
    pub fn submit(
        &self,
        submission: ComplaintSubmission,
    ) -> Result<ComplaintRecord, RegistryError> {
        let text = submission.text.trim().to_string();
        if text.is_empty() {
            return Err(ValidationError::EmptyNarrative.into());
        }
        if text.chars().count() < self.policy.min_narrative_chars {
            return Err(ValidationError::NarrativeTooShort {
                minimum: self.policy.min_narrative_chars,
            }
            .into());
        }
        let identity = validated_identity(submission.is_anonymous, submission.identity)?;

        let classification = self.classifier.classify(&text);
        let category = submission.category.unwrap_or(classification.category);

        let _guard = self.mutation.lock().expect("mutation mutex poisoned");
        let now = Utc::now();
        let mut attempts = 0;
        loop {
            let id = ComplaintId::generate(now);
            let record = ComplaintRecord {
                id: id.clone(),
                is_anonymous: submission.is_anonymous,
                identity: identity.clone(),
                text: text.clone(),
                category,
                priority: classification.priority,
                safety_flag: classification.safety_flag,
                status: ComplaintStatus::Submitted,
                admin_remarks: None,
                audit_log: vec![AuditEntry {
                    timestamp: now,
                    action: "Complaint submitted".to_string(),
                    performed_by: SYSTEM_ACTOR.to_string(),
                    details: None,
                }],
                created_at: now,
                updated_at: now,
            };

            match self.repository.insert(record) {
                Ok(stored) => {
                    info!(
                        complaint_id = %stored.id,
                        category = %stored.category,
                        priority = %stored.priority,
                        anonymous = stored.is_anonymous,
                        "complaint registered"
                    );
                    return Ok(stored);
                }
                Err(RepositoryError::Conflict) if attempts + 1 < ID_GENERATION_ATTEMPTS => {
                    attempts += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Public, case-insensitive status lookup. Malformed and unknown
    /// identifiers are deliberately indistinguishable.
    pub fn track(&self, raw_id: &str) -> Result<TrackingView, RegistryError> {
        let id = ComplaintId::from_raw(raw_id);
        let record = self
            .repository
            .fetch(&id)?
            .ok_or(RegistryError::NotFound)?;
        Ok(record.tracking_view())
    }

    /// Privileged read of one full record, audit log included.
    pub fn get(&self, raw_id: &str) -> Result<ComplaintRecord, RegistryError> {
        let id = ComplaintId::from_raw(raw_id);
        self.repository
            .fetch(&id)?
            .ok_or(RegistryError::NotFound)
    }

    /// Privileged paginated listing of full records.
    pub fn list(&self, query: ListQuery) -> Result<ComplaintPage, RegistryError> {
        let page = query.page.unwrap_or(1).max(1);
        let page_size = query
            .page_size
            .unwrap_or(self.policy.default_page_size)
            .clamp(1, self.policy.max_page_size);

        let records = self.repository.list(&query.filter)?;
        let total = records.len();
        let start = (page - 1).saturating_mul(page_size);
        let complaints = records.into_iter().skip(start).take(page_size).collect();

        Ok(ComplaintPage {
            complaints,
            total,
            page,
            page_size,
        })
    }

    /// Apply one status transition on behalf of an administrative actor.
    ///
    /// Exactly one audit entry is appended per successful call. Remarks, when
    /// supplied, replace the record's admin remarks; otherwise the prior
    /// value is retained.
    pub fn update_status(
        &self,
        raw_id: &str,
        new_status: ComplaintStatus,
        remarks: Option<String>,
        actor: &str,
    ) -> Result<ComplaintRecord, RegistryError> {
        let id = ComplaintId::from_raw(raw_id);

        let _guard = self.mutation.lock().expect("mutation mutex poisoned");
        let mut record = self
            .repository
            .fetch(&id)?
            .ok_or(RegistryError::NotFound)?;

        if !record.status.can_transition_to(new_status) {
            return Err(RegistryError::InvalidTransition {
                from: record.status,
                to: new_status,
            });
        }

        let now = Utc::now();
        record.audit_log.push(AuditEntry {
            timestamp: now,
            action: format!("Status changed to {new_status}"),
            performed_by: actor.to_string(),
            details: remarks.clone(),
        });
        record.status = new_status;
        if remarks.is_some() {
            record.admin_remarks = remarks;
        }
        record.updated_at = now;

        self.repository.update(record.clone())?;
        info!(
            complaint_id = %record.id,
            status = %record.status,
            actor,
            "complaint status updated"
        );
        Ok(record)
    }

    /// One-pass aggregate counts over a repository snapshot.
    pub fn metrics(&self) -> Result<DashboardMetrics, RegistryError> {
        let records = self.repository.list(&ListFilter::default())?;
        let mut metrics = DashboardMetrics::default();
        for record in &records {
            metrics.total_complaints += 1;
            if record.priority.is_elevated() {
                metrics.high_priority_count += 1;
            }
            if record.safety_flag || record.category == super::domain::ComplaintCategory::Safety {
                metrics.safety_related_count += 1;
            }
            if record.is_anonymous {
                metrics.anonymous_count += 1;
            } else {
                metrics.identified_count += 1;
            }
            metrics.status_breakdown.bump(record.status);
        }
        Ok(metrics)
    }
}

fn validated_identity(
    is_anonymous: bool,
    identity: Option<Identity>,
) -> Result<Option<Identity>, ValidationError> {
    match (is_anonymous, identity) {
        // Policy choice: reject inconsistent submissions rather than
        // silently dropping the identity.
        (true, Some(_)) => Err(ValidationError::UnexpectedIdentity),
        (true, None) => Ok(None),
        (false, None) => Err(ValidationError::MissingIdentity),
        (false, Some(identity)) => {
            if identity.full_name.trim().is_empty()
                || identity.roll_number.trim().is_empty()
                || identity.department.trim().is_empty()
            {
                Err(ValidationError::MissingIdentity)
            } else {
                Ok(Some(identity))
            }
        }
    }
}

/// Intake validation failures, surfaced to the submitter as field-level
/// messages.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("complaint text must not be empty")]
    EmptyNarrative,
    #[error("complaint text must be at least {minimum} characters")]
    NarrativeTooShort { minimum: usize },
    #[error("anonymous submissions must not include identity details")]
    UnexpectedIdentity,
    #[error("identified submissions require full name, roll number, and department")]
    MissingIdentity,
}

/// Error raised by registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("complaint not found")]
    NotFound,
    #[error("cannot change status from {from} to {to}")]
    InvalidTransition {
        from: ComplaintStatus,
        to: ComplaintStatus,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
