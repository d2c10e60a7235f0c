//! Complaint registry: identifier issuance, intake validation, the status
//! state machine, the append-only audit trail, and the HTTP surface.
//!
//! Storage ([`ComplaintRepository`]) and category inference
//! ([`ComplaintClassifier`]) are trait seams; the registry composes whatever
//! bindings the host wires in.

pub mod classify;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use classify::{Classification, ComplaintClassifier, FallbackClassifier, KeywordClassifier};
pub use domain::{
    AuditEntry, ComplaintCategory, ComplaintId, ComplaintPriority, ComplaintRecord,
    ComplaintStatus, ComplaintSubmission, DashboardMetrics, Identity, StatusBreakdown,
    TrackingView, ID_PREFIX, SYSTEM_ACTOR,
};
pub use repository::{sort_for_listing, ComplaintRepository, ListFilter, RepositoryError};
pub use router::{registry_router, ListParams, UpdateStatusRequest};
pub use service::{
    ComplaintPage, ComplaintRegistry, IntakePolicy, ListQuery, RegistryError, ValidationError,
};
