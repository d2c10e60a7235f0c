use super::domain::{
    ComplaintCategory, ComplaintId, ComplaintPriority, ComplaintRecord, ComplaintStatus,
};

/// Conjunction of optional filters applied by the privileged list surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub status: Option<ComplaintStatus>,
    pub category: Option<ComplaintCategory>,
    pub priority: Option<ComplaintPriority>,
}

impl ListFilter {
    pub fn matches(&self, record: &ComplaintRecord) -> bool {
        self.status.map_or(true, |status| record.status == status)
            && self
                .category
                .map_or(true, |category| record.category == category)
            && self
                .priority
                .map_or(true, |priority| record.priority == priority)
    }
}

/// Storage abstraction so the registry logic stays storage-agnostic: bind an
/// in-memory map for tests and demos, a durable store for production.
pub trait ComplaintRepository: Send + Sync {
    /// Store a freshly created record. Fails with [`RepositoryError::Conflict`]
    /// if the identifier is already taken.
    fn insert(&self, record: ComplaintRecord) -> Result<ComplaintRecord, RepositoryError>;

    /// Fetch one record by its canonical (uppercase) identifier.
    fn fetch(&self, id: &ComplaintId) -> Result<Option<ComplaintRecord>, RepositoryError>;

    /// Replace an existing record. Fails with [`RepositoryError::NotFound`]
    /// if no record carries the identifier.
    fn update(&self, record: ComplaintRecord) -> Result<(), RepositoryError>;

    /// Snapshot of all matching records in listing order. Callers paginate;
    /// the repository only filters and orders.
    fn list(&self, filter: &ListFilter) -> Result<Vec<ComplaintRecord>, RepositoryError>;
}

/// Listing order shared by every repository binding: most recently created
/// first, ties broken by identifier so pagination stays stable.
pub fn sort_for_listing(records: &mut [ComplaintRecord]) {
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.0.cmp(&b.id.0))
    });
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
