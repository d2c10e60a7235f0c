use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Actor recorded on audit entries generated by the registry itself.
pub const SYSTEM_ACTOR: &str = "System";

/// Prefix shared by every issued identifier.
pub const ID_PREFIX: &str = "GRV";

const SUFFIX_LEN: usize = 4;
const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Identifier wrapper for complaint records.
///
/// The identifier is the sole credential needed to query status, so it must
/// be unguessable enough to resist enumeration while staying short enough to
/// transcribe by hand: `GRV-<base36 millis>-<4 random base36 chars>`, all
/// uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComplaintId(pub String);

impl ComplaintId {
    pub fn generate(now: DateTime<Utc>) -> Self {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        let millis = now.timestamp_millis().max(0) as u64;
        ComplaintId(format!("{ID_PREFIX}-{}-{suffix}", to_base36(millis)))
    }

    /// Canonical form used as the storage key. Tracking input is
    /// case-insensitive, so both sides normalize before comparing.
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_ascii_uppercase()
    }

    pub fn from_raw(raw: &str) -> Self {
        ComplaintId(Self::normalize(raw))
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize] as char);
        value /= 36;
    }
    digits.iter().rev().collect()
}

/// Lifecycle state of a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Submitted,
    InReview,
    Resolved,
    Rejected,
}

impl ComplaintStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ComplaintStatus::Submitted => "submitted",
            ComplaintStatus::InReview => "in_review",
            ComplaintStatus::Resolved => "resolved",
            ComplaintStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ComplaintStatus::Resolved | ComplaintStatus::Rejected)
    }

    /// The strict lifecycle machine: review happens before closure, and
    /// closed complaints stay closed.
    pub const fn can_transition_to(self, next: ComplaintStatus) -> bool {
        matches!(
            (self, next),
            (ComplaintStatus::Submitted, ComplaintStatus::InReview)
                | (ComplaintStatus::InReview, ComplaintStatus::Resolved)
                | (ComplaintStatus::InReview, ComplaintStatus::Rejected)
        )
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fixed category taxonomy for submitted complaints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintCategory {
    Academic,
    Administrative,
    Infrastructure,
    Harassment,
    Safety,
    Financial,
    Hostel,
    Library,
    Transport,
    Other,
}

impl ComplaintCategory {
    pub const fn label(self) -> &'static str {
        match self {
            ComplaintCategory::Academic => "academic",
            ComplaintCategory::Administrative => "administrative",
            ComplaintCategory::Infrastructure => "infrastructure",
            ComplaintCategory::Harassment => "harassment",
            ComplaintCategory::Safety => "safety",
            ComplaintCategory::Financial => "financial",
            ComplaintCategory::Hostel => "hostel",
            ComplaintCategory::Library => "library",
            ComplaintCategory::Transport => "transport",
            ComplaintCategory::Other => "other",
        }
    }
}

impl fmt::Display for ComplaintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived urgency of a complaint. Never submitter-supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl ComplaintPriority {
    pub const fn label(self) -> &'static str {
        match self {
            ComplaintPriority::Low => "low",
            ComplaintPriority::Medium => "medium",
            ComplaintPriority::High => "high",
            ComplaintPriority::Critical => "critical",
        }
    }

    pub const fn is_elevated(self) -> bool {
        matches!(self, ComplaintPriority::High | ComplaintPriority::Critical)
    }
}

impl fmt::Display for ComplaintPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Complainant identity captured for non-anonymous submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub full_name: String,
    pub roll_number: String,
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// Intake payload collected from the submission form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintSubmission {
    pub is_anonymous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ComplaintCategory>,
}

/// One immutable entry in a complaint's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub performed_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// The sole persisted entity: a complaint with its full lifecycle history.
///
/// Records are never physically deleted; closure is represented purely by
/// terminal status values. The audit log is append-only and its first entry
/// always records creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    pub id: ComplaintId,
    pub is_anonymous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
    pub text: String,
    pub category: ComplaintCategory,
    pub priority: ComplaintPriority,
    pub safety_flag: bool,
    pub status: ComplaintStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_remarks: Option<String>,
    pub audit_log: Vec<AuditEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ComplaintRecord {
    /// The only shape the public tracking surface is allowed to return.
    /// Narrative, identity, and audit detail must never leak through here.
    pub fn tracking_view(&self) -> TrackingView {
        TrackingView {
            complaint_id: self.id.clone(),
            status: self.status,
            last_updated: self.updated_at,
            admin_remarks: self.admin_remarks.clone(),
        }
    }
}

/// Sanitized status view returned on the public tracking path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingView {
    pub complaint_id: ComplaintId,
    pub status: ComplaintStatus,
    pub last_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_remarks: Option<String>,
}

/// Status counts for the administrative dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub submitted: u64,
    pub in_review: u64,
    pub resolved: u64,
    pub rejected: u64,
}

impl StatusBreakdown {
    pub fn bump(&mut self, status: ComplaintStatus) {
        match status {
            ComplaintStatus::Submitted => self.submitted += 1,
            ComplaintStatus::InReview => self.in_review += 1,
            ComplaintStatus::Resolved => self.resolved += 1,
            ComplaintStatus::Rejected => self.rejected += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.submitted + self.in_review + self.resolved + self.rejected
    }
}

/// Aggregate counts over the full registry, computed in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_complaints: u64,
    pub high_priority_count: u64,
    pub safety_related_count: u64,
    pub anonymous_count: u64,
    pub identified_count: u64,
    pub status_breakdown: StatusBreakdown,
}
