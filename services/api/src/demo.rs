use std::sync::Arc;

use chrono::Utc;
use clap::Args;

use grievance_desk::error::AppError;
use grievance_desk::registry::{
    ComplaintRegistry, ComplaintStatus, ComplaintSubmission, Identity, IntakePolicy,
    KeywordClassifier,
};

use crate::infra::InMemoryComplaintRepository;

const SAMPLE_COMPLAINTS: &[&str] = &[
    "The air conditioning in Building A classroom 101 has not been working for two weeks.",
    "Library resources are outdated and we need more recent publications.",
    "There is a safety hazard near the parking lot due to poor lighting.",
    "The online portal is frequently down during peak hours.",
    "Hostel water supply is inconsistent during morning hours.",
    "Lab equipment in Chemistry department needs urgent maintenance.",
    "Bus schedule does not align with class timings.",
    "Cafeteria food quality has declined significantly.",
];

const SAMPLE_DEPARTMENTS: &[&str] = &[
    "Computer Science",
    "Electrical Engineering",
    "Mechanical Engineering",
    "Civil Engineering",
    "Business Administration",
    "Arts & Humanities",
];

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Number of sample complaints to seed before the walkthrough
    #[arg(long, default_value_t = 8)]
    pub(crate) seed: usize,
    /// Name recorded as the administrative actor on status changes
    #[arg(long, default_value = "Admin A")]
    pub(crate) actor: String,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let registry = ComplaintRegistry::new(
        Arc::new(InMemoryComplaintRepository::default()),
        Arc::new(KeywordClassifier),
        IntakePolicy::default(),
    );

    println!("=== Grievance Desk demo ({}) ===", Utc::now().format("%Y-%m-%d %H:%M UTC"));
    println!();
    println!("-- Intake: seeding {} sample complaints --", args.seed);

    let mut first_id: Option<String> = None;
    for index in 0..args.seed {
        let submission = sample_submission(index);
        let anonymous = submission.is_anonymous;
        let record = registry.submit(submission)?;
        if first_id.is_none() {
            first_id = Some(record.id.0.clone());
        }
        println!(
            "  {}  [{:<14}] {:<8}  {}",
            record.id,
            record.category.label(),
            record.priority.label(),
            if anonymous { "anonymous" } else { "identified" }
        );
    }

    let Some(tracked_id) = first_id else {
        println!("  (nothing seeded, walkthrough skipped)");
        return Ok(());
    };

    println!();
    println!("-- Lifecycle walkthrough for {tracked_id} --");
    let view = registry.track(&tracked_id)?;
    println!("  tracked: status={}", view.status);

    registry.update_status(&tracked_id, ComplaintStatus::InReview, None, &args.actor)?;
    let view = registry.track(&tracked_id)?;
    println!("  after review pickup: status={}", view.status);

    registry.update_status(
        &tracked_id,
        ComplaintStatus::Resolved,
        Some("Maintenance ticket closed".to_string()),
        &args.actor,
    )?;
    let view = registry.track(&tracked_id)?;
    println!(
        "  after resolution: status={} remarks={}",
        view.status,
        view.admin_remarks.as_deref().unwrap_or("-")
    );

    println!();
    println!("-- Audit trail --");
    let record = registry.get(&tracked_id)?;
    for entry in &record.audit_log {
        println!(
            "  {}  {:<28} by {}{}",
            entry.timestamp.format("%H:%M:%S"),
            entry.action,
            entry.performed_by,
            entry
                .details
                .as_deref()
                .map(|details| format!(" ({details})"))
                .unwrap_or_default()
        );
    }

    println!();
    println!("-- Dashboard metrics --");
    let metrics = registry.metrics()?;
    println!("  total complaints : {}", metrics.total_complaints);
    println!("  high priority    : {}", metrics.high_priority_count);
    println!("  safety related   : {}", metrics.safety_related_count);
    println!(
        "  anonymous / identified : {} / {}",
        metrics.anonymous_count, metrics.identified_count
    );
    println!(
        "  by status : submitted={} in_review={} resolved={} rejected={}",
        metrics.status_breakdown.submitted,
        metrics.status_breakdown.in_review,
        metrics.status_breakdown.resolved,
        metrics.status_breakdown.rejected
    );

    Ok(())
}

fn sample_submission(index: usize) -> ComplaintSubmission {
    let is_anonymous = index % 3 == 0;
    ComplaintSubmission {
        is_anonymous,
        identity: if is_anonymous {
            None
        } else {
            Some(Identity {
                full_name: format!("Student {}", index + 1),
                roll_number: format!("2024{:04}", index + 100),
                department: SAMPLE_DEPARTMENTS[index % SAMPLE_DEPARTMENTS.len()].to_string(),
                contact: (index % 2 == 0)
                    .then(|| format!("student{}@university.edu", index + 1)),
            })
        },
        text: SAMPLE_COMPLAINTS[index % SAMPLE_COMPLAINTS.len()].to_string(),
        category: None,
    }
}
