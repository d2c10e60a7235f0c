use chrono::{Duration, TimeZone, Utc};

use super::common::*;
use crate::registry::domain::{ComplaintCategory, ComplaintPriority, ComplaintStatus};
use crate::registry::repository::{ComplaintRepository, ListFilter};
use crate::registry::service::ListQuery;

fn seed_records(repository: &MemoryRepository, count: usize) {
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    for index in 0..count {
        let record = record_with(
            &format!("GRV-SEED{index:02}-AAAA"),
            base + Duration::minutes(index as i64),
            ComplaintStatus::Submitted,
            ComplaintCategory::Other,
            ComplaintPriority::Medium,
            index % 2 == 0,
        );
        repository.insert(record).expect("seed insert succeeds");
    }
}

#[test]
fn twenty_five_records_paginate_as_ten_ten_five() {
    let (registry, repository) = build_registry();
    seed_records(&repository, 25);

    let mut sizes = Vec::new();
    for page in 1..=3 {
        let result = registry
            .list(ListQuery {
                page: Some(page),
                page_size: Some(10),
                ..ListQuery::default()
            })
            .expect("list succeeds");
        assert_eq!(result.total, 25);
        assert_eq!(result.page, page);
        sizes.push(result.complaints.len());
    }
    assert_eq!(sizes, [10, 10, 5]);

    let past_end = registry
        .list(ListQuery {
            page: Some(4),
            page_size: Some(10),
            ..ListQuery::default()
        })
        .expect("list succeeds");
    assert!(past_end.complaints.is_empty());
    assert_eq!(past_end.total, 25);
}

#[test]
fn listing_orders_newest_first_with_id_tiebreak() {
    let (registry, repository) = build_registry();
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

    repository
        .insert(record_with(
            "GRV-TIE-BBBB",
            base,
            ComplaintStatus::Submitted,
            ComplaintCategory::Other,
            ComplaintPriority::Medium,
            true,
        ))
        .expect("insert");
    repository
        .insert(record_with(
            "GRV-TIE-AAAA",
            base,
            ComplaintStatus::Submitted,
            ComplaintCategory::Other,
            ComplaintPriority::Medium,
            true,
        ))
        .expect("insert");
    repository
        .insert(record_with(
            "GRV-NEWER-AAAA",
            base + Duration::hours(1),
            ComplaintStatus::Submitted,
            ComplaintCategory::Other,
            ComplaintPriority::Medium,
            true,
        ))
        .expect("insert");

    let result = registry.list(ListQuery::default()).expect("list succeeds");
    let ids: Vec<&str> = result
        .complaints
        .iter()
        .map(|record| record.id.0.as_str())
        .collect();
    assert_eq!(ids, ["GRV-NEWER-AAAA", "GRV-TIE-AAAA", "GRV-TIE-BBBB"]);
}

#[test]
fn filters_compose_by_conjunction() {
    let (registry, repository) = build_registry();
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

    repository
        .insert(record_with(
            "GRV-MATCH-AAAA",
            base,
            ComplaintStatus::InReview,
            ComplaintCategory::Safety,
            ComplaintPriority::High,
            true,
        ))
        .expect("insert");
    repository
        .insert(record_with(
            "GRV-WRONGSTAT-AAAA",
            base,
            ComplaintStatus::Submitted,
            ComplaintCategory::Safety,
            ComplaintPriority::High,
            true,
        ))
        .expect("insert");
    repository
        .insert(record_with(
            "GRV-WRONGCAT-AAAA",
            base,
            ComplaintStatus::InReview,
            ComplaintCategory::Library,
            ComplaintPriority::High,
            true,
        ))
        .expect("insert");

    let result = registry
        .list(ListQuery {
            filter: ListFilter {
                status: Some(ComplaintStatus::InReview),
                category: Some(ComplaintCategory::Safety),
                priority: Some(ComplaintPriority::High),
            },
            ..ListQuery::default()
        })
        .expect("list succeeds");

    assert_eq!(result.total, 1);
    assert_eq!(result.complaints[0].id.0, "GRV-MATCH-AAAA");
}

#[test]
fn page_zero_and_oversized_page_size_are_clamped() {
    let (registry, repository) = build_registry();
    seed_records(&repository, 5);

    let result = registry
        .list(ListQuery {
            page: Some(0),
            page_size: Some(10_000),
            ..ListQuery::default()
        })
        .expect("list succeeds");

    assert_eq!(result.page, 1);
    assert_eq!(result.page_size, 100);
    assert_eq!(result.complaints.len(), 5);
}

#[test]
fn listing_returns_full_records() {
    let (registry, _) = build_registry();
    registry
        .submit(identified_submission())
        .expect("submitted");

    let result = registry.list(ListQuery::default()).expect("list succeeds");
    let record = &result.complaints[0];
    assert!(record.identity.is_some(), "privileged surface keeps identity");
    assert!(!record.text.is_empty());
    assert_eq!(record.audit_log.len(), 1);
}

#[test]
fn metrics_counts_sum_consistently() {
    let (registry, repository) = build_registry();
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

    let rows = [
        (ComplaintStatus::Submitted, ComplaintCategory::Hostel, ComplaintPriority::Medium, true),
        (ComplaintStatus::Submitted, ComplaintCategory::Safety, ComplaintPriority::High, false),
        (ComplaintStatus::InReview, ComplaintCategory::Academic, ComplaintPriority::Critical, true),
        (ComplaintStatus::Resolved, ComplaintCategory::Library, ComplaintPriority::Low, false),
        (ComplaintStatus::Rejected, ComplaintCategory::Other, ComplaintPriority::Medium, true),
    ];
    for (index, (status, category, priority, is_anonymous)) in rows.into_iter().enumerate() {
        repository
            .insert(record_with(
                &format!("GRV-MET{index:02}-AAAA"),
                base + Duration::minutes(index as i64),
                status,
                category,
                priority,
                is_anonymous,
            ))
            .expect("insert");
    }

    let metrics = registry.metrics().expect("metrics computes");
    assert_eq!(metrics.total_complaints, 5);
    assert_eq!(metrics.status_breakdown.total(), metrics.total_complaints);
    assert_eq!(
        metrics.anonymous_count + metrics.identified_count,
        metrics.total_complaints
    );
    assert_eq!(metrics.high_priority_count, 2);
    assert_eq!(metrics.safety_related_count, 1);
    assert_eq!(metrics.status_breakdown.submitted, 2);
    assert_eq!(metrics.status_breakdown.in_review, 1);
    assert_eq!(metrics.status_breakdown.resolved, 1);
    assert_eq!(metrics.status_breakdown.rejected, 1);
}

#[test]
fn safety_flag_counts_even_outside_safety_category() {
    let (registry, repository) = build_registry();
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

    let mut flagged = record_with(
        "GRV-FLAG-AAAA",
        base,
        ComplaintStatus::Submitted,
        ComplaintCategory::Hostel,
        ComplaintPriority::High,
        true,
    );
    flagged.safety_flag = true;
    repository.insert(flagged).expect("insert");

    let metrics = registry.metrics().expect("metrics computes");
    assert_eq!(metrics.safety_related_count, 1);
}

#[test]
fn metrics_reflect_the_registry_at_computation_time() {
    let (registry, _) = build_registry();
    assert_eq!(registry.metrics().expect("metrics").total_complaints, 0);

    let record = registry.submit(anonymous_submission()).expect("submitted");
    assert_eq!(registry.metrics().expect("metrics").total_complaints, 1);

    registry
        .update_status(&record.id.0, ComplaintStatus::InReview, None, "Admin A")
        .expect("in review");
    let metrics = registry.metrics().expect("metrics");
    assert_eq!(metrics.status_breakdown.in_review, 1);
    assert_eq!(metrics.status_breakdown.submitted, 0);
}
