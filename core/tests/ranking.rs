//! EntityScoreRanker tests: caps, rounding, stable ordering.

use gymdesk_core::{
    date_range::DateRange,
    ranking::{EntityPerformance, EntityScoreRanker},
    records::{
        ConsultationRecord, MembershipRecord, PaymentStatus, StaffRecord, StatusFilter,
        TransactionRecord,
    },
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn perf(id: &str, revenue: f64, regs: u64, consults: u64) -> EntityPerformance {
    EntityPerformance {
        entity_id:         id.to_string(),
        name:              format!("Staff {id}"),
        revenue,
        new_registrations: regs,
        consultations:     consults,
    }
}

fn staff(id: &str, name: &str) -> StaffRecord {
    StaffRecord {
        id:       id.to_string(),
        name:     name.to_string(),
        position: "trainer".to_string(),
    }
}

// ── Scoring ──────────────────────────────────────────────────────────────────

/// Below the caps each sub-score is linear in its input.
#[test]
fn sub_scores_follow_linear_coefficients_below_caps() {
    let s = EntityScoreRanker::score(&perf("a", 150_000.0, 2, 5));
    assert_eq!(s.sub_scores.revenue, 15.0);
    assert_eq!(s.sub_scores.registration, 20.0);
    assert_eq!(s.sub_scores.consultation, 10.0);
    assert_eq!(s.total, 45);
}

/// Revenue caps at 40, registrations and consultations at 30.
#[test]
fn sub_scores_are_capped() {
    let s = EntityScoreRanker::score(&perf("a", 5_000_000.0, 9, 100));
    assert_eq!(s.sub_scores.revenue, 40.0);
    assert_eq!(s.sub_scores.registration, 30.0);
    assert_eq!(s.sub_scores.consultation, 30.0);
    assert_eq!(s.total, 100);
}

/// The total is the rounded sum of the sub-scores.
#[test]
fn total_is_rounded_sum() {
    // 1.25 + 10 + 2 = 13.25 -> 13
    assert_eq!(EntityScoreRanker::score(&perf("a", 12_500.0, 1, 1)).total, 13);
    // 1.5 + 0 + 0 = 1.5 -> 2
    assert_eq!(EntityScoreRanker::score(&perf("b", 15_000.0, 0, 0)).total, 2);
    // 0.49 -> 0
    assert_eq!(EntityScoreRanker::score(&perf("c", 4_900.0, 0, 0)).total, 0);
}

/// Negative or NaN revenue contributes nothing.
#[test]
fn negative_or_non_finite_revenue_scores_zero() {
    let s = EntityScoreRanker::score(&perf("a", -250_000.0, 1, 0));
    assert_eq!(s.sub_scores.revenue, 0.0);
    assert_eq!(s.total, 10);

    let s = EntityScoreRanker::score(&perf("b", f64::NAN, 0, 0));
    assert_eq!(s.sub_scores.revenue, 0.0);
    assert_eq!(s.total, 0);
}

/// 0 <= total <= 100 for any input.
#[test]
fn total_always_within_bounds() {
    let mut rng = Pcg64Mcg::seed_from_u64(0x5C0_4E);
    for i in 0..5_000 {
        let p = perf(
            &i.to_string(),
            rng.gen_range(-1_000_000.0..2_000_000.0),
            rng.gen_range(0..20),
            rng.gen_range(0..50),
        );
        let s = EntityScoreRanker::score(&p);
        assert!(s.total <= 100, "total {} for {p:?}", s.total);
        assert!((0.0..=40.0).contains(&s.sub_scores.revenue));
        assert!((0.0..=30.0).contains(&s.sub_scores.registration));
        assert!((0.0..=30.0).contains(&s.sub_scores.consultation));
    }
}

// ── Ordering ─────────────────────────────────────────────────────────────────

/// Highest total first; equal totals keep input order.
#[test]
fn ranked_descending_with_stable_ties() {
    let ranked = EntityScoreRanker::rank(&[
        perf("low", 0.0, 1, 0),       // 10
        perf("tie-a", 0.0, 2, 0),     // 20
        perf("top", 400_000.0, 3, 15), // 100
        perf("tie-b", 0.0, 0, 10),    // 20
        perf("tie-c", 100_000.0, 1, 0), // 20
    ]);

    let order: Vec<&str> = ranked.iter().map(|s| s.entity_id.as_str()).collect();
    assert_eq!(order, vec!["top", "tie-a", "tie-b", "tie-c", "low"]);
}

#[test]
fn empty_input_ranks_nothing() {
    assert!(EntityScoreRanker::rank(&[]).is_empty());
}

// ── From records ─────────────────────────────────────────────────────────────

/// Revenue, registrations and consultations are credited to the right staff member.
#[test]
fn rank_staff_attributes_revenue_registrations_and_consultations() {
    let range = DateRange::parse("2025-05-01", "2025-05-31").unwrap();
    let staff_list = vec![staff("s1", "Kim"), staff("s2", "Lee"), staff("s3", "Park")];

    let transactions = vec![
        TransactionRecord {
            amount:    Some(200_000.0),
            date:      Some("2025-05-03".into()),
            status:    PaymentStatus::Completed,
            entity_id: Some("s1".into()),
            member_id: Some("m1".into()),
        },
        TransactionRecord {
            amount:    Some(100_000.0),
            date:      Some("2025-05-04".into()),
            status:    PaymentStatus::Refunded,
            entity_id: Some("s1".into()),
            member_id: Some("m2".into()),
        },
        TransactionRecord {
            amount:    Some(50_000.0),
            date:      Some("2025-04-30".into()),
            status:    PaymentStatus::Completed,
            entity_id: Some("s2".into()),
            member_id: None,
        },
        TransactionRecord {
            amount:    Some(70_000.0),
            date:      Some("2025-05-09".into()),
            status:    PaymentStatus::Completed,
            entity_id: Some("ghost".into()),
            member_id: None,
        },
    ];

    let memberships = vec![
        MembershipRecord {
            member_id:      "m1".into(),
            join_date:      Some("2025-05-03".into()),
            membership_end: None,
            staff_id:       Some("s2".into()),
        },
        MembershipRecord {
            member_id:      "m2".into(),
            join_date:      Some("2025-05-10".into()),
            membership_end: None,
            staff_id:       Some("s2".into()),
        },
        MembershipRecord {
            member_id:      "m3".into(),
            join_date:      Some("2025-03-10".into()),
            membership_end: None,
            staff_id:       Some("s3".into()),
        },
    ];

    let consultations: Vec<ConsultationRecord> = (0..4)
        .map(|i| ConsultationRecord {
            id:       format!("c{i}"),
            date:     Some(format!("2025-05-1{i}")),
            status:   Some("completed".into()),
            staff_id: Some("s3".into()),
        })
        .collect();

    let ranked = EntityScoreRanker::rank_staff(
        &staff_list,
        &transactions,
        &memberships,
        &consultations,
        &range,
        StatusFilter::Only(PaymentStatus::Completed),
    );

    let summary: Vec<(&str, u32)> = ranked.iter().map(|s| (s.entity_id.as_str(), s.total)).collect();
    // s1: 200k completed -> 20; s2: 2 registrations -> 20; s3: 4 consultations -> 8
    assert_eq!(summary, vec![("s1", 20), ("s2", 20), ("s3", 8)]);
    assert_eq!(ranked[0].name, "Kim");
    assert_eq!(ranked[0].revenue, 200_000.0);

    // With every status the refund row counts toward s1 as well.
    let all = EntityScoreRanker::rank_staff(
        &staff_list,
        &transactions,
        &memberships,
        &consultations,
        &range,
        StatusFilter::All,
    );
    assert_eq!(all[0].entity_id, "s1");
    assert_eq!(all[0].total, 30);
}

/// Memberships skipped for bad dates earn no registration credit.
#[test]
fn rank_staff_ignores_memberships_with_bad_end_dates() {
    let range = DateRange::parse("2025-05-01", "2025-05-31").unwrap();
    let memberships = vec![
        MembershipRecord {
            member_id:      "m1".into(),
            join_date:      Some("2025-05-05".into()),
            membership_end: Some("garbage".into()),
            staff_id:       Some("s1".into()),
        },
        MembershipRecord {
            member_id:      "m2".into(),
            join_date:      Some("2025-05-06".into()),
            membership_end: Some("".into()),
            staff_id:       Some("s1".into()),
        },
    ];

    let ranked = EntityScoreRanker::rank_staff(
        &[staff("s1", "Kim")],
        &[],
        &memberships,
        &[],
        &range,
        StatusFilter::All,
    );
    assert_eq!(ranked[0].sub_scores.registration, 10.0);
    assert_eq!(ranked[0].total, 10);
}
