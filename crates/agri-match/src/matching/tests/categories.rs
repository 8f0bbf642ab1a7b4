use std::collections::BTreeSet;

use super::common::*;
use crate::matching::domain::{AidCriteria, LegalStatus, ProductionType, ProjectType};
use crate::matching::evaluation::categories;
use crate::matching::evaluation::{Criterion, CriterionCategory, CriterionReason};

#[test]
fn unrestricted_categories_award_full_weight() {
    let criteria = AidCriteria::default();
    let mut profile = profile();
    profile.age = None;
    profile.productions.clear();
    profile.labels.clear();

    let outcomes = [
        (categories::geography(&criteria, &profile), 25.0),
        (categories::production(&criteria, &profile), 20.0),
        (categories::project(&criteria, &profile), 15.0),
        (categories::legal_status(&criteria, &profile), 10.0),
        (categories::age(&criteria, &profile), 10.0),
        (categories::surface(&criteria, &profile), 10.0),
        (categories::labels(&criteria, &profile), 10.0),
    ];

    for (outcome, weight) in outcomes {
        assert_eq!(outcome.points, weight, "{:?}", outcome.category);
        assert!(!outcome.blocked);
        if outcome.category == CriterionCategory::Labels {
            assert!(outcome.rows.is_empty());
        } else {
            assert_eq!(outcome.rows.len(), 1);
            assert_eq!(outcome.rows[0].reason, CriterionReason::NoRestriction);
        }
    }
}

#[test]
fn nationwide_region_passes_and_awards_department_bonus() {
    let criteria = AidCriteria {
        regions: vec!["National".to_string()],
        ..AidCriteria::default()
    };
    let mut profile = profile();
    profile.region = "Bretagne".to_string();

    let outcome = categories::geography(&criteria, &profile);

    assert!(!outcome.blocked);
    assert!((outcome.points - 25.0).abs() < 1e-9);
    let department = outcome
        .rows
        .iter()
        .find(|row| row.criterion == Criterion::Department)
        .expect("department bonus row");
    assert!(department.valid);
    assert!(!department.blocking);
}

#[test]
fn region_mismatch_blocks_without_department_bonus() {
    let criteria = AidCriteria {
        regions: vec!["Bretagne".to_string()],
        ..AidCriteria::default()
    };

    let outcome = categories::geography(&criteria, &profile());

    assert!(outcome.blocked);
    assert_eq!(outcome.points, 0.0);
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(
        outcome.rows[0].explanation(),
        "Region Occitanie not eligible (accepted regions: Bretagne)"
    );
}

#[test]
fn department_only_aid_credits_the_region_share() {
    let criteria = AidCriteria {
        departments: vec!["34".to_string()],
        ..AidCriteria::default()
    };

    let outcome = categories::geography(&criteria, &profile());

    assert!(!outcome.blocked);
    assert!((outcome.points - 25.0).abs() < 1e-9);
    assert_eq!(outcome.rows[0].criterion, Criterion::Region);
    assert_eq!(outcome.rows[0].explanation(), "No region restriction");
}

#[test]
fn department_restriction_requires_a_department() {
    let criteria = AidCriteria {
        regions: vec!["Occitanie".to_string()],
        departments: vec!["34".to_string(), "30".to_string()],
        ..AidCriteria::default()
    };
    let mut profile = profile();

    let accepted = categories::geography(&criteria, &profile);
    assert!(!accepted.blocked);
    assert!((accepted.points - 25.0).abs() < 1e-9);

    profile.department = String::new();
    let missing = categories::geography(&criteria, &profile);
    assert!(missing.blocked);
    assert!((missing.points - 17.5).abs() < 1e-9);
    assert!(missing
        .rows
        .iter()
        .any(|row| row.explanation().starts_with("Department not provided")));
}

#[test]
fn production_intersection_is_blocking() {
    let criteria = AidCriteria {
        production_types: BTreeSet::from([ProductionType::Viticulture, ProductionType::Cereals]),
        ..AidCriteria::default()
    };
    let mut profile = profile();

    let matched = categories::production(&criteria, &profile);
    assert_eq!(matched.points, 20.0);
    assert_eq!(matched.rows[0].explanation(), "Eligible production(s): CEREALS");

    profile.productions = BTreeSet::from([ProductionType::Dairy]);
    let unmatched = categories::production(&criteria, &profile);
    assert!(unmatched.blocked);
    assert_eq!(unmatched.points, 0.0);
}

#[test]
fn project_mismatch_is_advisory_only() {
    let criteria = AidCriteria {
        project_types: BTreeSet::from([ProjectType::Irrigation]),
        ..AidCriteria::default()
    };

    let outcome = categories::project(&criteria, &profile());

    assert!(!outcome.blocked);
    assert_eq!(outcome.points, 0.0);
    assert!(!outcome.rows[0].valid);
    assert!(!outcome.rows[0].blocking);
}

#[test]
fn legal_status_membership_is_blocking() {
    let criteria = AidCriteria {
        legal_statuses: BTreeSet::from([LegalStatus::Gaec]),
        ..AidCriteria::default()
    };

    let outcome = categories::legal_status(&criteria, &profile());

    assert!(outcome.blocked);
    assert_eq!(
        outcome.rows[0].explanation(),
        "Legal status EARL not accepted. Required: GAEC"
    );
}

#[test]
fn missing_age_scores_zero_without_blocking() {
    let criteria = AidCriteria {
        age_max: Some(40),
        ..AidCriteria::default()
    };
    let mut profile = profile();
    profile.age = None;

    let outcome = categories::age(&criteria, &profile);

    assert!(!outcome.blocked);
    assert_eq!(outcome.points, 0.0);
    assert_eq!(outcome.rows[0].reason, CriterionReason::AgeMissing);
}

#[test]
fn young_farmer_path_replaces_numeric_bounds() {
    let criteria = AidCriteria {
        age_max: Some(30),
        young_farmer_required: Some(true),
        ..AidCriteria::default()
    };
    let mut profile = profile();
    profile.young_farmer = true;

    let outcome = categories::age(&criteria, &profile);
    assert!(!outcome.blocked);
    assert_eq!(outcome.points, 10.0);
    assert_eq!(outcome.rows[0].criterion, Criterion::YoungFarmer);

    profile.young_farmer = false;
    let refused = categories::age(&criteria, &profile);
    assert!(refused.blocked);
}

#[test]
fn young_farmer_not_required_falls_back_to_bounds() {
    let criteria = AidCriteria {
        age_min: Some(40),
        young_farmer_required: Some(false),
        ..AidCriteria::default()
    };

    let outcome = categories::age(&criteria, &profile());

    assert!(outcome.blocked);
    assert_eq!(
        outcome.rows[0].explanation(),
        "Age criteria not met at 35 (age < 40 years required)"
    );
}

#[test]
fn surface_bounds_must_all_hold() {
    let criteria = AidCriteria {
        surface_min: Some(10.0),
        surface_max: Some(50.0),
        ..AidCriteria::default()
    };

    let outcome = categories::surface(&criteria, &profile());

    assert!(outcome.blocked);
    assert_eq!(outcome.points, 0.0);
}

#[test]
fn required_labels_are_all_or_nothing_and_never_block() {
    let criteria = AidCriteria {
        required_labels: labels(&["AB", "HVE"]),
        ..AidCriteria::default()
    };

    let outcome = categories::labels(&criteria, &profile());

    assert!(!outcome.blocked);
    assert!((outcome.points - 4.0).abs() < 1e-9);
    let required = &outcome.rows[0];
    assert_eq!(required.criterion, Criterion::RequiredLabels);
    assert!(!required.valid);
    assert_eq!(required.explanation(), "Missing labels: HVE");
}

#[test]
fn bonus_labels_scale_with_coverage() {
    let criteria = AidCriteria {
        bonus_labels: labels(&["AB", "HVE"]),
        ..AidCriteria::default()
    };

    let outcome = categories::labels(&criteria, &profile());

    assert!((outcome.points - 8.0).abs() < 1e-9);
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0].explanation(), "Bonus labels: AB (1 of 2)");
}

#[test]
fn unmet_bonus_labels_earn_nothing_without_a_failed_row() {
    let criteria = AidCriteria {
        bonus_labels: labels(&["HVE"]),
        ..AidCriteria::default()
    };

    let outcome = categories::labels(&criteria, &profile());

    assert!((outcome.points - 6.0).abs() < 1e-9);
    assert!(outcome.rows.is_empty());
}
