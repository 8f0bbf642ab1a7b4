//! Per-category evaluators. Each one is a pure function of the aid criteria and the profile.

use super::super::domain::{AidCriteria, FarmerProfile, ProductionType, ProjectType};
use super::reasons::{BoundCheck, Criterion, CriterionCategory, CriterionReason};
use super::weights::{
    AGE_WEIGHT, BONUS_LABELS_SHARE, DEPARTMENT_SHARE, GEOGRAPHY_WEIGHT, LABELS_WEIGHT,
    LEGAL_STATUS_WEIGHT, NATIONWIDE_REGIONS, PRODUCTION_WEIGHT, PROJECT_WEIGHT, REGION_SHARE,
    REQUIRED_LABELS_SHARE, SURFACE_WEIGHT,
};
use super::CriterionEvaluation;

/// Points and explanation rows contributed by one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryOutcome {
    pub category: CriterionCategory,
    pub points: f64,
    pub blocked: bool,
    pub rows: Vec<CriterionEvaluation>,
}

impl CategoryOutcome {
    fn new(category: CriterionCategory) -> Self {
        Self {
            category,
            points: 0.0,
            blocked: false,
            rows: Vec::new(),
        }
    }

    fn unrestricted(criterion: Criterion, weight: f64) -> Self {
        let mut outcome = Self::new(criterion.category());
        outcome.award(criterion, false, weight, weight, CriterionReason::NoRestriction);
        outcome
    }

    fn award(
        &mut self,
        criterion: Criterion,
        blocking: bool,
        points: f64,
        max_points: f64,
        reason: CriterionReason,
    ) {
        self.points += points;
        self.rows.push(CriterionEvaluation {
            criterion,
            valid: true,
            blocking,
            points,
            max_points,
            reason,
        });
    }

    fn fail(&mut self, criterion: Criterion, blocking: bool, max_points: f64, reason: CriterionReason) {
        self.blocked |= blocking;
        self.rows.push(CriterionEvaluation {
            criterion,
            valid: false,
            blocking,
            points: 0.0,
            max_points,
            reason,
        });
    }
}

/// An aid that restricts departments only credits the region share as unrestricted.
pub fn geography(criteria: &AidCriteria, profile: &FarmerProfile) -> CategoryOutcome {
    if !criteria.restricts_geography() {
        return CategoryOutcome::unrestricted(Criterion::Geography, GEOGRAPHY_WEIGHT);
    }

    let mut outcome = CategoryOutcome::new(CriterionCategory::Geography);
    let region_points = GEOGRAPHY_WEIGHT * REGION_SHARE;
    let department_points = GEOGRAPHY_WEIGHT * DEPARTMENT_SHARE;

    let region_ok = if criteria.regions.is_empty() {
        outcome.award(
            Criterion::Region,
            false,
            region_points,
            region_points,
            CriterionReason::NoRestriction,
        );
        true
    } else if criteria
        .regions
        .iter()
        .any(|region| NATIONWIDE_REGIONS.contains(&region.as_str()) || *region == profile.region)
    {
        outcome.award(
            Criterion::Region,
            true,
            region_points,
            region_points,
            CriterionReason::RegionAccepted {
                region: profile.region.clone(),
            },
        );
        true
    } else {
        outcome.fail(
            Criterion::Region,
            true,
            region_points,
            CriterionReason::RegionRejected {
                region: profile.region.clone(),
                accepted: criteria.regions.clone(),
            },
        );
        false
    };

    if !criteria.departments.is_empty() {
        let department = profile.department.trim();
        if !department.is_empty() && criteria.departments.iter().any(|d| d == department) {
            outcome.award(
                Criterion::Department,
                true,
                department_points,
                department_points,
                CriterionReason::DepartmentAccepted {
                    department: department.to_string(),
                },
            );
        } else {
            outcome.fail(
                Criterion::Department,
                true,
                department_points,
                CriterionReason::DepartmentRejected {
                    department: department.to_string(),
                    accepted: criteria.departments.clone(),
                },
            );
        }
    } else if region_ok {
        outcome.award(
            Criterion::Department,
            false,
            department_points,
            department_points,
            CriterionReason::NoRestriction,
        );
    }

    outcome
}

pub fn production(criteria: &AidCriteria, profile: &FarmerProfile) -> CategoryOutcome {
    if criteria.production_types.is_empty() {
        return CategoryOutcome::unrestricted(Criterion::ProductionType, PRODUCTION_WEIGHT);
    }

    let mut outcome = CategoryOutcome::new(CriterionCategory::Production);
    let matched: Vec<ProductionType> = criteria
        .production_types
        .intersection(&profile.productions)
        .copied()
        .collect();

    if matched.is_empty() {
        outcome.fail(
            Criterion::ProductionType,
            true,
            PRODUCTION_WEIGHT,
            CriterionReason::ProductionsUnmatched {
                required: criteria.production_types.iter().copied().collect(),
                held: profile.productions.iter().copied().collect(),
            },
        );
    } else {
        outcome.award(
            Criterion::ProductionType,
            true,
            PRODUCTION_WEIGHT,
            PRODUCTION_WEIGHT,
            CriterionReason::ProductionsMatched { matched },
        );
    }

    outcome
}

/// Advisory only: a mismatch costs the points but never blocks.
pub fn project(criteria: &AidCriteria, profile: &FarmerProfile) -> CategoryOutcome {
    if criteria.project_types.is_empty() {
        return CategoryOutcome::unrestricted(Criterion::ProjectType, PROJECT_WEIGHT);
    }

    let mut outcome = CategoryOutcome::new(CriterionCategory::Project);
    let matched: Vec<ProjectType> = criteria
        .project_types
        .intersection(&profile.projects)
        .copied()
        .collect();

    if matched.is_empty() {
        outcome.fail(
            Criterion::ProjectType,
            false,
            PROJECT_WEIGHT,
            CriterionReason::ProjectsSuggested {
                suggested: criteria.project_types.iter().copied().collect(),
            },
        );
    } else {
        outcome.award(
            Criterion::ProjectType,
            false,
            PROJECT_WEIGHT,
            PROJECT_WEIGHT,
            CriterionReason::ProjectsMatched { matched },
        );
    }

    outcome
}

pub fn legal_status(criteria: &AidCriteria, profile: &FarmerProfile) -> CategoryOutcome {
    if criteria.legal_statuses.is_empty() {
        return CategoryOutcome::unrestricted(Criterion::LegalStatus, LEGAL_STATUS_WEIGHT);
    }

    let mut outcome = CategoryOutcome::new(CriterionCategory::LegalStatus);
    if criteria.legal_statuses.contains(&profile.legal_status) {
        outcome.award(
            Criterion::LegalStatus,
            true,
            LEGAL_STATUS_WEIGHT,
            LEGAL_STATUS_WEIGHT,
            CriterionReason::LegalStatusAccepted {
                status: profile.legal_status,
            },
        );
    } else {
        outcome.fail(
            Criterion::LegalStatus,
            true,
            LEGAL_STATUS_WEIGHT,
            CriterionReason::LegalStatusRejected {
                status: profile.legal_status,
                accepted: criteria.legal_statuses.iter().copied().collect(),
            },
        );
    }

    outcome
}

/// A missing profile age scores zero without blocking; the young-farmer requirement,
/// when set, replaces the numeric bounds entirely.
pub fn age(criteria: &AidCriteria, profile: &FarmerProfile) -> CategoryOutcome {
    if !criteria.restricts_age() {
        return CategoryOutcome::unrestricted(Criterion::Age, AGE_WEIGHT);
    }

    let mut outcome = CategoryOutcome::new(CriterionCategory::Age);
    let Some(age) = profile.age else {
        outcome.fail(Criterion::Age, false, AGE_WEIGHT, CriterionReason::AgeMissing);
        return outcome;
    };

    if criteria.young_farmer_required == Some(true) {
        if profile.young_farmer {
            outcome.award(
                Criterion::YoungFarmer,
                true,
                AGE_WEIGHT,
                AGE_WEIGHT,
                CriterionReason::YoungFarmerConfirmed,
            );
        } else {
            outcome.fail(
                Criterion::YoungFarmer,
                true,
                AGE_WEIGHT,
                CriterionReason::YoungFarmerRequired,
            );
        }
        return outcome;
    }

    let actual = f64::from(age);
    let checks: Vec<BoundCheck> = [
        criteria.age_min.map(|min| BoundCheck::min(f64::from(min), actual)),
        criteria.age_max.map(|max| BoundCheck::max(f64::from(max), actual)),
    ]
    .into_iter()
    .flatten()
    .collect();
    let satisfied = checks.iter().all(|check| check.holds);
    let reason = CriterionReason::AgeBounds {
        age,
        checks,
        satisfied,
    };

    if satisfied {
        outcome.award(Criterion::Age, true, AGE_WEIGHT, AGE_WEIGHT, reason);
    } else {
        outcome.fail(Criterion::Age, true, AGE_WEIGHT, reason);
    }

    outcome
}

pub fn surface(criteria: &AidCriteria, profile: &FarmerProfile) -> CategoryOutcome {
    if !criteria.restricts_surface() {
        return CategoryOutcome::unrestricted(Criterion::Surface, SURFACE_WEIGHT);
    }

    let mut outcome = CategoryOutcome::new(CriterionCategory::Surface);
    let actual = profile.total_surface;
    let checks: Vec<BoundCheck> = [
        criteria.surface_min.map(|min| BoundCheck::min(min, actual)),
        criteria.surface_max.map(|max| BoundCheck::max(max, actual)),
    ]
    .into_iter()
    .flatten()
    .collect();
    let satisfied = checks.iter().all(|check| check.holds);
    let reason = CriterionReason::SurfaceBounds {
        surface: actual,
        checks,
        satisfied,
    };

    if satisfied {
        outcome.award(Criterion::Surface, true, SURFACE_WEIGHT, SURFACE_WEIGHT, reason);
    } else {
        outcome.fail(Criterion::Surface, true, SURFACE_WEIGHT, reason);
    }

    outcome
}

/// Two non-blocking sub-scores: all-or-nothing required labels, and bonus labels scaled by coverage.
/// Labels never block. Sub-scores with nothing to check are credited without a row,
/// and an unmet bonus earns nothing without counting as a failure.
pub fn labels(criteria: &AidCriteria, profile: &FarmerProfile) -> CategoryOutcome {
    let mut outcome = CategoryOutcome::new(CriterionCategory::Labels);
    let required_points = LABELS_WEIGHT * REQUIRED_LABELS_SHARE;
    let bonus_points = LABELS_WEIGHT * BONUS_LABELS_SHARE;

    if criteria.required_labels.is_empty() {
        outcome.points += required_points;
    } else {
        let missing: Vec<String> = criteria
            .required_labels
            .difference(&profile.labels)
            .cloned()
            .collect();
        if missing.is_empty() {
            outcome.award(
                Criterion::RequiredLabels,
                false,
                required_points,
                required_points,
                CriterionReason::RequiredLabelsHeld {
                    labels: criteria.required_labels.iter().cloned().collect(),
                },
            );
        } else {
            outcome.fail(
                Criterion::RequiredLabels,
                false,
                required_points,
                CriterionReason::RequiredLabelsMissing { missing },
            );
        }
    }

    if criteria.bonus_labels.is_empty() {
        outcome.points += bonus_points;
    } else {
        let held: Vec<String> = criteria
            .bonus_labels
            .intersection(&profile.labels)
            .cloned()
            .collect();
        if !held.is_empty() {
            let offered = criteria.bonus_labels.len();
            let ratio = held.len() as f64 / offered as f64;
            outcome.award(
                Criterion::BonusLabels,
                false,
                bonus_points * ratio,
                bonus_points,
                CriterionReason::BonusLabels { held, offered },
            );
        }
    }

    outcome
}
