use serde::{Deserialize, Serialize};

use super::super::domain::{LegalStatus, ProductionType, ProjectType};
use super::weights::ELIGIBILITY_THRESHOLD;

/// Scoring category. Blocking failures are reported by category name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionCategory {
    Geography,
    Production,
    Project,
    LegalStatus,
    Age,
    Surface,
    Labels,
}

impl CriterionCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Geography => "Geography",
            Self::Production => "Production type",
            Self::Project => "Project type",
            Self::LegalStatus => "Legal status",
            Self::Age => "Age",
            Self::Surface => "Surface",
            Self::Labels => "Labels",
        }
    }
}

/// Individual explanation row. Several rows may belong to one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Geography,
    Region,
    Department,
    ProductionType,
    ProjectType,
    LegalStatus,
    Age,
    YoungFarmer,
    Surface,
    RequiredLabels,
    BonusLabels,
}

impl Criterion {
    pub const fn category(self) -> CriterionCategory {
        match self {
            Self::Geography | Self::Region | Self::Department => CriterionCategory::Geography,
            Self::ProductionType => CriterionCategory::Production,
            Self::ProjectType => CriterionCategory::Project,
            Self::LegalStatus => CriterionCategory::LegalStatus,
            Self::Age | Self::YoungFarmer => CriterionCategory::Age,
            Self::Surface => CriterionCategory::Surface,
            Self::RequiredLabels | Self::BonusLabels => CriterionCategory::Labels,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Geography => "Geography",
            Self::Region => "Region",
            Self::Department => "Department",
            Self::ProductionType => "Production type",
            Self::ProjectType => "Project type",
            Self::LegalStatus => "Legal status",
            Self::Age => "Age",
            Self::YoungFarmer => "Young farmer",
            Self::Surface => "Surface",
            Self::RequiredLabels => "Required labels",
            Self::BonusLabels => "Bonus labels",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundKind {
    Min,
    Max,
}

/// Outcome of one numeric bound against a profile measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundCheck {
    pub kind: BoundKind,
    pub limit: f64,
    pub holds: bool,
}

impl BoundCheck {
    pub fn min(limit: f64, actual: f64) -> Self {
        Self {
            kind: BoundKind::Min,
            limit,
            holds: actual >= limit,
        }
    }

    pub fn max(limit: f64, actual: f64) -> Self {
        Self {
            kind: BoundKind::Max,
            limit,
            holds: actual <= limit,
        }
    }

    fn render(&self, subject: &str, unit: &str) -> String {
        match (self.kind, self.holds) {
            (BoundKind::Min, true) => format!("{subject} >= {}{unit}", self.limit),
            (BoundKind::Min, false) => format!("{subject} < {}{unit} required", self.limit),
            (BoundKind::Max, true) => format!("{subject} <= {}{unit}", self.limit),
            (BoundKind::Max, false) => format!("{subject} > {}{unit} maximum", self.limit),
        }
    }
}

/// Structured explanation produced by a category evaluator; rendered to text at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CriterionReason {
    NoRestriction,
    RegionAccepted {
        region: String,
    },
    RegionRejected {
        region: String,
        accepted: Vec<String>,
    },
    DepartmentAccepted {
        department: String,
    },
    DepartmentRejected {
        department: String,
        accepted: Vec<String>,
    },
    ProductionsMatched {
        matched: Vec<ProductionType>,
    },
    ProductionsUnmatched {
        required: Vec<ProductionType>,
        held: Vec<ProductionType>,
    },
    ProjectsMatched {
        matched: Vec<ProjectType>,
    },
    ProjectsSuggested {
        suggested: Vec<ProjectType>,
    },
    LegalStatusAccepted {
        status: LegalStatus,
    },
    LegalStatusRejected {
        status: LegalStatus,
        accepted: Vec<LegalStatus>,
    },
    AgeMissing,
    YoungFarmerConfirmed,
    YoungFarmerRequired,
    AgeBounds {
        age: u32,
        checks: Vec<BoundCheck>,
        satisfied: bool,
    },
    SurfaceBounds {
        surface: f64,
        checks: Vec<BoundCheck>,
        satisfied: bool,
    },
    RequiredLabelsHeld {
        labels: Vec<String>,
    },
    RequiredLabelsMissing {
        missing: Vec<String>,
    },
    BonusLabels {
        held: Vec<String>,
        offered: usize,
    },
}

impl CriterionReason {
    pub fn render(&self, criterion: Criterion) -> String {
        match self {
            CriterionReason::NoRestriction => match criterion {
                Criterion::Geography => "No geographic restriction".to_string(),
                Criterion::Region => "No region restriction".to_string(),
                Criterion::Department => "No department restriction".to_string(),
                Criterion::ProductionType => "All production types accepted".to_string(),
                Criterion::ProjectType => "All project types accepted".to_string(),
                Criterion::LegalStatus => "All legal statuses accepted".to_string(),
                Criterion::Age | Criterion::YoungFarmer => "No age restriction".to_string(),
                Criterion::Surface => "No surface restriction".to_string(),
                Criterion::RequiredLabels | Criterion::BonusLabels => {
                    "No label requirement".to_string()
                }
            },
            CriterionReason::RegionAccepted { region } => format!("Region {region} eligible"),
            CriterionReason::RegionRejected { region, accepted } => format!(
                "Region {region} not eligible (accepted regions: {})",
                accepted.join(", ")
            ),
            CriterionReason::DepartmentAccepted { department } => {
                format!("Department {department} eligible")
            }
            CriterionReason::DepartmentRejected {
                department,
                accepted,
            } => {
                if department.is_empty() {
                    format!(
                        "Department not provided (accepted departments: {})",
                        accepted.join(", ")
                    )
                } else {
                    format!(
                        "Department {department} not eligible (accepted departments: {})",
                        accepted.join(", ")
                    )
                }
            }
            CriterionReason::ProductionsMatched { matched } => format!(
                "Eligible production(s): {}",
                join_codes(matched.iter().map(|p| p.code()))
            ),
            CriterionReason::ProductionsUnmatched { required, held } => {
                let held = if held.is_empty() {
                    "none".to_string()
                } else {
                    join_codes(held.iter().map(|p| p.code()))
                };
                format!(
                    "No eligible production. Required: {}. Held: {held}",
                    join_codes(required.iter().map(|p| p.code()))
                )
            }
            CriterionReason::ProjectsMatched { matched } => format!(
                "Matching project(s): {}",
                join_codes(matched.iter().map(|p| p.code()))
            ),
            CriterionReason::ProjectsSuggested { suggested } => format!(
                "Suggested projects: {}",
                join_codes(suggested.iter().map(|p| p.code()))
            ),
            CriterionReason::LegalStatusAccepted { status } => {
                format!("Legal status {} accepted", status.code())
            }
            CriterionReason::LegalStatusRejected { status, accepted } => format!(
                "Legal status {} not accepted. Required: {}",
                status.code(),
                join_codes(accepted.iter().map(|s| s.code()))
            ),
            CriterionReason::AgeMissing => "Age not provided in the profile".to_string(),
            CriterionReason::YoungFarmerConfirmed => "Young farmer status confirmed".to_string(),
            CriterionReason::YoungFarmerRequired => {
                "Aid reserved for young farmers (under 40)".to_string()
            }
            CriterionReason::AgeBounds {
                age,
                checks,
                satisfied,
            } => {
                let details = render_checks(checks, "age", " years");
                if *satisfied {
                    format!("Age criteria met at {age} ({details})")
                } else {
                    format!("Age criteria not met at {age} ({details})")
                }
            }
            CriterionReason::SurfaceBounds {
                surface,
                checks,
                satisfied,
            } => {
                let details = render_checks(checks, "UAA", " ha");
                if *satisfied {
                    format!("Eligible surface: {surface} ha ({details})")
                } else {
                    format!("Surface not eligible: {surface} ha ({details})")
                }
            }
            CriterionReason::RequiredLabelsHeld { labels } => {
                format!("Required labels held: {}", labels.join(", "))
            }
            CriterionReason::RequiredLabelsMissing { missing } => {
                format!("Missing labels: {}", missing.join(", "))
            }
            CriterionReason::BonusLabels { held, offered } => {
                if held.is_empty() {
                    format!("None of the {offered} bonus label(s) held")
                } else {
                    format!(
                        "Bonus labels: {} ({} of {offered})",
                        held.join(", "),
                        held.len()
                    )
                }
            }
        }
    }
}

fn join_codes<'a>(codes: impl Iterator<Item = &'a str>) -> String {
    codes.collect::<Vec<_>>().join(", ")
}

fn render_checks(checks: &[BoundCheck], subject: &str, unit: &str) -> String {
    checks
        .iter()
        .map(|check| check.render(subject, unit))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Templated advice attached to a match result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    OutsideServiceArea,
    ProductionNotEligible,
    LegalFormMismatch,
    CheckAgeCriteria,
    SurfaceMismatch,
    ConsiderAlignedProject,
    ConsiderAcquiringLabel,
    Apply,
}

impl Recommendation {
    /// Advice for a failed blocking row, if its category has one.
    pub(crate) const fn for_blocking(category: CriterionCategory) -> Option<Self> {
        match category {
            CriterionCategory::Geography => Some(Self::OutsideServiceArea),
            CriterionCategory::Production => Some(Self::ProductionNotEligible),
            CriterionCategory::LegalStatus => Some(Self::LegalFormMismatch),
            CriterionCategory::Age => Some(Self::CheckAgeCriteria),
            CriterionCategory::Surface => Some(Self::SurfaceMismatch),
            CriterionCategory::Project | CriterionCategory::Labels => None,
        }
    }

    pub(crate) const fn for_advisory(category: CriterionCategory) -> Option<Self> {
        match category {
            CriterionCategory::Project => Some(Self::ConsiderAlignedProject),
            CriterionCategory::Labels => Some(Self::ConsiderAcquiringLabel),
            _ => None,
        }
    }

    pub const fn text(self) -> &'static str {
        match self {
            Self::OutsideServiceArea => "This aid is not available in your geographic area",
            Self::ProductionNotEligible => "Your production type is not eligible for this aid",
            Self::LegalFormMismatch => "Your legal status does not match the required criteria",
            Self::CheckAgeCriteria => "Check the age criteria for this aid",
            Self::SurfaceMismatch => "Your farmed surface does not match the required criteria",
            Self::ConsiderAlignedProject => {
                "Consider a project aligned with the types supported by this aid"
            }
            Self::ConsiderAcquiringLabel => "Obtain the required labels to maximise your chances",
            Self::Apply => "Your profile fits this aid well, do not hesitate to apply",
        }
    }
}

/// One-line verdict for a match result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchSummary {
    Eligible { score: f64 },
    Blocked { categories: Vec<CriterionCategory> },
    InsufficientScore { score: f64 },
}

impl MatchSummary {
    pub fn text(&self) -> String {
        match self {
            MatchSummary::Eligible { score } => {
                format!("Eligible for this aid with a score of {score:.1}/100")
            }
            MatchSummary::Blocked { categories } => {
                let names = categories
                    .iter()
                    .map(|category| category.label())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Not eligible - blocking criteria not met: {names}")
            }
            MatchSummary::InsufficientScore { score } => format!(
                "Insufficient score ({score:.1}/100, minimum required: {ELIGIBILITY_THRESHOLD})"
            ),
        }
    }
}
