mod amount;
pub mod categories;
mod reasons;
pub mod weights;

pub use amount::{estimate, EstimatedAmount};
pub use categories::CategoryOutcome;
pub use reasons::{
    BoundCheck, BoundKind, Criterion, CriterionCategory, CriterionReason, MatchSummary,
    Recommendation,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Aid, AidId, FarmerProfile, ProfileId};
use super::evaluator::{Evaluator, Verdict};
use super::ranking;
use weights::{ELIGIBILITY_THRESHOLD, MAX_RECOMMENDATIONS, MAX_SCORE};

/// Stateless weighted engine scoring one aid against one profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchingEngine;

impl MatchingEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, aid: &Aid, profile: &FarmerProfile) -> Result<MatchResult, EvalError> {
        validate(aid, profile)?;

        let criteria = &aid.criteria;
        let outcomes = [
            categories::geography(criteria, profile),
            categories::production(criteria, profile),
            categories::project(criteria, profile),
            categories::legal_status(criteria, profile),
            categories::age(criteria, profile),
            categories::surface(criteria, profile),
            categories::labels(criteria, profile),
        ];

        let blocking_failures: Vec<CriterionCategory> = outcomes
            .iter()
            .filter(|outcome| outcome.blocked)
            .map(|outcome| outcome.category)
            .collect();

        let score = if blocking_failures.is_empty() {
            let raw: f64 = outcomes.iter().map(|outcome| outcome.points).sum();
            round_score(raw.clamp(0.0, MAX_SCORE))
        } else {
            0.0
        };
        let eligible = blocking_failures.is_empty() && score >= ELIGIBILITY_THRESHOLD;

        let criteria: Vec<CriterionEvaluation> = outcomes
            .into_iter()
            .flat_map(|outcome| outcome.rows)
            .collect();
        let passed_criteria = criteria.iter().filter(|row| row.valid).count();
        let total_criteria = criteria.len();

        let summary = if eligible {
            MatchSummary::Eligible { score }
        } else if !blocking_failures.is_empty() {
            MatchSummary::Blocked {
                categories: blocking_failures.clone(),
            }
        } else {
            MatchSummary::InsufficientScore { score }
        };
        let recommendations = recommend(&criteria, !blocking_failures.is_empty(), eligible);

        debug!(aid_id = %aid.aid_id, profile_id = %profile.profile_id, score, eligible, "aid evaluated");

        Ok(MatchResult {
            aid_id: aid.aid_id.clone(),
            profile_id: profile.profile_id.clone(),
            score,
            eligible,
            criteria,
            passed_criteria,
            total_criteria,
            blocking_failures,
            estimated_amount: estimate(aid, profile),
            summary,
            recommendations,
        })
    }

    /// Best matches for one profile: eligible first, then by score, keeping catalog order on ties.
    pub fn rank(&self, aids: &[Aid], profile: &FarmerProfile, top_n: usize) -> Vec<MatchResult> {
        let mut ranked = ranking::rank_all(self, aids, profile, false).results;
        ranked.truncate(top_n);
        ranked
    }
}

impl Evaluator for MatchingEngine {
    type Subject = Aid;
    type Verdict = MatchResult;
    type Error = EvalError;

    fn evaluate(&self, subject: &Aid, profile: &FarmerProfile) -> Result<MatchResult, EvalError> {
        MatchingEngine::evaluate(self, subject, profile)
    }
}

impl Verdict for MatchResult {
    fn passed(&self) -> bool {
        self.eligible
    }
}

fn round_score(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn recommend(
    criteria: &[CriterionEvaluation],
    has_blocking_failures: bool,
    eligible: bool,
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = criteria
        .iter()
        .filter(|row| !row.valid && row.blocking)
        .filter_map(|row| Recommendation::for_blocking(row.criterion.category()))
        .collect();

    if !has_blocking_failures {
        recommendations.extend(
            criteria
                .iter()
                .filter(|row| !row.valid && !row.blocking)
                .filter_map(|row| Recommendation::for_advisory(row.criterion.category())),
        );
    }

    if recommendations.is_empty() && eligible {
        recommendations.push(Recommendation::Apply);
    }

    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

fn validate(aid: &Aid, profile: &FarmerProfile) -> Result<(), EvalError> {
    if aid.aid_id.0.trim().is_empty() {
        return Err(EvalError::MissingAidId);
    }

    if !profile.total_surface.is_finite() || profile.total_surface < 0.0 {
        return Err(EvalError::InvalidProfileSurface {
            value: profile.total_surface,
        });
    }

    let criteria = &aid.criteria;
    let amount = &aid.amount;
    let numeric_fields = [
        ("surface_min", criteria.surface_min),
        ("surface_max", criteria.surface_max),
        ("revenue_min", criteria.revenue_min),
        ("revenue_max", criteria.revenue_max),
        ("min_amount", amount.min_amount),
        ("max_amount", amount.max_amount),
        ("min_rate", amount.min_rate),
        ("max_rate", amount.max_rate),
        ("ceiling", amount.ceiling),
        ("per_unit_amount", amount.per_unit_amount),
    ];

    for (field, value) in numeric_fields {
        if value.is_some_and(|value| !value.is_finite()) {
            return Err(EvalError::NonFiniteValue {
                aid_id: aid.aid_id.clone(),
                field,
            });
        }
    }

    Ok(())
}

/// One explanation row of a match result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionEvaluation {
    pub criterion: Criterion,
    pub valid: bool,
    /// Whether a failure of this row zeroes the whole score.
    pub blocking: bool,
    pub points: f64,
    pub max_points: f64,
    pub reason: CriterionReason,
}

impl CriterionEvaluation {
    pub fn category(&self) -> CriterionCategory {
        self.criterion.category()
    }

    pub fn explanation(&self) -> String {
        self.reason.render(self.criterion)
    }
}

/// Outcome of scoring one aid against one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub aid_id: AidId,
    pub profile_id: ProfileId,
    pub score: f64,
    pub eligible: bool,
    pub criteria: Vec<CriterionEvaluation>,
    pub passed_criteria: usize,
    pub total_criteria: usize,
    pub blocking_failures: Vec<CriterionCategory>,
    pub estimated_amount: EstimatedAmount,
    pub summary: MatchSummary,
    pub recommendations: Vec<Recommendation>,
}

impl MatchResult {
    /// Not eligible, but scoring high enough to be worth a second look.
    pub fn is_near_eligible(&self) -> bool {
        !self.eligible && self.score >= weights::NEAR_ELIGIBLE_THRESHOLD
    }
}

/// Error raised when an aid or profile cannot be scored at all.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("aid has no identifier")]
    MissingAidId,
    #[error("aid {aid_id} has a non-finite `{field}`")]
    NonFiniteValue { aid_id: AidId, field: &'static str },
    #[error("profile surface must be a non-negative number, got {value}")]
    InvalidProfileSurface { value: f64 },
}
