//! Aid matching: the weighted engine, the rule-expression evaluator, ranking, and their HTTP surface.

pub mod catalog;
pub mod domain;
pub mod evaluation;
pub mod evaluator;
pub mod expression;
pub mod legacy;
pub mod ranking;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use catalog::{AidCatalog, CatalogError};
pub use domain::{
    Aid, AidAmount, AidCriteria, AidId, AidStatus, AmountKind, FarmerProfile, LegalStatus,
    ProductionType, ProfileId, ProjectType,
};
pub use evaluation::{
    estimate, CriterionCategory, CriterionEvaluation, EstimatedAmount, EvalError, MatchResult,
    MatchSummary, MatchingEngine, Recommendation,
};
pub use evaluator::{Evaluator, Verdict};
pub use expression::{
    ExpressionError, ExpressionEvaluator, ExpressionReason, ExpressionVerdict, UnknownTermPolicy,
};
pub use legacy::{check_eligibility, EligibilityListing, LegacyAid, LegacyEligibility};
pub use ranking::{BatchRanker, MatchReport, RankedMatches, SkippedAid};
pub use router::matching_router;
pub use service::{
    EligibilityRequest, EvaluateRequest, MatchingRequest, MatchingResponse, MatchingService,
    MatchingServiceError,
};
pub use views::{write_ranking_csv, CriterionView, MatchResultView};
