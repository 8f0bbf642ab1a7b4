use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{AidCatalog, CatalogError};
use super::domain::{Aid, FarmerProfile, ProfileId};
use super::evaluation::{EvalError, MatchResult};
use super::expression::{ExpressionEvaluator, UnknownTermPolicy};
use super::legacy::{self, EligibilityListing, LegacyAid};
use super::ranking::{BatchRanker, MatchReport};
use super::views::MatchResultView;

/// Body of a ranking request. Supplying `aids` bypasses the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingRequest {
    pub profile: FarmerProfile,
    #[serde(default)]
    pub aids: Option<Vec<Aid>>,
    #[serde(default)]
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchingResponse {
    pub profile_id: ProfileId,
    pub generated_at: DateTime<Utc>,
    pub report: MatchReport,
    pub results: Vec<MatchResultView>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateRequest {
    pub aid: Aid,
    pub profile: FarmerProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EligibilityRequest {
    pub profile: FarmerProfile,
    #[serde(default)]
    pub aids: Vec<LegacyAid>,
    #[serde(default)]
    pub permissive: bool,
}

/// Service composing the aid catalog with the batch ranker and the legacy listing.
pub struct MatchingService<C> {
    catalog: Arc<C>,
    ranker: BatchRanker,
    default_top_n: usize,
}

impl<C> MatchingService<C>
where
    C: AidCatalog + 'static,
{
    pub fn new(catalog: Arc<C>, ranker: BatchRanker, default_top_n: usize) -> Self {
        Self {
            catalog,
            ranker,
            default_top_n: default_top_n.max(1),
        }
    }

    pub fn default_top_n(&self) -> usize {
        self.default_top_n
    }

    /// Rank the catalog (or the supplied aids) for one profile and keep the top entries.
    pub fn match_profile(
        &self,
        request: MatchingRequest,
    ) -> Result<MatchingResponse, MatchingServiceError> {
        let MatchingRequest {
            profile,
            aids,
            top_n,
        } = request;

        let aids = match aids {
            Some(aids) => aids,
            None => self.catalog.active_aids()?,
        };

        let ranked = self.ranker.rank(&aids, &profile);
        let report = MatchReport::from_ranked(profile.profile_id.clone(), &ranked);
        let limit = top_n.unwrap_or(self.default_top_n);

        Ok(MatchingResponse {
            profile_id: profile.profile_id,
            generated_at: Utc::now(),
            report,
            results: ranked
                .results
                .iter()
                .take(limit)
                .map(MatchResult::view)
                .collect(),
        })
    }

    /// Score a single aid against a single profile.
    pub fn evaluate_pair(
        &self,
        request: &EvaluateRequest,
    ) -> Result<MatchResultView, MatchingServiceError> {
        let result = self.ranker.engine().evaluate(&request.aid, &request.profile)?;
        Ok(result.view())
    }

    pub fn check_eligibility(&self, request: &EligibilityRequest) -> EligibilityListing {
        let policy = if request.permissive {
            UnknownTermPolicy::Permissive
        } else {
            UnknownTermPolicy::Reject
        };
        legacy::check_eligibility(
            &ExpressionEvaluator::new(policy),
            &request.aids,
            &request.profile,
        )
    }
}

/// Error raised by the matching service.
#[derive(Debug, thiserror::Error)]
pub enum MatchingServiceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Evaluation(#[from] EvalError),
}
