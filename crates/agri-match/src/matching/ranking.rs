use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{Aid, AidId, FarmerProfile, ProfileId};
use super::evaluation::weights::NEAR_ELIGIBLE_THRESHOLD;
use super::evaluation::{EvalError, MatchResult, MatchingEngine};

/// Aid dropped from a batch because it could not be evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedAid {
    pub aid_id: AidId,
    pub reason: String,
}

/// Sorted results of a batch run plus the aids that were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedMatches {
    pub results: Vec<MatchResult>,
    pub skipped: Vec<SkippedAid>,
}

/// Evaluates a catalog slice for one profile, optionally across the rayon pool.
#[derive(Debug, Clone, Copy)]
pub struct BatchRanker {
    engine: MatchingEngine,
    parallel: bool,
}

impl BatchRanker {
    pub fn new(parallel: bool) -> Self {
        Self {
            engine: MatchingEngine::new(),
            parallel,
        }
    }

    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    pub fn rank(&self, aids: &[Aid], profile: &FarmerProfile) -> RankedMatches {
        let ranked = rank_all(&self.engine, aids, profile, self.parallel);
        info!(
            profile_id = %profile.profile_id,
            evaluated = ranked.results.len(),
            skipped = ranked.skipped.len(),
            eligible = ranked.results.iter().filter(|result| result.eligible).count(),
            "batch ranking complete"
        );
        ranked
    }
}

impl Default for BatchRanker {
    fn default() -> Self {
        Self::new(true)
    }
}

pub(crate) fn rank_all(
    engine: &MatchingEngine,
    aids: &[Aid],
    profile: &FarmerProfile,
    parallel: bool,
) -> RankedMatches {
    let outcomes: Vec<Result<MatchResult, EvalError>> = if parallel {
        aids.par_iter()
            .map(|aid| engine.evaluate(aid, profile))
            .collect()
    } else {
        aids.iter().map(|aid| engine.evaluate(aid, profile)).collect()
    };

    let mut ranked = RankedMatches::default();
    for (aid, outcome) in aids.iter().zip(outcomes) {
        match outcome {
            Ok(result) => ranked.results.push(result),
            Err(error) => {
                warn!(aid_id = %aid.aid_id, %error, "skipping aid that could not be evaluated");
                ranked.skipped.push(SkippedAid {
                    aid_id: aid.aid_id.clone(),
                    reason: error.to_string(),
                });
            }
        }
    }

    sort_ranked(&mut ranked.results);
    ranked
}

/// Eligible results first, then descending score. The sort is stable.
pub fn sort_ranked(results: &mut [MatchResult]) {
    results.sort_by(|left, right| {
        right
            .eligible
            .cmp(&left.eligible)
            .then_with(|| right.score.total_cmp(&left.score))
    });
}

/// Aggregate figures for a batch run over one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub profile_id: ProfileId,
    pub total_aids: usize,
    pub eligible: usize,
    pub near_eligible: usize,
    pub not_eligible: usize,
    pub skipped: usize,
    /// Summed over eligible results only.
    pub estimated_total_min: f64,
    pub estimated_total_max: f64,
}

impl MatchReport {
    pub fn from_ranked(profile_id: ProfileId, ranked: &RankedMatches) -> Self {
        let results = &ranked.results;
        let eligible: Vec<&MatchResult> = results.iter().filter(|result| result.eligible).collect();

        let estimated_total_min: f64 = eligible
            .iter()
            .filter_map(|result| result.estimated_amount.min)
            .sum();
        let estimated_total_max: f64 = eligible
            .iter()
            .filter_map(|result| result.estimated_amount.max)
            .sum();

        Self {
            profile_id,
            total_aids: results.len(),
            eligible: eligible.len(),
            near_eligible: results
                .iter()
                .filter(|result| result.is_near_eligible())
                .count(),
            not_eligible: results
                .iter()
                .filter(|result| result.score < NEAR_ELIGIBLE_THRESHOLD)
                .count(),
            skipped: ranked.skipped.len(),
            estimated_total_min: round_amount(estimated_total_min),
            estimated_total_max: round_amount(estimated_total_max),
        }
    }
}

fn round_amount(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
