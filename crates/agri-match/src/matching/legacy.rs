use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::domain::{AidId, FarmerProfile, ProfileId};
use super::expression::ExpressionEvaluator;

const PROJECT_TAG_WEIGHT: f64 = 1.0;
const LABEL_TAG_WEIGHT: f64 = 0.8;
const PRODUCTION_TAG_WEIGHT: f64 = 0.6;

/// Aid record as stored by the older eligibility listing: a rule tree plus soft tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyAid {
    pub aid_id: AidId,
    pub title: String,
    #[serde(default)]
    pub hard_criteria: Value,
    #[serde(default)]
    pub soft_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyEligibility {
    pub aid_id: AidId,
    pub title: String,
    pub eligible: bool,
    pub reasons: Vec<String>,
    pub relevance: f64,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityListing {
    pub profile_id: ProfileId,
    pub total_aids: usize,
    pub total_eligible: usize,
    pub results: Vec<LegacyEligibility>,
}

/// Share of the aid's soft tags the profile covers, as a percentage with one decimal.
///
/// Tags are compared case-insensitively; a project hit outranks a label hit,
/// which outranks a production hit.
pub fn relevance_score(aid: &LegacyAid, profile: &FarmerProfile) -> f64 {
    if aid.soft_tags.is_empty() {
        return 0.0;
    }

    let projects: Vec<String> = profile
        .projects
        .iter()
        .map(|project| project.code().to_lowercase())
        .collect();
    let labels: Vec<String> = profile.labels.iter().map(|label| label.to_lowercase()).collect();
    let productions: Vec<String> = profile
        .productions
        .iter()
        .map(|production| production.code().to_lowercase())
        .collect();

    let earned: f64 = aid
        .soft_tags
        .iter()
        .map(|tag| {
            let tag = tag.to_lowercase();
            if projects.contains(&tag) {
                PROJECT_TAG_WEIGHT
            } else if labels.contains(&tag) {
                LABEL_TAG_WEIGHT
            } else if productions.contains(&tag) {
                PRODUCTION_TAG_WEIGHT
            } else {
                0.0
            }
        })
        .sum();

    let ratio = earned / aid.soft_tags.len() as f64;
    (ratio * 1000.0).round() / 10.0
}

fn summary(eligible: bool) -> &'static str {
    if eligible {
        "You are eligible for this aid. Your profile meets the required criteria."
    } else {
        "Not eligible for now. Check the missing criteria."
    }
}

/// Evaluate every legacy aid's rule tree and rank eligible aids first, then by relevance.
pub fn check_eligibility(
    evaluator: &ExpressionEvaluator,
    aids: &[LegacyAid],
    profile: &FarmerProfile,
) -> EligibilityListing {
    let mut results: Vec<LegacyEligibility> = aids
        .iter()
        .map(|aid| {
            let (eligible, reasons) = match evaluator.evaluate(&aid.hard_criteria, profile) {
                Ok(verdict) => (verdict.passed, verdict.rendered_reasons()),
                Err(error) => {
                    warn!(aid_id = %aid.aid_id, %error, "hard criteria could not be evaluated");
                    (false, vec![error.to_string()])
                }
            };
            LegacyEligibility {
                aid_id: aid.aid_id.clone(),
                title: aid.title.clone(),
                eligible,
                reasons,
                relevance: relevance_score(aid, profile),
                summary: summary(eligible).to_string(),
            }
        })
        .collect();

    results.sort_by(|left, right| {
        right.eligible.cmp(&left.eligible).then_with(|| {
            right
                .relevance
                .partial_cmp(&left.relevance)
                .unwrap_or(Ordering::Equal)
        })
    });

    let total_eligible = results.iter().filter(|result| result.eligible).count();
    info!(
        profile_id = %profile.profile_id,
        total = results.len(),
        eligible = total_eligible,
        policy = ?evaluator.policy(),
        "eligibility listing complete"
    );

    EligibilityListing {
        profile_id: profile.profile_id.clone(),
        total_aids: results.len(),
        total_eligible,
        results,
    }
}
