use std::io;

use serde::{Deserialize, Serialize};

use super::domain::{AidId, ProfileId};
use super::evaluation::{CriterionCategory, CriterionEvaluation, MatchResult};

/// Serialized explanation row with its text rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionView {
    pub name: String,
    pub category: CriterionCategory,
    pub valid: bool,
    pub blocking: bool,
    pub points: f64,
    pub max_points: f64,
    pub explanation: String,
}

impl From<&CriterionEvaluation> for CriterionView {
    fn from(row: &CriterionEvaluation) -> Self {
        Self {
            name: row.criterion.label().to_string(),
            category: row.category(),
            valid: row.valid,
            blocking: row.blocking,
            points: row.points,
            max_points: row.max_points,
            explanation: row.explanation(),
        }
    }
}

/// Boundary shape of a match result returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResultView {
    pub aid_id: AidId,
    pub profile_id: ProfileId,
    pub score: f64,
    pub eligible: bool,
    pub criteria: Vec<CriterionView>,
    pub passed_criteria: usize,
    pub total_criteria: usize,
    pub blocking_failures: Vec<String>,
    pub estimated_min: Option<f64>,
    pub estimated_max: Option<f64>,
    pub summary: String,
    pub recommendations: Vec<String>,
}

impl MatchResult {
    pub fn view(&self) -> MatchResultView {
        MatchResultView {
            aid_id: self.aid_id.clone(),
            profile_id: self.profile_id.clone(),
            score: self.score,
            eligible: self.eligible,
            criteria: self.criteria.iter().map(CriterionView::from).collect(),
            passed_criteria: self.passed_criteria,
            total_criteria: self.total_criteria,
            blocking_failures: self
                .blocking_failures
                .iter()
                .map(|category| category.label().to_string())
                .collect(),
            estimated_min: self.estimated_amount.min,
            estimated_max: self.estimated_amount.max,
            summary: self.summary.text(),
            recommendations: self
                .recommendations
                .iter()
                .map(|recommendation| recommendation.text().to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct RankingRow<'a> {
    rank: usize,
    aid_id: &'a str,
    score: f64,
    eligible: bool,
    estimated_min: Option<f64>,
    estimated_max: Option<f64>,
    summary: String,
}

/// Write ranked results as CSV, one row per aid in ranking order.
pub fn write_ranking_csv<W: io::Write>(results: &[MatchResult], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (index, result) in results.iter().enumerate() {
        csv_writer.serialize(RankingRow {
            rank: index + 1,
            aid_id: &result.aid_id.0,
            score: result.score,
            eligible: result.eligible,
            estimated_min: result.estimated_amount.min,
            estimated_max: result.estimated_amount.max,
            summary: result.summary.text(),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
