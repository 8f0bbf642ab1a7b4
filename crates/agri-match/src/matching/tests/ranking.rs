use std::collections::BTreeSet;

use super::common::*;
use crate::matching::domain::{AmountKind, ProductionType, ProjectType};
use crate::matching::ranking::{sort_ranked, BatchRanker, MatchReport};
use crate::matching::views::write_ranking_csv;
use crate::matching::MatchingEngine;

fn catalog() -> Vec<crate::matching::domain::Aid> {
    let mut per_hectare = aid("per-hectare");
    per_hectare.amount.kind = AmountKind::PerSurface;
    per_hectare.amount.per_unit_amount = Some(50.0);
    per_hectare.amount.ceiling = Some(3000.0);

    let mut advisory = aid_with("advisory", |criteria| {
        criteria.project_types = BTreeSet::from([ProjectType::Irrigation]);
    });
    advisory.amount.min_amount = Some(1000.0);
    advisory.amount.max_amount = Some(2500.0);

    let mut blocked = aid_with("blocked", |criteria| {
        criteria.production_types = BTreeSet::from([ProductionType::Dairy]);
    });
    blocked.amount.min_amount = Some(99_999.0);

    let mut broken = aid("broken");
    broken.amount.ceiling = Some(f64::INFINITY);

    vec![blocked, advisory, broken, per_hectare]
}

#[test]
fn batch_skips_unscorable_aids_and_sorts_the_rest() {
    let ranked = BatchRanker::new(false).rank(&catalog(), &profile());

    let ids: Vec<&str> = ranked
        .results
        .iter()
        .map(|result| result.aid_id.0.as_str())
        .collect();
    assert_eq!(ids, vec!["per-hectare", "advisory", "blocked"]);
    assert_eq!(ranked.skipped.len(), 1);
    assert_eq!(ranked.skipped[0].aid_id.0, "broken");
    assert!(ranked.skipped[0].reason.contains("ceiling"));
}

#[test]
fn parallel_and_sequential_batches_agree() {
    let sequential = BatchRanker::new(false).rank(&catalog(), &profile());
    let parallel = BatchRanker::new(true).rank(&catalog(), &profile());

    assert_eq!(sequential, parallel);
}

#[test]
fn ties_keep_catalog_order() {
    let aids = vec![aid("first"), aid("second"), aid("third")];

    let ranked = BatchRanker::default().rank(&aids, &profile());

    let ids: Vec<&str> = ranked
        .results
        .iter()
        .map(|result| result.aid_id.0.as_str())
        .collect();
    assert_eq!(ids, vec!["first", "second", "third"]);
}

#[test]
fn sort_puts_eligible_results_before_higher_scores() {
    let engine = MatchingEngine::new();
    let mut eligible = engine.evaluate(&aid("eligible"), &profile()).expect("evaluates");
    eligible.score = 61.0;
    let mut near = engine.evaluate(&aid("near"), &profile()).expect("evaluates");
    near.eligible = false;
    near.score = 90.0;

    let mut results = vec![near, eligible];
    sort_ranked(&mut results);

    assert_eq!(results[0].aid_id.0, "eligible");
}

#[test]
fn report_buckets_results_and_sums_eligible_amounts() {
    let ranked = BatchRanker::new(false).rank(&catalog(), &profile());

    let report = MatchReport::from_ranked(profile().profile_id, &ranked);

    assert_eq!(report.total_aids, 3);
    assert_eq!(report.eligible, 2);
    assert_eq!(report.near_eligible, 0);
    assert_eq!(report.not_eligible, 1);
    assert_eq!(report.skipped, 1);
    // 3000 capped per-hectare estimate plus the advisory aid's flat range
    assert_eq!(report.estimated_total_min, 4000.0);
    assert_eq!(report.estimated_total_max, 5500.0);
}

#[test]
fn near_eligible_counts_scores_between_thresholds() {
    let engine = MatchingEngine::new();
    let mut near = engine.evaluate(&aid("near"), &profile()).expect("evaluates");
    near.eligible = false;
    near.score = 45.0;
    let ranked = crate::matching::ranking::RankedMatches {
        results: vec![near],
        skipped: Vec::new(),
    };

    let report = MatchReport::from_ranked(profile().profile_id, &ranked);

    assert_eq!(report.near_eligible, 1);
    assert_eq!(report.not_eligible, 0);
    assert_eq!(report.estimated_total_min, 0.0);
}

#[test]
fn ranking_csv_lists_one_row_per_result() {
    let ranked = BatchRanker::new(false).rank(&catalog(), &profile());
    let mut buffer = Vec::new();

    write_ranking_csv(&ranked.results, &mut buffer).expect("csv written");

    let text = String::from_utf8(buffer).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "rank,aid_id,score,eligible,estimated_min,estimated_max,summary"
    );
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("1,per-hectare,100.0,true,3000.0,3000.0,"));
}
