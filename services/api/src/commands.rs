use crate::infra::read_json;
use agri_match::config::{AppConfig, MatchingConfig};
use agri_match::error::AppError;
use agri_match::matching::{
    write_ranking_csv, Aid, BatchRanker, ExpressionEvaluator, ExpressionVerdict, FarmerProfile,
    MatchReport, MatchResult, UnknownTermPolicy,
};
use clap::Args;
use serde_json::Value;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// JSON file holding the farmer profile
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// JSON file holding an array of aids
    #[arg(long)]
    pub(crate) aids: PathBuf,
    /// Number of results to print (defaults to MATCH_TOP_N)
    #[arg(long)]
    pub(crate) top_n: Option<usize>,
    /// Also write the full ranking as CSV to this path
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// JSON file holding the farmer profile
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// Rule expression as inline JSON, e.g. '{">=": ["$age", 18]}'
    #[arg(long)]
    pub(crate) expression: String,
    /// Treat unknown fields and operators as pass-through instead of failing
    #[arg(long)]
    pub(crate) permissive: bool,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    for line in rank_files(&args, &config.matching)? {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let verdict = check_expression(&args)?;
    for line in render_verdict(&verdict) {
        println!("{line}");
    }
    Ok(())
}

fn rank_files(args: &RankArgs, matching: &MatchingConfig) -> Result<Vec<String>, AppError> {
    let profile: FarmerProfile = read_json(&args.profile)?;
    let aids: Vec<Aid> = read_json(&args.aids)?;

    let ranked = BatchRanker::new(matching.parallel).rank(&aids, &profile);
    let report = MatchReport::from_ranked(profile.profile_id.clone(), &ranked);

    if let Some(path) = &args.csv {
        let writer = BufWriter::new(File::create(path)?);
        write_ranking_csv(&ranked.results, writer).map_err(std::io::Error::from)?;
    }

    let top_n = args.top_n.unwrap_or(matching.top_n).max(1);
    let mut lines = vec![describe_profile(&profile)];
    lines.extend(render_ranking(&report, &ranked.results, top_n));
    for skipped in &ranked.skipped {
        lines.push(format!("skipped {}: {}", skipped.aid_id, skipped.reason));
    }
    Ok(lines)
}

fn check_expression(args: &CheckArgs) -> Result<ExpressionVerdict, AppError> {
    let profile: FarmerProfile = read_json(&args.profile)?;
    let expression: Value = serde_json::from_str(&args.expression)?;
    let policy = if args.permissive {
        UnknownTermPolicy::Permissive
    } else {
        UnknownTermPolicy::Reject
    };

    Ok(ExpressionEvaluator::new(policy).evaluate(&expression, &profile)?)
}

fn describe_profile(profile: &FarmerProfile) -> String {
    let productions: Vec<&str> = profile.productions.iter().map(|p| p.label()).collect();
    let projects: Vec<&str> = profile.projects.iter().map(|p| p.label()).collect();
    format!(
        "Farm {}: {}, {} ha, productions: {}, projects: {}",
        profile.profile_id,
        profile.legal_status.label(),
        profile.total_surface,
        or_none(&productions),
        or_none(&projects)
    )
}

fn or_none(items: &[&str]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn render_ranking(report: &MatchReport, results: &[MatchResult], top_n: usize) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Profile {}: {} aids ranked, {} eligible, {} near eligible, {} not eligible, {} skipped",
            report.profile_id,
            report.total_aids,
            report.eligible,
            report.near_eligible,
            report.not_eligible,
            report.skipped
        ),
        format!(
            "Estimated eligible funding: {:.2} - {:.2}",
            report.estimated_total_min, report.estimated_total_max
        ),
    ];

    for (index, result) in results.iter().take(top_n).enumerate() {
        lines.push(format!(
            "{:>2}. [{:>5.1}] {} - {}",
            index + 1,
            result.score,
            result.aid_id,
            result.summary.text()
        ));
        for recommendation in &result.recommendations {
            lines.push(format!("      -> {}", recommendation.text()));
        }
    }

    lines
}

fn render_verdict(verdict: &ExpressionVerdict) -> Vec<String> {
    let mut lines = vec![if verdict.passed {
        "Eligible".to_string()
    } else {
        "Not eligible".to_string()
    }];
    lines.extend(
        verdict
            .rendered_reasons()
            .into_iter()
            .map(|reason| format!("  {reason}")),
    );
    lines
}
