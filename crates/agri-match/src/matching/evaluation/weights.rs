//! Fixed scoring constants. These are part of the engine contract, not runtime configuration.

pub const GEOGRAPHY_WEIGHT: f64 = 25.0;
pub const PRODUCTION_WEIGHT: f64 = 20.0;
pub const PROJECT_WEIGHT: f64 = 15.0;
pub const LEGAL_STATUS_WEIGHT: f64 = 10.0;
pub const AGE_WEIGHT: f64 = 10.0;
pub const SURFACE_WEIGHT: f64 = 10.0;
pub const LABELS_WEIGHT: f64 = 10.0;

/// Share of the geography weight carried by the region sub-check.
pub const REGION_SHARE: f64 = 0.7;
pub const DEPARTMENT_SHARE: f64 = 0.3;

/// Share of the labels weight carried by the required-labels sub-score.
pub const REQUIRED_LABELS_SHARE: f64 = 0.6;
pub const BONUS_LABELS_SHARE: f64 = 0.4;

/// Minimum score for eligibility, provided no blocking category failed.
pub const ELIGIBILITY_THRESHOLD: f64 = 60.0;

/// Lower bound of the "near eligible" bucket used by batch reports.
pub const NEAR_ELIGIBLE_THRESHOLD: f64 = 40.0;

pub const MAX_SCORE: f64 = 100.0;
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Region values that open an aid to every region.
pub const NATIONWIDE_REGIONS: [&str; 2] = ["National", "France"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_weights_sum_to_max_score() {
        let total = GEOGRAPHY_WEIGHT
            + PRODUCTION_WEIGHT
            + PROJECT_WEIGHT
            + LEGAL_STATUS_WEIGHT
            + AGE_WEIGHT
            + SURFACE_WEIGHT
            + LABELS_WEIGHT;
        assert_eq!(total, MAX_SCORE);
        assert!((REGION_SHARE + DEPARTMENT_SHARE - 1.0).abs() < f64::EPSILON);
        assert!((REQUIRED_LABELS_SHARE + BONUS_LABELS_SHARE - 1.0).abs() < f64::EPSILON);
    }
}
