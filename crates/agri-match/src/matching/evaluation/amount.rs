use serde::{Deserialize, Serialize};

use super::super::domain::{Aid, AmountKind, FarmerProfile};

/// Estimated award range for one aid and profile. Either end may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimatedAmount {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Per-surface aids are priced from the profile's UAA and capped by the ceiling;
/// every other payment model reports its stated range as-is.
pub fn estimate(aid: &Aid, profile: &FarmerProfile) -> EstimatedAmount {
    let amount = &aid.amount;

    if let (AmountKind::PerSurface, Some(per_unit)) = (amount.kind, amount.per_unit_amount) {
        let mut estimate = per_unit * profile.total_surface;
        if let Some(ceiling) = amount.ceiling {
            estimate = estimate.min(ceiling);
        }
        return EstimatedAmount {
            min: Some(estimate),
            max: Some(estimate),
        };
    }

    EstimatedAmount {
        min: amount.min_amount,
        max: amount.max_amount,
    }
}
