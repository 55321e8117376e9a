use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::model::{
    constants::{
        CONFIDENCE_FLOOR, CONFIDENCE_SAMPLE_THRESHOLD, DECAY_HALF_LIFE_DAYS, DEFAULT_PRESTIGE_MULTIPLIER,
        MAX_PRESTIGE_MULTIPLIER, METHODOLOGY_VERSION, UNVERIFIED_MULTIPLIER, WEIGHT_FINALIST,
        WEIGHT_HONORABLE_MENTION, WEIGHT_LONGLIST, WEIGHT_PENDING, WEIGHT_QUARTERFINALIST, WEIGHT_RUNNER_UP,
        WEIGHT_SEMIFINALIST, WEIGHT_SHORTLIST, WEIGHT_WINNER
    },
    structures::{
        placement_status::PlacementStatus, score_tier::ScoreTier, verification_state::VerificationState
    },
    tiers::tier_cutoff
};

/// Base weight for a placement outcome. Unknown statuses score nothing.
pub fn status_weight(status: PlacementStatus) -> f64 {
    match status {
        PlacementStatus::Winner => WEIGHT_WINNER,
        PlacementStatus::RunnerUp => WEIGHT_RUNNER_UP,
        PlacementStatus::Finalist => WEIGHT_FINALIST,
        PlacementStatus::Semifinalist => WEIGHT_SEMIFINALIST,
        PlacementStatus::Quarterfinalist => WEIGHT_QUARTERFINALIST,
        PlacementStatus::Shortlist => WEIGHT_SHORTLIST,
        PlacementStatus::Longlist => WEIGHT_LONGLIST,
        PlacementStatus::HonorableMention => WEIGHT_HONORABLE_MENTION,
        PlacementStatus::Pending => WEIGHT_PENDING,
        PlacementStatus::Unknown => 0.0
    }
}

/// Verified placements count at full value, everything else at half.
pub fn verification_multiplier(state: VerificationState) -> f64 {
    match state {
        VerificationState::Verified => 1.0,
        _ => UNVERIFIED_MULTIPLIER
    }
}

/// Exponential decay on placement age with a one-year half life.
///
/// Age is measured in whole UTC calendar days so the factor is stable for an
/// entire day regardless of when during the day the recompute runs.
pub fn time_decay_factor(placement_date: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let age_days = (now.date_naive() - placement_date.date_naive()).num_days();
    if age_days <= 0 {
        return 1.0;
    }

    0.5_f64.powf(age_days as f64 / DECAY_HALF_LIFE_DAYS)
}

/// Dampens scores for writers with a thin track record.
///
/// `evaluation_count` is the number of placements scored for the writer so far
/// in the current pass, including the one being scored.
pub fn confidence_factor(evaluation_count: i32) -> f64 {
    if evaluation_count >= CONFIDENCE_SAMPLE_THRESHOLD {
        return 1.0;
    }

    (evaluation_count as f64 / CONFIDENCE_SAMPLE_THRESHOLD as f64).max(CONFIDENCE_FLOOR)
}

/// The factor breakdown persisted with every placement score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreFactors {
    pub status_weight: f64,
    pub prestige_multiplier: f64,
    pub verification_multiplier: f64,
    pub time_decay_factor: f64,
    pub confidence_factor: f64
}

impl ScoreFactors {
    pub fn raw_score(&self) -> f64 {
        self.status_weight
            * self.prestige_multiplier
            * self.verification_multiplier
            * self.time_decay_factor
            * self.confidence_factor
    }
}

/// Scores a single placement from its inputs.
pub fn score_placement(
    status: PlacementStatus,
    prestige_multiplier: f64,
    verification: VerificationState,
    placement_date: DateTime<Utc>,
    now: DateTime<Utc>,
    evaluation_count: i32
) -> ScoreFactors {
    ScoreFactors {
        status_weight: status_weight(status),
        prestige_multiplier,
        verification_multiplier: verification_multiplier(verification),
        time_decay_factor: time_decay_factor(placement_date, now),
        confidence_factor: confidence_factor(evaluation_count)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusWeightEntry {
    pub status: PlacementStatus,
    pub weight: f64
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCutoffEntry {
    pub tier: ScoreTier,
    pub cutoff: f64
}

/// The published scoring methodology, assembled from the constant tables so it
/// can never drift from what the engine actually computes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringMethodology {
    pub version: &'static str,
    pub status_weights: Vec<StatusWeightEntry>,
    pub unverified_multiplier: f64,
    pub decay_half_life_days: f64,
    pub confidence_sample_threshold: i32,
    pub confidence_floor: f64,
    pub default_prestige_multiplier: f64,
    pub max_prestige_multiplier: f64,
    pub tier_cutoffs: Vec<TierCutoffEntry>
}

impl ScoringMethodology {
    pub fn current() -> Self {
        Self {
            version: METHODOLOGY_VERSION,
            status_weights: PlacementStatus::iter()
                .map(|status| StatusWeightEntry {
                    status,
                    weight: status_weight(status)
                })
                .collect(),
            unverified_multiplier: UNVERIFIED_MULTIPLIER,
            decay_half_life_days: DECAY_HALF_LIFE_DAYS,
            confidence_sample_threshold: CONFIDENCE_SAMPLE_THRESHOLD,
            confidence_floor: CONFIDENCE_FLOOR,
            default_prestige_multiplier: DEFAULT_PRESTIGE_MULTIPLIER,
            max_prestige_multiplier: MAX_PRESTIGE_MULTIPLIER,
            tier_cutoffs: ScoreTier::iter()
                .map(|tier| TierCutoffEntry {
                    tier,
                    cutoff: tier_cutoff(tier)
                })
                .collect()
        }
    }
}
