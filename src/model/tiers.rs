use crate::model::{
    constants::{TIER_TOP_10_CUTOFF, TIER_TOP_1_CUTOFF, TIER_TOP_25_CUTOFF, TIER_TOP_2_CUTOFF},
    structures::score_tier::ScoreTier
};

pub fn tier_cutoff(tier: ScoreTier) -> f64 {
    match tier {
        ScoreTier::Top1 => TIER_TOP_1_CUTOFF,
        ScoreTier::Top2 => TIER_TOP_2_CUTOFF,
        ScoreTier::Top10 => TIER_TOP_10_CUTOFF,
        ScoreTier::Top25 => TIER_TOP_25_CUTOFF
    }
}

/// Assigns a percentile tier from a 1-based rank and the size of the ranked
/// population. Writers below the top 25% band carry no tier, and small
/// populations can leave the upper bands empty entirely.
pub fn assign_tier(rank: i32, total_ranked: i32) -> Option<ScoreTier> {
    if rank < 1 || total_ranked < 1 || rank > total_ranked {
        return None;
    }

    let fraction = rank as f64 / total_ranked as f64;
    if fraction <= TIER_TOP_1_CUTOFF {
        Some(ScoreTier::Top1)
    } else if fraction <= TIER_TOP_2_CUTOFF {
        Some(ScoreTier::Top2)
    } else if fraction <= TIER_TOP_10_CUTOFF {
        Some(ScoreTier::Top10)
    } else if fraction <= TIER_TOP_25_CUTOFF {
        Some(ScoreTier::Top25)
    } else {
        None
    }
}
