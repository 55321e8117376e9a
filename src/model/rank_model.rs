use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Utc};
use indexmap::IndexMap;
use itertools::Itertools;

use crate::{
    api::api_structs::{Competition, Placement, Submission},
    database::db_structs::{PlacementScore, WriterBadge, WriterScore},
    model::{
        badges::{badge_label, deserves_badge},
        constants::DEFAULT_PRESTIGE_MULTIPLIER,
        duplicates::{detect_duplicate_submissions, DuplicateSubmissionGroup},
        scoring::score_placement,
        tiers::assign_tier
    },
    utils::progress_utils::progress_bar
};

/// Everything the ranking pass consumes, fetched up front so the pass itself
/// touches neither the database nor the network.
pub struct RankingInputs<'a> {
    pub submissions: &'a [Submission],
    pub placements: &'a [Placement],
    pub competitions: &'a [Competition],
    /// Competition id to prestige multiplier. Missing ids score at 1.0.
    pub prestige_multipliers: &'a HashMap<String, f64>,
    /// Placement ids that already carry a badge from an earlier run.
    pub badged_placement_ids: &'a HashSet<String>,
    /// Writer id to total score at the trending baseline.
    pub baseline_scores: &'a HashMap<String, f64>,
    pub now: DateTime<Utc>
}

/// The rebuilt ranking world, ready for persistence.
#[derive(Debug)]
pub struct RankingComputation {
    pub placement_scores: Vec<PlacementScore>,
    pub writer_scores: Vec<WriterScore>,
    pub new_badges: Vec<WriterBadge>,
    pub duplicate_groups: Vec<DuplicateSubmissionGroup>,
    pub placements_skipped: usize
}

struct WriterAccumulator {
    total: f64,
    placements: i32
}

/// # Ranking pass
///
/// Rebuilds every placement score and writer score from scratch.
///
/// Steps:
/// 1. Order placements canonically by (created_at, id) so per-writer
///    evaluation counts, and therefore confidence factors, are identical on
///    every run over the same data.
/// 2. Score each placement, accumulating per-writer totals in first-seen
///    order. Placements pointing at unknown submissions are skipped and
///    counted.
/// 3. Collect badges for verified placements at quarterfinalist weight and
///    above that have not been awarded before.
/// 4. Rank writers with positive totals by descending score, assign percentile
///    tiers, and diff totals against the trending baseline.
/// 5. Detect duplicate submission groups for the anti-gaming surface.
pub fn compute_rankings(inputs: &RankingInputs) -> RankingComputation {
    let submissions_by_id: HashMap<&str, &Submission> =
        inputs.submissions.iter().map(|s| (s.id.as_str(), s)).collect();
    let competitions_by_id: HashMap<&str, &Competition> =
        inputs.competitions.iter().map(|c| (c.id.as_str(), c)).collect();

    let ordered: Vec<&Placement> = inputs
        .placements
        .iter()
        .sorted_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)))
        .collect();

    let bar = progress_bar(ordered.len() as u64, "Scoring placements".to_string());

    let mut accumulators: IndexMap<String, WriterAccumulator> = IndexMap::new();
    let mut placement_scores = Vec::with_capacity(ordered.len());
    let mut new_badges = Vec::new();
    let mut placements_skipped = 0;

    for placement in ordered {
        if let Some(bar) = &bar {
            bar.inc(1);
        }

        let Some(submission) = submissions_by_id.get(placement.submission_id.as_str()) else {
            placements_skipped += 1;
            continue;
        };

        let accumulator = accumulators
            .entry(submission.writer_id.clone())
            .or_insert(WriterAccumulator {
                total: 0.0,
                placements: 0
            });
        accumulator.placements += 1;

        let prestige_multiplier = inputs
            .prestige_multipliers
            .get(&submission.competition_id)
            .copied()
            .unwrap_or(DEFAULT_PRESTIGE_MULTIPLIER);

        let factors = score_placement(
            placement.status,
            prestige_multiplier,
            placement.verification,
            placement.created_at,
            inputs.now,
            accumulator.placements
        );
        let raw_score = factors.raw_score();
        accumulator.total += raw_score;

        placement_scores.push(PlacementScore {
            id: 0,
            placement_id: placement.id.clone(),
            writer_id: submission.writer_id.clone(),
            competition_id: submission.competition_id.clone(),
            project_id: submission.project_id.clone(),
            status_weight: factors.status_weight,
            prestige_multiplier: factors.prestige_multiplier,
            verification_multiplier: factors.verification_multiplier,
            time_decay_factor: factors.time_decay_factor,
            confidence_factor: factors.confidence_factor,
            raw_score,
            placement_date: placement.created_at
        });

        if deserves_badge(placement.status, placement.verification)
            && !inputs.badged_placement_ids.contains(&placement.id)
        {
            let (title, year) = match competitions_by_id.get(submission.competition_id.as_str()) {
                Some(competition) => (
                    competition.title.as_str(),
                    competition.year.unwrap_or_else(|| placement.created_at.year())
                ),
                // Directory degraded or stale; the id is still unambiguous
                None => (submission.competition_id.as_str(), placement.created_at.year())
            };

            new_badges.push(WriterBadge {
                id: 0,
                writer_id: submission.writer_id.clone(),
                label: badge_label(year, title, placement.status),
                placement_id: placement.id.clone(),
                competition_id: submission.competition_id.clone(),
                awarded_at: inputs.now
            });
        }
    }

    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }

    let mut submission_counts: HashMap<&str, i32> = HashMap::new();
    for submission in inputs.submissions {
        *submission_counts.entry(submission.writer_id.as_str()).or_default() += 1;
    }

    // Stable sort over first-seen order keeps tied scores in canonical order,
    // so ranks stay a dense 1..N permutation across runs
    let mut ranked: Vec<(String, WriterAccumulator)> = accumulators
        .into_iter()
        .filter(|(_, accumulator)| accumulator.total > 0.0)
        .collect();
    ranked.sort_by(|a, b| b.1.total.total_cmp(&a.1.total));

    let total_ranked = ranked.len() as i32;
    let writer_scores = ranked
        .into_iter()
        .enumerate()
        .map(|(index, (writer_id, accumulator))| {
            let rank = index as i32 + 1;
            let score_change_30d = inputs
                .baseline_scores
                .get(&writer_id)
                .map(|baseline| accumulator.total - baseline)
                .unwrap_or(0.0);

            WriterScore {
                total_score: accumulator.total,
                submission_count: submission_counts.get(writer_id.as_str()).copied().unwrap_or(0),
                placement_count: accumulator.placements,
                rank,
                tier: assign_tier(rank, total_ranked),
                score_change_30d,
                updated_at: inputs.now,
                writer_id
            }
        })
        .collect();

    RankingComputation {
        placement_scores,
        writer_scores,
        new_badges,
        duplicate_groups: detect_duplicate_submissions(inputs.submissions),
        placements_skipped
    }
}
