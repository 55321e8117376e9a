use crate::{
    api::api_structs::{Competition, Placement, Submission},
    model::structures::{placement_status::PlacementStatus, verification_state::VerificationState}
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn base_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn generate_submission(
    id: &str,
    writer_id: &str,
    competition_id: &str,
    project_id: &str,
    created_at: DateTime<Utc>
) -> Submission {
    Submission {
        id: id.to_string(),
        writer_id: writer_id.to_string(),
        competition_id: competition_id.to_string(),
        project_id: project_id.to_string(),
        created_at
    }
}

pub fn generate_placement(
    id: &str,
    submission_id: &str,
    status: PlacementStatus,
    verification: VerificationState,
    created_at: DateTime<Utc>
) -> Placement {
    Placement {
        id: id.to_string(),
        submission_id: submission_id.to_string(),
        status,
        verification,
        created_at
    }
}

pub fn generate_competition(id: &str, title: &str, year: Option<i32>) -> Competition {
    Competition {
        id: id.to_string(),
        title: title.to_string(),
        year
    }
}

/// Generates a reproducible ledger: `n_writers` writers each submitting
/// `submissions_per_writer` distinct projects across five competitions, every
/// submission carrying one placement. Same seed, same world.
pub fn generate_ledger(
    n_writers: i32,
    submissions_per_writer: i32,
    seed: u64
) -> (Vec<Submission>, Vec<Placement>, Vec<Competition>) {
    let statuses = [
        PlacementStatus::Winner,
        PlacementStatus::RunnerUp,
        PlacementStatus::Finalist,
        PlacementStatus::Semifinalist,
        PlacementStatus::Quarterfinalist,
        PlacementStatus::Shortlist,
        PlacementStatus::Longlist,
        PlacementStatus::HonorableMention,
        PlacementStatus::Pending
    ];

    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let competitions: Vec<Competition> = (1..=5)
        .map(|i| generate_competition(&format!("comp-{i}"), &format!("Competition {i}"), Some(2023 + (i % 2))))
        .collect();

    let mut submissions = Vec::new();
    let mut placements = Vec::new();

    for w in 1..=n_writers {
        for s in 1..=submissions_per_writer {
            let index = (w - 1) * submissions_per_writer + s;
            let submission_id = format!("sub-{index}");
            let created_at = base_date() + Duration::hours(index as i64);
            let competition = &competitions[rng.random_range(0..competitions.len())];

            submissions.push(generate_submission(
                &submission_id,
                &format!("writer-{w}"),
                &competition.id,
                &format!("proj-{w}-{s}"),
                created_at
            ));

            let status = statuses[rng.random_range(0..statuses.len())];
            let verification = if rng.random_bool(0.7) {
                VerificationState::Verified
            } else {
                VerificationState::Unverified
            };

            placements.push(generate_placement(
                &format!("pl-{index}"),
                &submission_id,
                status,
                verification,
                created_at + Duration::minutes(30)
            ));
        }
    }

    (submissions, placements, competitions)
}
