use crate::model::structures::{placement_status::PlacementStatus, verification_state::VerificationState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A writer's entry of one project into one competition, as reported by the
/// submission ledger.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub writer_id: String,
    pub competition_id: String,
    pub project_id: String,
    pub created_at: DateTime<Utc>
}

/// A reported outcome for a submission. Statuses outside the known table
/// deserialize as [`PlacementStatus::Unknown`] and score zero.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub id: String,
    pub submission_id: String,
    pub status: PlacementStatus,
    pub verification: VerificationState,
    pub created_at: DateTime<Utc>
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: String,
    pub title: String,
    /// Edition year, when the directory publishes one.
    pub year: Option<i32>
}

/// A script in the project directory. Format and genre drive leaderboard
/// filtering; the owner links projects back to their writer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub owner_writer_id: String,
    pub title: Option<String>,
    pub format: Option<String>,
    pub genre: Option<String>
}
