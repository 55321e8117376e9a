use crate::model::structures::{
    appeal::AppealStatus,
    flag::{FlagReason, FlagStatus},
    prestige_tier::PrestigeTier,
    score_tier::ScoreTier
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// One scored placement event with its full factor breakdown.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementScore {
    /// Unknown until insertion
    pub id: i32,
    pub placement_id: String,
    pub writer_id: String,
    pub competition_id: String,
    pub project_id: String,
    pub status_weight: f64,
    pub prestige_multiplier: f64,
    pub verification_multiplier: f64,
    pub time_decay_factor: f64,
    pub confidence_factor: f64,
    pub raw_score: f64,
    pub placement_date: DateTime<Utc>
}

/// A writer's aggregate standing on the leaderboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriterScore {
    pub writer_id: String,
    pub total_score: f64,
    pub submission_count: i32,
    pub placement_count: i32,
    pub rank: i32,
    pub tier: Option<ScoreTier>,
    pub score_change_30d: f64,
    pub updated_at: DateTime<Utc>
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionPrestige {
    pub competition_id: String,
    pub multiplier: f64,
    pub tier: PrestigeTier,
    pub updated_by: String,
    pub updated_at: DateTime<Utc>
}

/// Permanent recognition for a strong verified placement. Never revoked by
/// recomputes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriterBadge {
    /// Unknown until insertion
    pub id: i32,
    pub writer_id: String,
    pub label: String,
    pub placement_id: String,
    pub competition_id: String,
    pub awarded_at: DateTime<Utc>
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSnapshot {
    pub id: i32,
    pub writer_id: String,
    pub snapshot_date: NaiveDate,
    pub total_score: f64
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AntiGamingFlag {
    pub id: i32,
    pub writer_id: String,
    pub reason: FlagReason,
    pub details: String,
    pub status: FlagStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingAppeal {
    pub id: i32,
    pub writer_id: String,
    pub reason: String,
    pub status: AppealStatus,
    pub resolution_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>
}

/// A page of the leaderboard plus the total number of rows matching the
/// filter, so callers can page without a second query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardPage {
    pub entries: Vec<WriterScore>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64
}

/// A writer's score joined with their permanent badges.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriterProfile {
    pub score: WriterScore,
    pub badges: Vec<WriterBadge>
}
