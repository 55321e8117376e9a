use super::db_structs::{
    AntiGamingFlag, CompetitionPrestige, LeaderboardPage, PlacementScore, RankingAppeal, ScoreSnapshot,
    WriterBadge, WriterScore
};
use crate::{
    model::{
        constants::{DEFAULT_LEADERBOARD_LIMIT, RECOMPUTE_LOCK_KEY},
        structures::{
            appeal::AppealStatus,
            flag::{FlagReason, FlagStatus},
            prestige_tier::PrestigeTier,
            score_tier::ScoreTier
        }
    },
    utils::progress_utils::progress_bar
};
use chrono::{DateTime, NaiveDate, Utc};
use itertools::Itertools;
use postgres_types::ToSql;
use std::{
    collections::{HashMap, HashSet},
    str::FromStr,
    sync::Arc
};
use tokio_postgres::{Client, Error, NoTls, Row};
use tracing::{error, info};

/// Filter applied to the persisted leaderboard. The allowlist, when present,
/// restricts results to the given writers; an empty allowlist matches nothing.
#[derive(Debug, Clone)]
pub struct LeaderboardFilter {
    pub tier: Option<ScoreTier>,
    pub trending: bool,
    pub writer_allowlist: Option<Vec<String>>,
    pub limit: i64,
    pub offset: i64
}

impl Default for LeaderboardFilter {
    fn default() -> Self {
        Self {
            tier: None,
            trending: false,
            writer_allowlist: None,
            limit: DEFAULT_LEADERBOARD_LIMIT,
            offset: 0
        }
    }
}

#[derive(Clone)]
pub struct DbClient {
    client: Arc<Client>
}

impl DbClient {
    // Connect to the database and return a DbClient instance
    pub async fn connect(connection_str: &str) -> Result<Self, Error> {
        let (client, connection) = tokio_postgres::connect(connection_str, NoTls).await?;

        // Spawn the connection object to run in the background
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("connection error: {}", e);
            }
        });

        Ok(DbClient {
            client: Arc::new(client)
        })
    }

    /// Applies the engine schema. Idempotent.
    pub async fn ensure_schema(&self) -> Result<(), Error> {
        self.client.batch_execute(include_str!("schema.sql")).await?;
        info!("Schema ensured");
        Ok(())
    }

    // Access the underlying Client
    pub fn client(&self) -> Arc<Client> {
        Arc::clone(&self.client)
    }

    /// Attempts to take the session-level recompute lock. Returns false when
    /// another session already holds it.
    pub async fn try_acquire_recompute_lock(&self) -> Result<bool, Error> {
        let row = self
            .client
            .query_one("SELECT pg_try_advisory_lock($1)", &[&RECOMPUTE_LOCK_KEY])
            .await?;
        Ok(row.get(0))
    }

    pub async fn release_recompute_lock(&self) -> Result<bool, Error> {
        let row = self
            .client
            .query_one("SELECT pg_advisory_unlock($1)", &[&RECOMPUTE_LOCK_KEY])
            .await?;
        Ok(row.get(0))
    }

    /// Replaces the scored world in a single transaction: clears and rebuilds
    /// placement scores, upserts writer scores (writers absent from this run
    /// keep their previous row) and inserts any new badges. Returns the number
    /// of badges actually inserted (already-awarded placements are skipped by
    /// the unique constraint).
    pub async fn replace_rankings(
        &self,
        placement_scores: &[PlacementScore],
        writer_scores: &[WriterScore],
        new_badges: &[WriterBadge]
    ) -> Result<u64, Error> {
        self.client.execute("BEGIN", &[]).await?;

        match self
            .replace_rankings_in_tx(placement_scores, writer_scores, new_badges)
            .await
        {
            Ok(badges_awarded) => {
                self.client.execute("COMMIT", &[]).await?;
                info!(
                    "Persisted {} placement scores, {} writer scores, {} new badges",
                    placement_scores.len(),
                    writer_scores.len(),
                    badges_awarded
                );
                Ok(badges_awarded)
            }
            Err(e) => {
                if let Err(rollback_error) = self.client.execute("ROLLBACK", &[]).await {
                    error!("rollback failed: {}", rollback_error);
                }
                Err(e)
            }
        }
    }

    async fn replace_rankings_in_tx(
        &self,
        placement_scores: &[PlacementScore],
        writer_scores: &[WriterScore],
        new_badges: &[WriterBadge]
    ) -> Result<u64, Error> {
        self.client.execute("DELETE FROM placement_scores", &[]).await?;

        self.insert_placement_scores(placement_scores).await?;
        self.upsert_writer_scores(writer_scores).await?;
        self.insert_badges(new_badges).await
    }

    async fn insert_placement_scores(&self, scores: &[PlacementScore]) -> Result<(), Error> {
        if scores.is_empty() {
            return Ok(());
        }

        let bar = progress_bar(scores.len() as u64, "Saving placement scores".to_string());

        // 11 parameters per row keeps chunks well under the protocol limit
        for chunk in scores.chunks(500) {
            let mut placeholders = Vec::with_capacity(chunk.len());
            let mut params: Vec<&(dyn ToSql + Sync)> = Vec::with_capacity(chunk.len() * 11);

            for (i, score) in chunk.iter().enumerate() {
                let base = i * 11;
                placeholders.push(format!(
                    "(${}, ${}, ${}, ${}, ${}, ${}, ${}, ${}, ${}, ${}, ${})",
                    base + 1,
                    base + 2,
                    base + 3,
                    base + 4,
                    base + 5,
                    base + 6,
                    base + 7,
                    base + 8,
                    base + 9,
                    base + 10,
                    base + 11
                ));
                params.push(&score.placement_id);
                params.push(&score.writer_id);
                params.push(&score.competition_id);
                params.push(&score.project_id);
                params.push(&score.status_weight);
                params.push(&score.prestige_multiplier);
                params.push(&score.verification_multiplier);
                params.push(&score.time_decay_factor);
                params.push(&score.confidence_factor);
                params.push(&score.raw_score);
                params.push(&score.placement_date);
            }

            let query = format!(
                "INSERT INTO placement_scores (placement_id, writer_id, competition_id, project_id, \
                 status_weight, prestige_multiplier, verification_multiplier, time_decay_factor, \
                 confidence_factor, raw_score, placement_date) VALUES {}",
                placeholders.join(", ")
            );
            self.client.execute(query.as_str(), &params).await?;

            if let Some(bar) = &bar {
                bar.inc(chunk.len() as u64);
            }
        }

        if let Some(bar) = &bar {
            bar.finish_and_clear();
        }

        Ok(())
    }

    // Writers absent from the current run keep their previous row, so this is
    // an upsert rather than a clear and refill.
    async fn upsert_writer_scores(&self, scores: &[WriterScore]) -> Result<(), Error> {
        if scores.is_empty() {
            return Ok(());
        }

        for chunk in scores.chunks(500) {
            let tiers: Vec<Option<String>> = chunk.iter().map(|w| w.tier.map(|t| t.to_string())).collect();

            let mut placeholders = Vec::with_capacity(chunk.len());
            let mut params: Vec<&(dyn ToSql + Sync)> = Vec::with_capacity(chunk.len() * 8);

            for (i, (score, tier)) in chunk.iter().zip(&tiers).enumerate() {
                let base = i * 8;
                placeholders.push(format!(
                    "(${}, ${}, ${}, ${}, ${}, ${}, ${}, ${})",
                    base + 1,
                    base + 2,
                    base + 3,
                    base + 4,
                    base + 5,
                    base + 6,
                    base + 7,
                    base + 8
                ));
                params.push(&score.writer_id);
                params.push(&score.total_score);
                params.push(&score.submission_count);
                params.push(&score.placement_count);
                params.push(&score.rank);
                params.push(tier);
                params.push(&score.score_change_30d);
                params.push(&score.updated_at);
            }

            let query = format!(
                "INSERT INTO writer_scores (writer_id, total_score, submission_count, placement_count, \
                 rank, tier, score_change_30d, updated_at) VALUES {} \
                 ON CONFLICT (writer_id) DO UPDATE SET total_score = EXCLUDED.total_score, \
                 submission_count = EXCLUDED.submission_count, placement_count = EXCLUDED.placement_count, \
                 rank = EXCLUDED.rank, tier = EXCLUDED.tier, score_change_30d = EXCLUDED.score_change_30d, \
                 updated_at = EXCLUDED.updated_at",
                placeholders.join(", ")
            );
            self.client.execute(query.as_str(), &params).await?;
        }

        Ok(())
    }

    async fn insert_badges(&self, badges: &[WriterBadge]) -> Result<u64, Error> {
        if badges.is_empty() {
            return Ok(0);
        }

        let mut awarded = 0;
        for chunk in badges.chunks(500) {
            let mut placeholders = Vec::with_capacity(chunk.len());
            let mut params: Vec<&(dyn ToSql + Sync)> = Vec::with_capacity(chunk.len() * 5);

            for (i, badge) in chunk.iter().enumerate() {
                let base = i * 5;
                placeholders.push(format!(
                    "(${}, ${}, ${}, ${}, ${})",
                    base + 1,
                    base + 2,
                    base + 3,
                    base + 4,
                    base + 5
                ));
                params.push(&badge.writer_id);
                params.push(&badge.label);
                params.push(&badge.placement_id);
                params.push(&badge.competition_id);
                params.push(&badge.awarded_at);
            }

            let query = format!(
                "INSERT INTO writer_badges (writer_id, label, placement_id, competition_id, awarded_at) \
                 VALUES {} ON CONFLICT (placement_id) DO NOTHING",
                placeholders.join(", ")
            );
            awarded += self.client.execute(query.as_str(), &params).await?;
        }

        Ok(awarded)
    }

    /// Placement ids that already carry a badge, so recomputes never award the
    /// same placement twice.
    pub async fn badged_placement_ids(&self) -> Result<HashSet<String>, Error> {
        let rows = self.client.query("SELECT placement_id FROM writer_badges", &[]).await?;
        Ok(rows.iter().map(|row| row.get("placement_id")).collect())
    }

    pub async fn get_leaderboard(&self, filter: &LeaderboardFilter) -> Result<LeaderboardPage, Error> {
        let tier_text = filter.tier.map(|t| t.to_string());

        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();

        if let Some(tier) = &tier_text {
            params.push(tier);
            conditions.push(format!("tier = ${}", params.len()));
        }
        if let Some(allowlist) = &filter.writer_allowlist {
            params.push(allowlist);
            conditions.push(format!("writer_id = ANY(${})", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM writer_scores{}", where_clause);
        let total: i64 = self.client.query_one(count_query.as_str(), &params).await?.get(0);

        let order_clause = if filter.trending {
            "ORDER BY score_change_30d DESC, rank ASC"
        } else {
            "ORDER BY rank ASC"
        };

        params.push(&filter.limit);
        let limit_position = params.len();
        params.push(&filter.offset);
        let offset_position = params.len();

        let query = format!(
            "SELECT writer_id, total_score, submission_count, placement_count, rank, tier, \
             score_change_30d, updated_at FROM writer_scores{} {} LIMIT ${} OFFSET ${}",
            where_clause, order_clause, limit_position, offset_position
        );

        let rows = self.client.query(query.as_str(), &params).await?;
        let entries = rows.iter().map(Self::writer_score_from_row).collect_vec();

        Ok(LeaderboardPage {
            entries,
            total,
            limit: filter.limit,
            offset: filter.offset
        })
    }

    pub async fn get_writer_score(&self, writer_id: &str) -> Result<Option<WriterScore>, Error> {
        let row = self
            .client
            .query_opt(
                "SELECT writer_id, total_score, submission_count, placement_count, rank, tier, \
                 score_change_30d, updated_at FROM writer_scores WHERE writer_id = $1",
                &[&writer_id]
            )
            .await?;

        Ok(row.as_ref().map(Self::writer_score_from_row))
    }

    pub async fn get_writer_badges(&self, writer_id: &str) -> Result<Vec<WriterBadge>, Error> {
        let rows = self
            .client
            .query(
                "SELECT id, writer_id, label, placement_id, competition_id, awarded_at \
                 FROM writer_badges WHERE writer_id = $1 ORDER BY awarded_at, id",
                &[&writer_id]
            )
            .await?;

        Ok(rows.iter().map(Self::badge_from_row).collect_vec())
    }

    // ---------------------------------------------------------------------
    // Snapshots
    // ---------------------------------------------------------------------

    /// Upserts one snapshot per currently ranked writer for the given date.
    /// Re-running on the same date refreshes the stored scores.
    pub async fn record_snapshots(&self, snapshot_date: NaiveDate) -> Result<u64, Error> {
        let inserted = self
            .client
            .execute(
                "INSERT INTO score_snapshots (writer_id, snapshot_date, total_score) \
                 SELECT writer_id, $1, total_score FROM writer_scores \
                 ON CONFLICT ON CONSTRAINT uq_score_snapshots_writer_date \
                 DO UPDATE SET total_score = EXCLUDED.total_score",
                &[&snapshot_date]
            )
            .await?;

        info!("Recorded {} score snapshots for {}", inserted, snapshot_date);
        Ok(inserted)
    }

    /// Per-writer total from each writer's most recent snapshot at or before
    /// the cutoff date.
    pub async fn baseline_scores(&self, cutoff: NaiveDate) -> Result<HashMap<String, f64>, Error> {
        let rows = self
            .client
            .query(
                "SELECT DISTINCT ON (writer_id) writer_id, total_score FROM score_snapshots \
                 WHERE snapshot_date <= $1 ORDER BY writer_id, snapshot_date DESC",
                &[&cutoff]
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| (row.get::<_, String>("writer_id"), row.get::<_, f64>("total_score")))
            .collect())
    }

    pub async fn get_snapshots(&self, writer_id: &str) -> Result<Vec<ScoreSnapshot>, Error> {
        let rows = self
            .client
            .query(
                "SELECT id, writer_id, snapshot_date, total_score FROM score_snapshots \
                 WHERE writer_id = $1 ORDER BY snapshot_date",
                &[&writer_id]
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| ScoreSnapshot {
                id: row.get("id"),
                writer_id: row.get("writer_id"),
                snapshot_date: row.get("snapshot_date"),
                total_score: row.get("total_score")
            })
            .collect_vec())
    }

    // ---------------------------------------------------------------------
    // Competition prestige
    // ---------------------------------------------------------------------

    pub async fn upsert_prestige(&self, prestige: &CompetitionPrestige) -> Result<(), Error> {
        self.client
            .execute(
                "INSERT INTO competition_prestige (competition_id, multiplier, tier, updated_by, updated_at) \
                 VALUES ($1, $2, $3, $4, $5) \
                 ON CONFLICT (competition_id) DO UPDATE SET multiplier = EXCLUDED.multiplier, \
                 tier = EXCLUDED.tier, updated_by = EXCLUDED.updated_by, updated_at = EXCLUDED.updated_at",
                &[
                    &prestige.competition_id,
                    &prestige.multiplier,
                    &prestige.tier.to_string(),
                    &prestige.updated_by,
                    &prestige.updated_at
                ]
            )
            .await?;

        Ok(())
    }

    pub async fn get_prestige(&self, competition_id: &str) -> Result<Option<CompetitionPrestige>, Error> {
        let row = self
            .client
            .query_opt(
                "SELECT competition_id, multiplier, tier, updated_by, updated_at \
                 FROM competition_prestige WHERE competition_id = $1",
                &[&competition_id]
            )
            .await?;

        Ok(row.as_ref().map(Self::prestige_from_row))
    }

    pub async fn list_prestige(&self) -> Result<Vec<CompetitionPrestige>, Error> {
        let rows = self
            .client
            .query(
                "SELECT competition_id, multiplier, tier, updated_by, updated_at \
                 FROM competition_prestige ORDER BY competition_id",
                &[]
            )
            .await?;

        Ok(rows.iter().map(Self::prestige_from_row).collect_vec())
    }

    pub async fn prestige_multipliers(&self) -> Result<HashMap<String, f64>, Error> {
        let rows = self
            .client
            .query("SELECT competition_id, multiplier FROM competition_prestige", &[])
            .await?;

        Ok(rows
            .iter()
            .map(|row| (row.get::<_, String>("competition_id"), row.get::<_, f64>("multiplier")))
            .collect())
    }

    // ---------------------------------------------------------------------
    // Anti-gaming flags
    // ---------------------------------------------------------------------

    pub async fn insert_flag(
        &self,
        writer_id: &str,
        reason: FlagReason,
        details: &str,
        created_at: DateTime<Utc>
    ) -> Result<AntiGamingFlag, Error> {
        let row = self
            .client
            .query_one(
                "INSERT INTO anti_gaming_flags (writer_id, reason, details, status, created_at) \
                 VALUES ($1, $2, $3, $4, $5) RETURNING id",
                &[
                    &writer_id,
                    &reason.to_string(),
                    &details,
                    &FlagStatus::Open.to_string(),
                    &created_at
                ]
            )
            .await?;

        Ok(AntiGamingFlag {
            id: row.get("id"),
            writer_id: writer_id.to_string(),
            reason,
            details: details.to_string(),
            status: FlagStatus::Open,
            created_at,
            resolved_by: None,
            resolved_at: None
        })
    }

    /// Whether an open flag with the same writer, reason and details already
    /// exists. Resolved flags do not suppress new ones.
    pub async fn open_flag_exists(
        &self,
        writer_id: &str,
        reason: FlagReason,
        details: &str
    ) -> Result<bool, Error> {
        let row = self
            .client
            .query_one(
                "SELECT EXISTS(SELECT 1 FROM anti_gaming_flags \
                 WHERE writer_id = $1 AND reason = $2 AND details = $3 AND status = $4)",
                &[
                    &writer_id,
                    &reason.to_string(),
                    &details,
                    &FlagStatus::Open.to_string()
                ]
            )
            .await?;

        Ok(row.get(0))
    }

    pub async fn get_flag(&self, id: i32) -> Result<Option<AntiGamingFlag>, Error> {
        let row = self
            .client
            .query_opt(
                "SELECT id, writer_id, reason, details, status, created_at, resolved_by, resolved_at \
                 FROM anti_gaming_flags WHERE id = $1",
                &[&id]
            )
            .await?;

        Ok(row.as_ref().map(Self::flag_from_row))
    }

    pub async fn list_flags(&self, status: Option<FlagStatus>) -> Result<Vec<AntiGamingFlag>, Error> {
        let rows = match status {
            Some(status) => {
                self.client
                    .query(
                        "SELECT id, writer_id, reason, details, status, created_at, resolved_by, resolved_at \
                         FROM anti_gaming_flags WHERE status = $1 ORDER BY created_at DESC, id DESC",
                        &[&status.to_string()]
                    )
                    .await?
            }
            None => {
                self.client
                    .query(
                        "SELECT id, writer_id, reason, details, status, created_at, resolved_by, resolved_at \
                         FROM anti_gaming_flags ORDER BY created_at DESC, id DESC",
                        &[]
                    )
                    .await?
            }
        };

        Ok(rows.iter().map(Self::flag_from_row).collect_vec())
    }

    /// Resolves an open flag. Returns None when the flag is missing or was
    /// already resolved; the caller distinguishes the two.
    pub async fn resolve_flag(
        &self,
        id: i32,
        resolution: FlagStatus,
        resolved_by: &str,
        resolved_at: DateTime<Utc>
    ) -> Result<Option<AntiGamingFlag>, Error> {
        let row = self
            .client
            .query_opt(
                "UPDATE anti_gaming_flags SET status = $2, resolved_by = $3, resolved_at = $4 \
                 WHERE id = $1 AND status = $5 \
                 RETURNING id, writer_id, reason, details, status, created_at, resolved_by, resolved_at",
                &[
                    &id,
                    &resolution.to_string(),
                    &resolved_by,
                    &resolved_at,
                    &FlagStatus::Open.to_string()
                ]
            )
            .await?;

        Ok(row.as_ref().map(Self::flag_from_row))
    }

    // ---------------------------------------------------------------------
    // Ranking appeals
    // ---------------------------------------------------------------------

    pub async fn insert_appeal(
        &self,
        writer_id: &str,
        reason: &str,
        created_at: DateTime<Utc>
    ) -> Result<RankingAppeal, Error> {
        let row = self
            .client
            .query_one(
                "INSERT INTO ranking_appeals (writer_id, reason, status, created_at) \
                 VALUES ($1, $2, $3, $4) RETURNING id",
                &[&writer_id, &reason, &AppealStatus::Open.to_string(), &created_at]
            )
            .await?;

        Ok(RankingAppeal {
            id: row.get("id"),
            writer_id: writer_id.to_string(),
            reason: reason.to_string(),
            status: AppealStatus::Open,
            resolution_note: None,
            created_at,
            resolved_by: None,
            resolved_at: None
        })
    }

    pub async fn get_appeal(&self, id: i32) -> Result<Option<RankingAppeal>, Error> {
        let row = self
            .client
            .query_opt(
                "SELECT id, writer_id, reason, status, resolution_note, created_at, resolved_by, resolved_at \
                 FROM ranking_appeals WHERE id = $1",
                &[&id]
            )
            .await?;

        Ok(row.as_ref().map(Self::appeal_from_row))
    }

    pub async fn list_appeals(&self, status: Option<AppealStatus>) -> Result<Vec<RankingAppeal>, Error> {
        let rows = match status {
            Some(status) => {
                self.client
                    .query(
                        "SELECT id, writer_id, reason, status, resolution_note, created_at, resolved_by, \
                         resolved_at FROM ranking_appeals WHERE status = $1 ORDER BY created_at DESC, id DESC",
                        &[&status.to_string()]
                    )
                    .await?
            }
            None => {
                self.client
                    .query(
                        "SELECT id, writer_id, reason, status, resolution_note, created_at, resolved_by, \
                         resolved_at FROM ranking_appeals ORDER BY created_at DESC, id DESC",
                        &[]
                    )
                    .await?
            }
        };

        Ok(rows.iter().map(Self::appeal_from_row).collect_vec())
    }

    /// Resolves a non-terminal appeal. The under_review state has no inbound
    /// transition here but rows carrying it (set by external tooling) still
    /// resolve. Returns None when the appeal is missing or already terminal;
    /// the caller distinguishes the two.
    pub async fn resolve_appeal(
        &self,
        id: i32,
        resolution: AppealStatus,
        resolution_note: Option<&str>,
        resolved_by: &str,
        resolved_at: DateTime<Utc>
    ) -> Result<Option<RankingAppeal>, Error> {
        let row = self
            .client
            .query_opt(
                "UPDATE ranking_appeals SET status = $2, resolution_note = $3, resolved_by = $4, \
                 resolved_at = $5 WHERE id = $1 AND status = ANY($6) \
                 RETURNING id, writer_id, reason, status, resolution_note, created_at, resolved_by, resolved_at",
                &[
                    &id,
                    &resolution.to_string(),
                    &resolution_note,
                    &resolved_by,
                    &resolved_at,
                    &vec![AppealStatus::Open.to_string(), AppealStatus::UnderReview.to_string()]
                ]
            )
            .await?;

        Ok(row.as_ref().map(Self::appeal_from_row))
    }

    // ---------------------------------------------------------------------
    // Row mappers
    // ---------------------------------------------------------------------

    fn writer_score_from_row(row: &Row) -> WriterScore {
        WriterScore {
            writer_id: row.get("writer_id"),
            total_score: row.get("total_score"),
            submission_count: row.get("submission_count"),
            placement_count: row.get("placement_count"),
            rank: row.get("rank"),
            tier: row
                .get::<_, Option<String>>("tier")
                .and_then(|tier| ScoreTier::from_str(&tier).ok()),
            score_change_30d: row.get("score_change_30d"),
            updated_at: row.get("updated_at")
        }
    }

    fn badge_from_row(row: &Row) -> WriterBadge {
        WriterBadge {
            id: row.get("id"),
            writer_id: row.get("writer_id"),
            label: row.get("label"),
            placement_id: row.get("placement_id"),
            competition_id: row.get("competition_id"),
            awarded_at: row.get("awarded_at")
        }
    }

    fn prestige_from_row(row: &Row) -> CompetitionPrestige {
        CompetitionPrestige {
            competition_id: row.get("competition_id"),
            multiplier: row.get("multiplier"),
            tier: PrestigeTier::from_str(&row.get::<_, String>("tier")).unwrap_or_default(),
            updated_by: row.get("updated_by"),
            updated_at: row.get("updated_at")
        }
    }

    fn flag_from_row(row: &Row) -> AntiGamingFlag {
        AntiGamingFlag {
            id: row.get("id"),
            writer_id: row.get("writer_id"),
            reason: FlagReason::from_str(&row.get::<_, String>("reason")).unwrap_or(FlagReason::ManualAdmin),
            details: row.get("details"),
            status: FlagStatus::from_str(&row.get::<_, String>("status")).unwrap_or_default(),
            created_at: row.get("created_at"),
            resolved_by: row.get("resolved_by"),
            resolved_at: row.get("resolved_at")
        }
    }

    fn appeal_from_row(row: &Row) -> RankingAppeal {
        RankingAppeal {
            id: row.get("id"),
            writer_id: row.get("writer_id"),
            reason: row.get("reason"),
            status: AppealStatus::from_str(&row.get::<_, String>("status")).unwrap_or_default(),
            resolution_note: row.get("resolution_note"),
            created_at: row.get("created_at"),
            resolved_by: row.get("resolved_by"),
            resolved_at: row.get("resolved_at")
        }
    }
}
