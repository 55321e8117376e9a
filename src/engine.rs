use crate::{
    api::{CompetitionDirectory, ProjectDirectory, SubmissionLedger},
    database::{
        db::{DbClient, LeaderboardFilter},
        db_structs::{
            AntiGamingFlag, CompetitionPrestige, LeaderboardPage, RankingAppeal, WriterBadge, WriterProfile
        }
    },
    error::{EngineError, Result},
    messaging::{AppealResolvedMessage, NotificationPublisher},
    model::{
        constants::{DEFAULT_LEADERBOARD_LIMIT, MAX_LEADERBOARD_LIMIT, MAX_PRESTIGE_MULTIPLIER, SNAPSHOT_BASELINE_DAYS},
        rank_model::{compute_rankings, RankingInputs},
        scoring::ScoringMethodology,
        structures::{
            appeal::AppealStatus,
            flag::{FlagReason, FlagStatus},
            prestige_tier::PrestigeTier,
            score_tier::ScoreTier
        }
    }
};
use chrono::{Duration, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// How a recompute was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecomputeTrigger {
    Full,
    /// Accepted and logged, never partially scored. The next full run picks
    /// the change up.
    IncrementalHint { placement_id: Option<String> }
}

/// What a recompute run did, returned to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecomputeSummary {
    pub writers_scored: usize,
    pub placements_processed: usize,
    pub placements_skipped: usize,
    pub badges_awarded: u64,
    pub flags_created: u64,
    pub deferred: bool
}

/// Leaderboard request parameters. Everything is optional; defaults are the
/// first page of the global ranking.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeaderboardQuery {
    pub tier: Option<ScoreTier>,
    pub trending: bool,
    pub format: Option<String>,
    pub genre: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>
}

/// The ranking engine: orchestrates fetch, the pure scoring pass, persistence
/// and the query/moderation surface on top of the score repository.
pub struct RankingEngine {
    db: DbClient,
    submissions: Arc<dyn SubmissionLedger>,
    competitions: Arc<dyn CompetitionDirectory>,
    projects: Arc<dyn ProjectDirectory>,
    notifier: Option<Arc<dyn NotificationPublisher>>
}

impl RankingEngine {
    pub fn new(
        db: DbClient,
        submissions: Arc<dyn SubmissionLedger>,
        competitions: Arc<dyn CompetitionDirectory>,
        projects: Arc<dyn ProjectDirectory>,
        notifier: Option<Arc<dyn NotificationPublisher>>
    ) -> Self {
        Self {
            db,
            submissions,
            competitions,
            projects,
            notifier
        }
    }

    fn required_actor(actor: Option<&str>) -> Result<&str> {
        match actor.map(str::trim) {
            Some(actor) if !actor.is_empty() => Ok(actor),
            _ => Err(EngineError::Forbidden)
        }
    }

    // -----------------------------------------------------------------
    // Recompute
    // -----------------------------------------------------------------

    /// Runs a recompute. `Full` rebuilds the whole ranking world under the
    /// advisory lock; `IncrementalHint` is logged and deferred.
    pub async fn recompute(&self, actor: Option<&str>, trigger: RecomputeTrigger) -> Result<RecomputeSummary> {
        let actor = Self::required_actor(actor)?;

        if let RecomputeTrigger::IncrementalHint { placement_id } = &trigger {
            info!(
                "Incremental recompute hint from {} (placement: {}), deferring to the next full run",
                actor,
                placement_id.as_deref().unwrap_or("unspecified")
            );
            return Ok(RecomputeSummary {
                deferred: true,
                ..Default::default()
            });
        }

        if !self.db.try_acquire_recompute_lock().await? {
            return Err(EngineError::RecomputeInProgress);
        }

        let result = self.run_full_recompute(actor).await;

        if let Err(e) = self.db.release_recompute_lock().await {
            warn!("Failed to release recompute lock: {}", e);
        }

        result
    }

    async fn run_full_recompute(&self, actor: &str) -> Result<RecomputeSummary> {
        info!("Full recompute started by {}", actor);

        let (submissions, placements, competitions) = futures::join!(
            self.submissions.list_submissions(),
            self.submissions.list_placements(),
            self.competitions.list_competitions()
        );
        let submissions = submissions?;
        let placements = placements?;
        let competitions = competitions.unwrap_or_else(|e| {
            warn!("{} unavailable, badge labels fall back to competition ids: {}", e.service(), e);
            Vec::new()
        });

        let prestige_multipliers = self.db.prestige_multipliers().await?;
        let badged_placement_ids = self.db.badged_placement_ids().await?;
        let now = Utc::now();
        let baseline_scores = self
            .db
            .baseline_scores(now.date_naive() - Duration::days(SNAPSHOT_BASELINE_DAYS))
            .await?;

        let computation = compute_rankings(&RankingInputs {
            submissions: &submissions,
            placements: &placements,
            competitions: &competitions,
            prestige_multipliers: &prestige_multipliers,
            badged_placement_ids: &badged_placement_ids,
            baseline_scores: &baseline_scores,
            now
        });

        let badges_awarded = self
            .db
            .replace_rankings(
                &computation.placement_scores,
                &computation.writer_scores,
                &computation.new_badges
            )
            .await?;

        let mut flags_created: u64 = 0;
        for group in &computation.duplicate_groups {
            let details = group.details();
            if self
                .db
                .open_flag_exists(&group.writer_id, FlagReason::DuplicateSubmission, &details)
                .await?
            {
                continue;
            }

            self.db
                .insert_flag(&group.writer_id, FlagReason::DuplicateSubmission, &details, now)
                .await?;
            flags_created += 1;
        }

        let summary = RecomputeSummary {
            writers_scored: computation.writer_scores.len(),
            placements_processed: computation.placement_scores.len(),
            placements_skipped: computation.placements_skipped,
            badges_awarded,
            flags_created,
            deferred: false
        };

        info!(
            "Recompute finished: {} writers, {} placements scored ({} skipped), {} new badges, {} new flags",
            summary.writers_scored,
            summary.placements_processed,
            summary.placements_skipped,
            summary.badges_awarded,
            summary.flags_created
        );

        Ok(summary)
    }

    // -----------------------------------------------------------------
    // Query surface
    // -----------------------------------------------------------------

    pub async fn get_leaderboard(&self, query: &LeaderboardQuery) -> Result<LeaderboardPage> {
        let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
        if !(1..=MAX_LEADERBOARD_LIMIT).contains(&limit) {
            return Err(EngineError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_LEADERBOARD_LIMIT
            )));
        }

        let offset = query.offset.unwrap_or(0);
        if offset < 0 {
            return Err(EngineError::Validation("offset must not be negative".to_string()));
        }

        let writer_allowlist = self
            .project_allowlist(query.format.as_deref(), query.genre.as_deref())
            .await;

        Ok(self
            .db
            .get_leaderboard(&LeaderboardFilter {
                tier: query.tier,
                trending: query.trending,
                writer_allowlist,
                limit,
                offset
            })
            .await?)
    }

    /// Resolves a format/genre filter to the writers owning matching projects.
    /// Directory failure degrades to an empty allow-set: the query succeeds
    /// with zero rows instead of erroring.
    async fn project_allowlist(&self, format: Option<&str>, genre: Option<&str>) -> Option<Vec<String>> {
        if format.is_none() && genre.is_none() {
            return None;
        }

        match self.projects.find_projects(format, genre).await {
            Ok(projects) => Some(projects.into_iter().map(|p| p.owner_writer_id).unique().collect()),
            Err(e) => {
                warn!("{} unavailable, returning an empty leaderboard slice: {}", e.service(), e);
                Some(Vec::new())
            }
        }
    }

    pub async fn get_writer_score(&self, writer_id: &str) -> Result<WriterProfile> {
        let score = self
            .db
            .get_writer_score(writer_id)
            .await?
            .ok_or_else(|| EngineError::NotFound {
                entity: "writer score",
                id: writer_id.to_string()
            })?;
        let badges = self.db.get_writer_badges(writer_id).await?;

        Ok(WriterProfile { score, badges })
    }

    /// All badges a writer ever earned, whether or not they are currently
    /// ranked.
    pub async fn get_writer_badges(&self, writer_id: &str) -> Result<Vec<WriterBadge>> {
        Ok(self.db.get_writer_badges(writer_id).await?)
    }

    pub fn methodology(&self) -> ScoringMethodology {
        ScoringMethodology::current()
    }

    // -----------------------------------------------------------------
    // Competition prestige
    // -----------------------------------------------------------------

    pub async fn put_prestige(
        &self,
        actor: Option<&str>,
        competition_id: &str,
        multiplier: f64,
        tier: PrestigeTier
    ) -> Result<CompetitionPrestige> {
        let actor = Self::required_actor(actor)?;

        if competition_id.trim().is_empty() {
            return Err(EngineError::Validation("competition id must not be empty".to_string()));
        }
        if !multiplier.is_finite() || multiplier <= 0.0 || multiplier > MAX_PRESTIGE_MULTIPLIER {
            return Err(EngineError::Validation(format!(
                "prestige multiplier must be within (0, {}]",
                MAX_PRESTIGE_MULTIPLIER
            )));
        }

        let prestige = CompetitionPrestige {
            competition_id: competition_id.trim().to_string(),
            multiplier,
            tier,
            updated_by: actor.to_string(),
            updated_at: Utc::now()
        };
        self.db.upsert_prestige(&prestige).await?;
        info!(
            "Prestige for {} set to {} ({}) by {}",
            prestige.competition_id, multiplier, tier, actor
        );

        Ok(prestige)
    }

    pub async fn get_prestige(&self, competition_id: &str) -> Result<CompetitionPrestige> {
        self.db
            .get_prestige(competition_id)
            .await?
            .ok_or_else(|| EngineError::NotFound {
                entity: "competition prestige",
                id: competition_id.to_string()
            })
    }

    pub async fn list_prestige(&self) -> Result<Vec<CompetitionPrestige>> {
        Ok(self.db.list_prestige().await?)
    }

    // -----------------------------------------------------------------
    // Appeals
    // -----------------------------------------------------------------

    /// Opens an appeal. The actor is the appealing writer.
    pub async fn create_appeal(&self, actor: Option<&str>, reason: &str) -> Result<RankingAppeal> {
        let writer = Self::required_actor(actor)?;
        if reason.trim().is_empty() {
            return Err(EngineError::Validation("appeal reason must not be empty".to_string()));
        }

        let appeal = self.db.insert_appeal(writer, reason.trim(), Utc::now()).await?;
        info!("Appeal {} opened by writer {}", appeal.id, writer);
        Ok(appeal)
    }

    pub async fn get_appeal(&self, id: i32) -> Result<RankingAppeal> {
        self.db.get_appeal(id).await?.ok_or_else(|| EngineError::NotFound {
            entity: "appeal",
            id: id.to_string()
        })
    }

    pub async fn list_appeals(&self, status: Option<AppealStatus>) -> Result<Vec<RankingAppeal>> {
        Ok(self.db.list_appeals(status).await?)
    }

    /// Resolves an appeal to a terminal status and notifies the affected
    /// writer. The notification is best effort and never fails the resolution.
    pub async fn resolve_appeal(
        &self,
        actor: Option<&str>,
        id: i32,
        resolution: AppealStatus,
        resolution_note: Option<&str>
    ) -> Result<RankingAppeal> {
        let actor = Self::required_actor(actor)?;
        if !resolution.is_resolution() {
            return Err(EngineError::Validation(format!(
                "{} is not a terminal appeal resolution",
                resolution
            )));
        }

        let resolved = self
            .db
            .resolve_appeal(id, resolution, resolution_note, actor, Utc::now())
            .await?;

        let appeal = match resolved {
            Some(appeal) => appeal,
            None => {
                return match self.db.get_appeal(id).await? {
                    Some(existing) => Err(EngineError::Conflict(format!(
                        "appeal {} is already {}",
                        id, existing.status
                    ))),
                    None => Err(EngineError::NotFound {
                        entity: "appeal",
                        id: id.to_string()
                    })
                };
            }
        };

        info!("Appeal {} resolved as {} by {}", appeal.id, appeal.status, actor);
        self.notify_appeal_resolved(&appeal).await;

        Ok(appeal)
    }

    async fn notify_appeal_resolved(&self, appeal: &RankingAppeal) {
        let notifier = match &self.notifier {
            Some(notifier) => notifier,
            None => return
        };

        let message = AppealResolvedMessage {
            appeal_id: appeal.id.to_string(),
            writer_id: appeal.writer_id.clone(),
            status: appeal.status,
            resolution_note: appeal.resolution_note.clone(),
            resolved_by: appeal.resolved_by.clone().unwrap_or_default(),
            resolved_at: appeal.resolved_at.unwrap_or_else(Utc::now)
        };

        if let Err(e) = notifier.publish_appeal_resolved(&message).await {
            warn!("Failed to publish resolution of appeal {}: {}", appeal.id, e);
        }
    }

    // -----------------------------------------------------------------
    // Anti-gaming flags
    // -----------------------------------------------------------------

    /// Files a manual flag against a writer.
    pub async fn create_flag(&self, actor: Option<&str>, writer_id: &str, details: &str) -> Result<AntiGamingFlag> {
        let actor = Self::required_actor(actor)?;
        if writer_id.trim().is_empty() {
            return Err(EngineError::Validation("writer id must not be empty".to_string()));
        }
        if details.trim().is_empty() {
            return Err(EngineError::Validation("flag details must not be empty".to_string()));
        }

        let flag = self
            .db
            .insert_flag(writer_id.trim(), FlagReason::ManualAdmin, details.trim(), Utc::now())
            .await?;
        info!("Flag {} filed against writer {} by {}", flag.id, flag.writer_id, actor);
        Ok(flag)
    }

    pub async fn get_flag(&self, id: i32) -> Result<AntiGamingFlag> {
        self.db.get_flag(id).await?.ok_or_else(|| EngineError::NotFound {
            entity: "flag",
            id: id.to_string()
        })
    }

    pub async fn list_flags(&self, status: Option<FlagStatus>) -> Result<Vec<AntiGamingFlag>> {
        Ok(self.db.list_flags(status).await?)
    }

    pub async fn resolve_flag(&self, actor: Option<&str>, id: i32, resolution: FlagStatus) -> Result<AntiGamingFlag> {
        let actor = Self::required_actor(actor)?;
        if !resolution.is_resolution() {
            return Err(EngineError::Validation(format!(
                "{} is not a terminal flag resolution",
                resolution
            )));
        }

        match self.db.resolve_flag(id, resolution, actor, Utc::now()).await? {
            Some(flag) => {
                info!("Flag {} resolved as {} by {}", flag.id, flag.status, actor);
                Ok(flag)
            }
            None => match self.db.get_flag(id).await? {
                Some(existing) => Err(EngineError::Conflict(format!(
                    "flag {} is already {}",
                    id, existing.status
                ))),
                None => Err(EngineError::NotFound {
                    entity: "flag",
                    id: id.to_string()
                })
            }
        }
    }

    // -----------------------------------------------------------------
    // Maintenance
    // -----------------------------------------------------------------

    /// Records one score snapshot per currently ranked writer for today.
    /// No-op when nobody is ranked; re-running refreshes today's rows.
    pub async fn record_daily_snapshots(&self, actor: Option<&str>) -> Result<u64> {
        let actor = Self::required_actor(actor)?;

        let count = self.db.record_snapshots(Utc::now().date_naive()).await?;
        info!("{} score snapshots recorded by {}", count, actor);
        Ok(count)
    }
}
