use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use lazy_static::lazy_static;
use scriptrank_engine::{
    api::{
        api_structs::{Competition, Placement, Project, Submission},
        CompetitionDirectory, ProjectDirectory, SubmissionLedger, UpstreamError
    },
    database::{
        db::DbClient,
        db_structs::{PlacementScore, WriterBadge, WriterScore}
    },
    engine::RankingEngine,
    messaging::{AppealResolvedMessage, NotificationPublisher, PublisherError},
    model::structures::score_tier::ScoreTier
};
use std::sync::{Arc, Mutex};
use testcontainers::{clients::Cli, Container};
use testcontainers_modules::postgres::Postgres;

pub struct TestDatabase {
    pub connection_string: String,
    _container: Container<'static, Postgres>
}

impl TestDatabase {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Create a static CLI instance
        lazy_static! {
            static ref DOCKER: Arc<Cli> = Arc::new(Cli::default());
        }

        // Start PostgreSQL container
        let container = DOCKER.run(Postgres::default());
        let port = container.get_host_port_ipv4(5432);

        let connection_string = format!(
            "host=localhost port={} user=postgres password=postgres dbname=postgres",
            port
        );

        // Connect and create the ranking tables
        let client = DbClient::connect(&connection_string).await?;
        client.ensure_schema().await?;

        Ok(TestDatabase {
            connection_string,
            _container: container
        })
    }

    pub async fn client(&self) -> Result<DbClient, Box<dyn std::error::Error>> {
        Ok(DbClient::connect(&self.connection_string).await?)
    }
}

// ---------------------------------------------------------------------
// Row builders for repository-level tests
// ---------------------------------------------------------------------

pub fn seeded_writer_score(
    writer_id: &str,
    total: f64,
    rank: i32,
    tier: Option<ScoreTier>,
    change: f64
) -> WriterScore {
    WriterScore {
        writer_id: writer_id.to_string(),
        total_score: total,
        submission_count: 2,
        placement_count: 1,
        rank,
        tier,
        score_change_30d: change,
        updated_at: Utc::now()
    }
}

pub fn seeded_placement_score(placement_id: &str, writer_id: &str, competition_id: &str, raw: f64) -> PlacementScore {
    PlacementScore {
        id: 0,
        placement_id: placement_id.to_string(),
        writer_id: writer_id.to_string(),
        competition_id: competition_id.to_string(),
        project_id: format!("{placement_id}-project"),
        status_weight: 100.0,
        prestige_multiplier: 1.0,
        verification_multiplier: 1.0,
        time_decay_factor: 1.0,
        confidence_factor: 0.25,
        raw_score: raw,
        placement_date: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }
}

pub fn seeded_badge(writer_id: &str, placement_id: &str, competition_id: &str, label: &str) -> WriterBadge {
    WriterBadge {
        id: 0,
        writer_id: writer_id.to_string(),
        label: label.to_string(),
        placement_id: placement_id.to_string(),
        competition_id: competition_id.to_string(),
        awarded_at: Utc::now()
    }
}

// ---------------------------------------------------------------------
// Collaborator doubles for engine-level tests
// ---------------------------------------------------------------------

fn unavailable(service: &'static str) -> UpstreamError {
    UpstreamError::Status {
        service,
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE
    }
}

#[derive(Default)]
pub struct FakeSubmissionLedger {
    pub submissions: Vec<Submission>,
    pub placements: Vec<Placement>,
    pub fail: bool
}

#[async_trait]
impl SubmissionLedger for FakeSubmissionLedger {
    async fn list_submissions(&self) -> Result<Vec<Submission>, UpstreamError> {
        if self.fail {
            return Err(unavailable("submission ledger"));
        }
        Ok(self.submissions.clone())
    }

    async fn list_placements(&self) -> Result<Vec<Placement>, UpstreamError> {
        if self.fail {
            return Err(unavailable("submission ledger"));
        }
        Ok(self.placements.clone())
    }
}

#[derive(Default)]
pub struct FakeCompetitionDirectory {
    pub competitions: Vec<Competition>,
    pub fail: bool
}

#[async_trait]
impl CompetitionDirectory for FakeCompetitionDirectory {
    async fn list_competitions(&self) -> Result<Vec<Competition>, UpstreamError> {
        if self.fail {
            return Err(unavailable("competition directory"));
        }
        Ok(self.competitions.clone())
    }
}

#[derive(Default)]
pub struct FakeProjectDirectory {
    pub projects: Vec<Project>,
    pub fail: bool
}

#[async_trait]
impl ProjectDirectory for FakeProjectDirectory {
    async fn find_projects(
        &self,
        format: Option<&str>,
        genre: Option<&str>
    ) -> Result<Vec<Project>, UpstreamError> {
        if self.fail {
            return Err(unavailable("project directory"));
        }

        Ok(self
            .projects
            .iter()
            .filter(|p| format.map_or(true, |f| p.format.as_deref() == Some(f)))
            .filter(|p| genre.map_or(true, |g| p.genre.as_deref() == Some(g)))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub published: Mutex<Vec<AppealResolvedMessage>>,
    pub fail: bool
}

#[async_trait]
impl NotificationPublisher for RecordingNotifier {
    async fn publish_appeal_resolved(&self, message: &AppealResolvedMessage) -> Result<(), PublisherError> {
        if self.fail {
            return Err(PublisherError::NotInitialized);
        }
        self.published.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub fn test_engine(
    db: DbClient,
    ledger: FakeSubmissionLedger,
    competitions: FakeCompetitionDirectory,
    projects: FakeProjectDirectory,
    notifier: Option<Arc<RecordingNotifier>>
) -> RankingEngine {
    RankingEngine::new(
        db,
        Arc::new(ledger),
        Arc::new(competitions),
        Arc::new(projects),
        notifier.map(|n| n as Arc<dyn NotificationPublisher>)
    )
}
