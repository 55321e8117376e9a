use clap::Parser;
use scriptrank_engine::{
    api::{HttpCompetitionDirectory, HttpProjectDirectory, HttpSubmissionLedger},
    args::Args,
    database::db::DbClient,
    engine::{RankingEngine, RecomputeTrigger},
    messaging::{NotificationPublisher, RabbitMqConfig, RabbitMqPublisher}
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let args = Args::parse();

    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();

    let db = DbClient::connect(args.connection_string.as_str())
        .await
        .expect("Expected valid database connection");

    if args.init_schema {
        db.ensure_schema().await.expect("Expected schema creation to succeed");
    }

    let engine = RankingEngine::new(
        db,
        Arc::new(HttpSubmissionLedger::new(&args.submission_ledger_url)),
        Arc::new(HttpCompetitionDirectory::new(&args.competition_directory_url)),
        Arc::new(HttpProjectDirectory::new(&args.project_directory_url)),
        notifier().await
    );

    if args.snapshot_only {
        let count = engine
            .record_daily_snapshots(Some("system"))
            .await
            .expect("Expected snapshot maintenance to succeed");
        info!("Snapshot maintenance complete ({} rows)", count);
        return;
    }

    let summary = engine
        .recompute(Some("system"), RecomputeTrigger::Full)
        .await
        .expect("Expected recompute to succeed");

    info!(
        "Run complete: {} writers ranked, {} placements scored ({} skipped), {} new badges, {} new flags",
        summary.writers_scored,
        summary.placements_processed,
        summary.placements_skipped,
        summary.badges_awarded,
        summary.flags_created
    );
}

/// Connects the RabbitMQ publisher when credentials are configured, otherwise
/// runs without notifications.
async fn notifier() -> Option<Arc<dyn NotificationPublisher>> {
    let config = match RabbitMqConfig::from_env() {
        Ok(config) if config.enabled => config,
        Ok(_) => {
            info!("RabbitMQ publishing disabled");
            return None;
        }
        Err(_) => {
            info!("RabbitMQ credentials not configured, running without notifications");
            return None;
        }
    };

    match RabbitMqPublisher::connect_from_config(&config).await {
        Ok(publisher) => Some(Arc::new(publisher)),
        Err(e) => {
            warn!("RabbitMQ connection failed, notifications disabled: {}", e);
            None
        }
    }
}
