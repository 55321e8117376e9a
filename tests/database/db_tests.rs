use chrono::{NaiveDate, Utc};
use scriptrank_engine::{
    database::db::LeaderboardFilter,
    model::structures::{
        appeal::AppealStatus,
        flag::{FlagReason, FlagStatus},
        prestige_tier::PrestigeTier,
        score_tier::ScoreTier
    }
};
use scriptrank_engine::database::db_structs::CompetitionPrestige;
use serial_test::serial;

use super::test_helpers::{seeded_badge, seeded_placement_score, seeded_writer_score, TestDatabase};
use crate::common::init_test_env;

#[tokio::test]
#[serial]
async fn test_ensure_schema_is_idempotent() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");

    let db = test_db.client().await.expect("Failed to connect");
    db.ensure_schema().await.expect("Second ensure_schema should succeed");
}

#[tokio::test]
#[serial]
async fn test_replace_rankings_persists_world() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db = test_db.client().await.expect("Failed to connect");

    let placement_scores = vec![
        seeded_placement_score("pl-1", "w1", "c1", 25.0),
        seeded_placement_score("pl-2", "w1", "c2", 12.0),
        seeded_placement_score("pl-3", "w2", "c1", 9.0),
    ];
    let writer_scores = vec![
        seeded_writer_score("w1", 37.0, 1, Some(ScoreTier::Top1), 5.0),
        seeded_writer_score("w2", 9.0, 2, Some(ScoreTier::Top2), 0.0),
    ];
    let badges = vec![seeded_badge("w1", "pl-1", "c1", "2024 Competition 1 Winner")];

    let awarded = db
        .replace_rankings(&placement_scores, &writer_scores, &badges)
        .await
        .expect("Failed to persist rankings");
    assert_eq!(awarded, 1);

    let page = db
        .get_leaderboard(&LeaderboardFilter::default())
        .await
        .expect("Failed to query leaderboard");

    assert_eq!(page.total, 2);
    assert_eq!(page.entries.len(), 2);
    assert_eq!(page.entries[0].writer_id, "w1");
    assert_eq!(page.entries[0].rank, 1);
    assert_eq!(page.entries[0].tier, Some(ScoreTier::Top1));
    assert_eq!(page.entries[1].writer_id, "w2");

    let score = db
        .get_writer_score("w1")
        .await
        .expect("Failed to query writer")
        .expect("Writer should exist");
    assert_eq!(score.total_score, 37.0);
    assert_eq!(score.placement_count, 1);
}

#[tokio::test]
#[serial]
async fn test_replace_rankings_rebuilds_placements() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db = test_db.client().await.expect("Failed to connect");

    let first = vec![
        seeded_placement_score("pl-1", "w1", "c1", 25.0),
        seeded_placement_score("pl-2", "w1", "c2", 12.0),
        seeded_placement_score("pl-3", "w1", "c3", 9.0),
    ];
    db.replace_rankings(&first, &[seeded_writer_score("w1", 46.0, 1, None, 0.0)], &[])
        .await
        .expect("Failed to persist first world");

    let second = vec![seeded_placement_score("pl-9", "w1", "c1", 3.0)];
    db.replace_rankings(&second, &[seeded_writer_score("w1", 3.0, 1, None, 0.0)], &[])
        .await
        .expect("Failed to persist second world");

    let count: i64 = db
        .client()
        .query_one("SELECT COUNT(*) FROM placement_scores", &[])
        .await
        .expect("Failed to count")
        .get(0);
    assert_eq!(count, 1);
}

#[tokio::test]
#[serial]
async fn test_absent_writers_keep_their_rows() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db = test_db.client().await.expect("Failed to connect");

    let first_scores = vec![
        seeded_writer_score("w1", 40.0, 1, None, 0.0),
        seeded_writer_score("w2", 20.0, 2, None, 0.0),
    ];
    db.replace_rankings(&[seeded_placement_score("pl-1", "w1", "c1", 40.0)], &first_scores, &[])
        .await
        .expect("Failed to persist first world");

    // Second run only scores w1
    db.replace_rankings(
        &[seeded_placement_score("pl-1", "w1", "c1", 55.0)],
        &[seeded_writer_score("w1", 55.0, 1, None, 15.0)],
        &[]
    )
    .await
    .expect("Failed to persist second world");

    let w1 = db
        .get_writer_score("w1")
        .await
        .expect("Failed to query")
        .expect("w1 should exist");
    assert_eq!(w1.total_score, 55.0);

    let w2 = db
        .get_writer_score("w2")
        .await
        .expect("Failed to query")
        .expect("w2 should still exist");
    assert_eq!(w2.total_score, 20.0);
}

#[tokio::test]
#[serial]
async fn test_badge_awards_ignore_existing_placements() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db = test_db.client().await.expect("Failed to connect");

    let placements = vec![seeded_placement_score("pl-1", "w1", "c1", 25.0)];
    let scores = vec![seeded_writer_score("w1", 25.0, 1, None, 0.0)];
    let badge = vec![seeded_badge("w1", "pl-1", "c1", "2024 Competition 1 Winner")];

    let first = db
        .replace_rankings(&placements, &scores, &badge)
        .await
        .expect("Failed first run");
    assert_eq!(first, 1);

    let second = db
        .replace_rankings(&placements, &scores, &badge)
        .await
        .expect("Failed second run");
    assert_eq!(second, 0);

    let badges = db.get_writer_badges("w1").await.expect("Failed to query badges");
    assert_eq!(badges.len(), 1);
    assert_eq!(badges[0].label, "2024 Competition 1 Winner");

    let badged = db.badged_placement_ids().await.expect("Failed to query badged ids");
    assert!(badged.contains("pl-1"));
}

#[tokio::test]
#[serial]
async fn test_leaderboard_tier_filter() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db = test_db.client().await.expect("Failed to connect");

    let writer_scores = vec![
        seeded_writer_score("w1", 100.0, 1, Some(ScoreTier::Top1), 0.0),
        seeded_writer_score("w2", 50.0, 2, Some(ScoreTier::Top10), 0.0),
        seeded_writer_score("w3", 40.0, 3, Some(ScoreTier::Top10), 0.0),
        seeded_writer_score("w4", 1.0, 4, None, 0.0),
    ];
    db.replace_rankings(&[], &writer_scores, &[])
        .await
        .expect("Failed to persist");

    let page = db
        .get_leaderboard(&LeaderboardFilter {
            tier: Some(ScoreTier::Top10),
            ..Default::default()
        })
        .await
        .expect("Failed to query");

    assert_eq!(page.total, 2);
    assert_eq!(page.entries[0].writer_id, "w2");
    assert_eq!(page.entries[1].writer_id, "w3");
}

#[tokio::test]
#[serial]
async fn test_leaderboard_trending_sorts_by_delta() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db = test_db.client().await.expect("Failed to connect");

    let writer_scores = vec![
        seeded_writer_score("w1", 100.0, 1, None, 5.0),
        seeded_writer_score("w2", 90.0, 2, None, -2.0),
        seeded_writer_score("w3", 80.0, 3, None, 10.0),
    ];
    db.replace_rankings(&[], &writer_scores, &[])
        .await
        .expect("Failed to persist");

    let page = db
        .get_leaderboard(&LeaderboardFilter {
            trending: true,
            ..Default::default()
        })
        .await
        .expect("Failed to query");

    let order: Vec<&str> = page.entries.iter().map(|e| e.writer_id.as_str()).collect();
    assert_eq!(order, vec!["w3", "w1", "w2"]);
}

#[tokio::test]
#[serial]
async fn test_leaderboard_pagination() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db = test_db.client().await.expect("Failed to connect");

    let writer_scores: Vec<_> = (1..=5)
        .map(|i| seeded_writer_score(&format!("w{i}"), 100.0 - i as f64, i, None, 0.0))
        .collect();
    db.replace_rankings(&[], &writer_scores, &[])
        .await
        .expect("Failed to persist");

    let page = db
        .get_leaderboard(&LeaderboardFilter {
            limit: 2,
            offset: 2,
            ..Default::default()
        })
        .await
        .expect("Failed to query");

    assert_eq!(page.total, 5);
    assert_eq!(page.limit, 2);
    assert_eq!(page.offset, 2);
    assert_eq!(page.entries.len(), 2);
    assert_eq!(page.entries[0].rank, 3);
    assert_eq!(page.entries[1].rank, 4);
}

#[tokio::test]
#[serial]
async fn test_leaderboard_allowlist() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db = test_db.client().await.expect("Failed to connect");

    let writer_scores = vec![
        seeded_writer_score("w1", 100.0, 1, None, 0.0),
        seeded_writer_score("w2", 90.0, 2, None, 0.0),
    ];
    db.replace_rankings(&[], &writer_scores, &[])
        .await
        .expect("Failed to persist");

    let page = db
        .get_leaderboard(&LeaderboardFilter {
            writer_allowlist: Some(vec!["w2".to_string()]),
            ..Default::default()
        })
        .await
        .expect("Failed to query");
    assert_eq!(page.total, 1);
    assert_eq!(page.entries[0].writer_id, "w2");

    // An empty allow-set matches nothing
    let empty = db
        .get_leaderboard(&LeaderboardFilter {
            writer_allowlist: Some(Vec::new()),
            ..Default::default()
        })
        .await
        .expect("Failed to query");
    assert_eq!(empty.total, 0);
    assert!(empty.entries.is_empty());
}

#[tokio::test]
#[serial]
async fn test_snapshots_upsert_per_day() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db = test_db.client().await.expect("Failed to connect");

    let writer_scores = vec![
        seeded_writer_score("w1", 40.0, 1, None, 0.0),
        seeded_writer_score("w2", 20.0, 2, None, 0.0),
    ];
    db.replace_rankings(&[], &writer_scores, &[])
        .await
        .expect("Failed to persist");

    let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let recorded = db.record_snapshots(day).await.expect("Failed to snapshot");
    assert_eq!(recorded, 2);

    // Same day again refreshes instead of duplicating
    db.record_snapshots(day).await.expect("Failed to re-snapshot");
    let count: i64 = db
        .client()
        .query_one("SELECT COUNT(*) FROM score_snapshots", &[])
        .await
        .expect("Failed to count")
        .get(0);
    assert_eq!(count, 2);

    let snapshots = db.get_snapshots("w1").await.expect("Failed to query snapshots");
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].snapshot_date, day);
    assert_eq!(snapshots[0].total_score, 40.0);
}

#[tokio::test]
#[serial]
async fn test_baseline_picks_most_recent_at_or_before_cutoff() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db = test_db.client().await.expect("Failed to connect");

    db.replace_rankings(&[], &[seeded_writer_score("w1", 40.0, 1, None, 0.0)], &[])
        .await
        .expect("Failed to persist");
    let old_day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    db.record_snapshots(old_day).await.expect("Failed to snapshot");

    db.replace_rankings(&[], &[seeded_writer_score("w1", 70.0, 1, None, 0.0)], &[])
        .await
        .expect("Failed to persist");
    let new_day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    db.record_snapshots(new_day).await.expect("Failed to snapshot");

    let mid = db
        .baseline_scores(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap())
        .await
        .expect("Failed to query baseline");
    assert_eq!(mid.get("w1"), Some(&40.0));

    let late = db
        .baseline_scores(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
        .await
        .expect("Failed to query baseline");
    assert_eq!(late.get("w1"), Some(&70.0));

    let early = db
        .baseline_scores(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap())
        .await
        .expect("Failed to query baseline");
    assert!(early.is_empty());
}

#[tokio::test]
#[serial]
async fn test_prestige_upsert_and_lookup() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db = test_db.client().await.expect("Failed to connect");

    let prestige = CompetitionPrestige {
        competition_id: "c1".to_string(),
        multiplier: 2.0,
        tier: PrestigeTier::Elite,
        updated_by: "admin_01".to_string(),
        updated_at: Utc::now()
    };
    db.upsert_prestige(&prestige).await.expect("Failed to insert prestige");

    let stored = db
        .get_prestige("c1")
        .await
        .expect("Failed to query")
        .expect("Prestige should exist");
    assert_eq!(stored.multiplier, 2.0);
    assert_eq!(stored.tier, PrestigeTier::Elite);

    // Upsert overwrites in place
    let updated = CompetitionPrestige {
        multiplier: 3.0,
        tier: PrestigeTier::Premier,
        ..prestige
    };
    db.upsert_prestige(&updated).await.expect("Failed to update prestige");

    let all = db.list_prestige().await.expect("Failed to list");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].multiplier, 3.0);

    let multipliers = db.prestige_multipliers().await.expect("Failed to map");
    assert_eq!(multipliers.get("c1"), Some(&3.0));
}

#[tokio::test]
#[serial]
async fn test_flag_lifecycle() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db = test_db.client().await.expect("Failed to connect");

    let flag = db
        .insert_flag("w1", FlagReason::DuplicateSubmission, "2 submissions to competition c1", Utc::now())
        .await
        .expect("Failed to insert flag");
    assert_eq!(flag.status, FlagStatus::Open);

    assert!(db
        .open_flag_exists("w1", FlagReason::DuplicateSubmission, "2 submissions to competition c1")
        .await
        .expect("Failed to check"));
    assert!(!db
        .open_flag_exists("w1", FlagReason::DuplicateSubmission, "different details")
        .await
        .expect("Failed to check"));

    let resolved = db
        .resolve_flag(flag.id, FlagStatus::Dismissed, "admin_01", Utc::now())
        .await
        .expect("Failed to resolve")
        .expect("Flag should resolve");
    assert_eq!(resolved.status, FlagStatus::Dismissed);
    assert_eq!(resolved.resolved_by.as_deref(), Some("admin_01"));
    assert!(resolved.resolved_at.is_some());

    // Resolution closed it, so the dedup check no longer matches
    assert!(!db
        .open_flag_exists("w1", FlagReason::DuplicateSubmission, "2 submissions to competition c1")
        .await
        .expect("Failed to check"));

    // Terminal flags do not resolve twice
    let again = db
        .resolve_flag(flag.id, FlagStatus::Confirmed, "admin_02", Utc::now())
        .await
        .expect("Failed to query");
    assert!(again.is_none());

    let open = db.list_flags(Some(FlagStatus::Open)).await.expect("Failed to list");
    assert!(open.is_empty());
}

#[tokio::test]
#[serial]
async fn test_appeal_lifecycle() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db = test_db.client().await.expect("Failed to connect");

    let appeal = db
        .insert_appeal("writer_01", "my placement is missing", Utc::now())
        .await
        .expect("Failed to insert appeal");
    assert_eq!(appeal.status, AppealStatus::Open);

    let open = db.list_appeals(Some(AppealStatus::Open)).await.expect("Failed to list");
    assert_eq!(open.len(), 1);

    let resolved = db
        .resolve_appeal(
            appeal.id,
            AppealStatus::Upheld,
            Some("score corrected"),
            "admin_01",
            Utc::now()
        )
        .await
        .expect("Failed to resolve")
        .expect("Appeal should resolve");
    assert_eq!(resolved.status, AppealStatus::Upheld);
    assert_eq!(resolved.resolution_note.as_deref(), Some("score corrected"));
    assert_eq!(resolved.resolved_by.as_deref(), Some("admin_01"));

    // Terminal appeals do not resolve twice
    let again = db
        .resolve_appeal(appeal.id, AppealStatus::Rejected, None, "admin_02", Utc::now())
        .await
        .expect("Failed to query");
    assert!(again.is_none());
}

#[tokio::test]
#[serial]
async fn test_appeal_resolves_from_under_review() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db = test_db.client().await.expect("Failed to connect");

    let appeal = db
        .insert_appeal("writer_01", "tier looks wrong", Utc::now())
        .await
        .expect("Failed to insert appeal");

    // Externally staged review state still resolves
    db.client()
        .execute(
            "UPDATE ranking_appeals SET status = 'under_review' WHERE id = $1",
            &[&appeal.id]
        )
        .await
        .expect("Failed to stage review");

    let resolved = db
        .resolve_appeal(appeal.id, AppealStatus::Rejected, None, "admin_01", Utc::now())
        .await
        .expect("Failed to resolve")
        .expect("Appeal should resolve from under_review");
    assert_eq!(resolved.status, AppealStatus::Rejected);
}
