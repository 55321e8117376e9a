// Status weights
pub const WEIGHT_WINNER: f64 = 100.0;
pub const WEIGHT_RUNNER_UP: f64 = 75.0;
pub const WEIGHT_FINALIST: f64 = 55.0;
pub const WEIGHT_SEMIFINALIST: f64 = 35.0;
pub const WEIGHT_QUARTERFINALIST: f64 = 20.0;
pub const WEIGHT_SHORTLIST: f64 = 10.0;
pub const WEIGHT_LONGLIST: f64 = 6.0;
pub const WEIGHT_HONORABLE_MENTION: f64 = 4.0;
pub const WEIGHT_PENDING: f64 = 1.0;
// Verification discount
pub const UNVERIFIED_MULTIPLIER: f64 = 0.5;
// Placements lose half their value every year
pub const DECAY_HALF_LIFE_DAYS: f64 = 365.0;
// Confidence ramps linearly up to this many scored placements
pub const CONFIDENCE_SAMPLE_THRESHOLD: i32 = 5;
pub const CONFIDENCE_FLOOR: f64 = 0.25;
// Prestige multiplier bounds
pub const DEFAULT_PRESTIGE_MULTIPLIER: f64 = 1.0;
pub const MAX_PRESTIGE_MULTIPLIER: f64 = 5.0;
// Badges are awarded at quarterfinalist weight and above
pub const BADGE_WEIGHT_THRESHOLD: f64 = WEIGHT_QUARTERFINALIST;
// Tier cutoffs as a fraction of all ranked writers
pub const TIER_TOP_1_CUTOFF: f64 = 0.01;
pub const TIER_TOP_2_CUTOFF: f64 = 0.02;
pub const TIER_TOP_10_CUTOFF: f64 = 0.10;
pub const TIER_TOP_25_CUTOFF: f64 = 0.25;
// Trending compares against the snapshot closest to this many days ago
pub const SNAPSHOT_BASELINE_DAYS: i64 = 30;
// Leaderboard paging
pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 25;
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;
// Session-level advisory lock key guarding the recompute
pub const RECOMPUTE_LOCK_KEY: i64 = 0x7372_6e6b;
pub const METHODOLOGY_VERSION: &str = "2025.1";
