use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Outcome of a submission in a competition, as reported by the submission ledger.
///
/// Statuses the ledger may introduce later deserialize as [`PlacementStatus::Unknown`]
/// and score zero weight rather than failing the run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlacementStatus {
    Winner,
    RunnerUp,
    Finalist,
    Semifinalist,
    Quarterfinalist,
    Shortlist,
    Longlist,
    HonorableMention,
    Pending,
    #[default]
    #[serde(other)]
    Unknown
}

impl PlacementStatus {
    /// Human-readable label used on badges.
    pub fn label(&self) -> &'static str {
        match self {
            PlacementStatus::Winner => "Winner",
            PlacementStatus::RunnerUp => "Runner-Up",
            PlacementStatus::Finalist => "Finalist",
            PlacementStatus::Semifinalist => "Semifinalist",
            PlacementStatus::Quarterfinalist => "Quarterfinalist",
            PlacementStatus::Shortlist => "Shortlist",
            PlacementStatus::Longlist => "Longlist",
            PlacementStatus::HonorableMention => "Honorable Mention",
            PlacementStatus::Pending => "Pending",
            PlacementStatus::Unknown => "Unknown"
        }
    }
}
