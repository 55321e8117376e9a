use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Why an anti-gaming flag was raised.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FlagReason {
    DuplicateSubmission,
    SuspiciousPattern,
    ManualAdmin
}

/// Lifecycle of an anti-gaming flag. Dismissed and confirmed are terminal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FlagStatus {
    #[default]
    Open,
    Dismissed,
    Confirmed
}

impl FlagStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, FlagStatus::Open)
    }

    /// Statuses a moderator may resolve an open flag into.
    pub fn is_resolution(&self) -> bool {
        matches!(self, FlagStatus::Dismissed | FlagStatus::Confirmed)
    }
}
