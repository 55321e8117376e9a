use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Lifecycle of a ranking appeal. Upheld and rejected are terminal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AppealStatus {
    #[default]
    Open,
    UnderReview,
    Upheld,
    Rejected
}

impl AppealStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AppealStatus::Upheld | AppealStatus::Rejected)
    }

    /// Statuses a moderator may resolve an appeal into.
    pub fn is_resolution(&self) -> bool {
        matches!(self, AppealStatus::Upheld | AppealStatus::Rejected)
    }
}
