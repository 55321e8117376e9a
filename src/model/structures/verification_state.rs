use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Moderation state of a placement. Only verified placements count at full
/// weight; anything else is discounted.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VerificationState {
    Verified,
    Pending,
    #[default]
    #[serde(other)]
    Unverified
}

impl VerificationState {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationState::Verified)
    }
}
