use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Editorial classification of a competition, set by administrators alongside
/// the prestige multiplier.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PrestigeTier {
    #[default]
    Standard,
    Notable,
    Elite,
    Premier
}
