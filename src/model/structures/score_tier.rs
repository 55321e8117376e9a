use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Percentile band a ranked writer falls into. Writers outside the top 25%
/// carry no tier.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter)]
pub enum ScoreTier {
    #[serde(rename = "top_1")]
    #[strum(serialize = "top_1")]
    Top1,
    #[serde(rename = "top_2")]
    #[strum(serialize = "top_2")]
    Top2,
    #[serde(rename = "top_10")]
    #[strum(serialize = "top_10")]
    Top10,
    #[serde(rename = "top_25")]
    #[strum(serialize = "top_25")]
    Top25
}
