pub mod badges;
pub mod constants;
pub mod duplicates;
pub mod rank_model;
pub mod scoring;
pub mod structures;
pub mod tiers;
