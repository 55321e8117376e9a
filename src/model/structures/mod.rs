pub mod appeal;
pub mod flag;
pub mod placement_status;
pub mod prestige_tier;
pub mod score_tier;
pub mod verification_state;
