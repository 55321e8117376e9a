use crate::model::{
    constants::BADGE_WEIGHT_THRESHOLD,
    scoring::status_weight,
    structures::{placement_status::PlacementStatus, verification_state::VerificationState}
};

/// Whether a placement earns a permanent recognition badge: verified and at
/// least quarterfinalist weight.
pub fn deserves_badge(status: PlacementStatus, verification: VerificationState) -> bool {
    verification.is_verified() && status_weight(status) >= BADGE_WEIGHT_THRESHOLD
}

/// Badge display label, e.g. "2024 Nicholl Fellowship Winner".
pub fn badge_label(year: i32, competition_title: &str, status: PlacementStatus) -> String {
    format!("{} {} {}", year, competition_title.trim(), status.label())
}
