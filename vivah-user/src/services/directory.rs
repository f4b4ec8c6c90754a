//! What one member may see of another.

use serde::Serialize;
use vivah_matching::{score_breakdown, Gender, RankedCandidate, ScoreBreakdown, Weights};
use vivah_shared::errors::{AppError, AppResult, ErrorCode};
use vivah_shared::models::{Profile, UserWithProfile};

/// Public face of a member. Contact details stay with the admins.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileCard {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    pub gender: Gender,
    pub profile: Option<Profile>,
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
}

impl ProfileCard {
    pub fn from_ranked(member: &UserWithProfile, ranked: &RankedCandidate) -> Self {
        Self {
            id: member.user.id,
            first_name: member.user.first_name.clone(),
            last_name: member.user.last_name.clone(),
            age: member.user.age,
            gender: member.user.gender(),
            profile: member.profile.clone(),
            score: ranked.score,
            breakdown: None,
        }
    }
}

/// Unapproved or same-gender members are reported as missing rather than
/// forbidden.
pub fn check_visible(viewer: &UserWithProfile, target: &UserWithProfile) -> AppResult<()> {
    let visible = target.user.id != viewer.user.id
        && target.user.is_approved
        && viewer.user.gender().opposite() == Some(target.user.gender());
    if !visible {
        return Err(AppError::new(
            ErrorCode::ProfileNotFound,
            format!("profile {} not found", target.user.id),
        ));
    }
    Ok(())
}

/// Full card for `target` as seen by `viewer`.
pub fn view_profile(
    viewer: &UserWithProfile,
    target: &UserWithProfile,
    weights: &Weights,
) -> AppResult<ProfileCard> {
    check_visible(viewer, target)?;

    let breakdown = score_breakdown(&viewer.match_profile(), &target.match_profile(), weights);
    Ok(ProfileCard {
        id: target.user.id,
        first_name: target.user.first_name.clone(),
        last_name: target.user.last_name.clone(),
        age: target.user.age,
        gender: target.user.gender(),
        profile: target.profile.clone(),
        score: breakdown.percentage(weights),
        breakdown: Some(breakdown),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::member;
    use vivah_shared::models::User;

    fn record(user: User) -> UserWithProfile {
        UserWithProfile { user, profile: None }
    }

    #[test]
    fn opposite_gender_approved_profile_is_visible() {
        let card = view_profile(&record(member(1, "male")), &record(member(2, "female")), &Weights::default())
            .unwrap();
        assert_eq!(card.id, 2);
        // Same age only.
        assert_eq!(card.score, 15);
        assert!(card.breakdown.is_some());
        let json = serde_json::to_value(&card).unwrap();
        assert!(json.get("phone").is_none());
    }

    #[test]
    fn hidden_profiles_read_as_not_found() {
        let viewer = record(member(1, "male"));
        let w = Weights::default();
        let pending = record(User { is_approved: false, ..member(2, "female") });
        assert_eq!(view_profile(&viewer, &pending, &w).unwrap_err().status(), axum::http::StatusCode::NOT_FOUND);
        assert!(view_profile(&viewer, &record(member(3, "male")), &w).is_err());
        assert!(view_profile(&viewer, &viewer, &w).is_err());
    }
}
