use vivah_matching::{rank_candidates, EligibilityFilter, MatchProfile, RankedCandidate, Weights};
use vivah_shared::errors::{AppError, AppResult, ErrorCode};

/// Rules an admin-created pairing has to satisfy before it is stored.
pub fn check_pair(a: &MatchProfile, b: &MatchProfile) -> AppResult<()> {
    if a.id == b.id {
        return Err(AppError::new(ErrorCode::CannotMatchSelf, "cannot match a user with themselves"));
    }
    if a.gender.opposite() != Some(b.gender) {
        return Err(AppError::new(
            ErrorCode::IncompatibleGenders,
            format!("cannot match {} with {}", a.gender, b.gender),
        ));
    }
    Ok(())
}

pub fn check_score(score: i32) -> AppResult<i32> {
    if !(0..=100).contains(&score) {
        return Err(AppError::new(
            ErrorCode::InvalidMatchScore,
            format!("match score must be between 0 and 100, got {score}"),
        ));
    }
    Ok(score)
}

/// Ranked candidates for `anchor`, cut to `limit` when given.
pub fn best_candidates(
    anchor: &MatchProfile,
    pool: &[MatchProfile],
    filter: &EligibilityFilter,
    weights: &Weights,
    limit: Option<usize>,
) -> Vec<RankedCandidate> {
    let mut ranked = rank_candidates(anchor, pool, filter, weights);
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use vivah_matching::Gender;

    fn person(id: i32, gender: Gender, city: &str) -> MatchProfile {
        MatchProfile {
            age: Some(28),
            city: Some(city.into()),
            ..MatchProfile::new(id, gender)
        }
    }

    #[rstest]
    #[case(Gender::Male, Gender::Female, true)]
    #[case(Gender::Female, Gender::Male, true)]
    #[case(Gender::Male, Gender::Male, false)]
    #[case(Gender::Other, Gender::Female, false)]
    fn pairs_need_opposite_genders(#[case] a: Gender, #[case] b: Gender, #[case] ok: bool) {
        let result = check_pair(&person(1, a, "Chennai"), &person(2, b, "Chennai"));
        assert_eq!(result.is_ok(), ok);
    }

    #[test]
    fn self_match_is_forbidden() {
        let p = person(5, Gender::Male, "Chennai");
        let err = check_pair(&p, &p).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[case(0, true)]
    #[case(100, true)]
    #[case(-1, false)]
    #[case(101, false)]
    fn scores_are_percentages(#[case] score: i32, #[case] ok: bool) {
        assert_eq!(check_score(score).is_ok(), ok);
    }

    #[test]
    fn candidates_are_ranked_then_limited() {
        let anchor = person(1, Gender::Male, "Chennai");
        let pool = vec![
            person(2, Gender::Female, "Madurai"),
            person(3, Gender::Female, "Chennai"),
            person(4, Gender::Female, "Chennai"),
            person(5, Gender::Male, "Chennai"),
        ];
        let ranked = best_candidates(&anchor, &pool, &EligibilityFilter::default(), &Weights::default(), Some(2));
        let ids: Vec<i32> = ranked.iter().map(|r| r.profile.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }
}
