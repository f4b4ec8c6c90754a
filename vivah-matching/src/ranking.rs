use serde::Serialize;

use crate::filter::EligibilityFilter;
use crate::profile::MatchProfile;
use crate::score::{score_breakdown, ScoreBreakdown};
use crate::weights::Weights;

#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub profile: MatchProfile,
    pub score: u8,
    pub breakdown: ScoreBreakdown,
}

/// Eligible candidates for `anchor`, best score first. Ties keep id order.
pub fn rank_candidates(
    anchor: &MatchProfile,
    candidates: &[MatchProfile],
    filter: &EligibilityFilter,
    weights: &Weights,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .iter()
        .filter(|c| filter.eligible(anchor, c))
        .map(|c| {
            let breakdown = score_breakdown(anchor, c, weights);
            RankedCandidate {
                profile: c.clone(),
                score: breakdown.percentage(weights),
                breakdown,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.profile.id.cmp(&b.profile.id)));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Gender;

    #[test]
    fn best_match_comes_first_with_ties_by_id() {
        let anchor = MatchProfile {
            age: Some(30),
            religion: Some("Hindu".into()),
            city: Some("Chennai".into()),
            ..MatchProfile::new(1, Gender::Male)
        };
        let strong = MatchProfile {
            age: Some(29),
            religion: Some("Hindu".into()),
            city: Some("Chennai".into()),
            ..MatchProfile::new(7, Gender::Female)
        };
        let weak_a = MatchProfile {
            age: Some(40),
            ..MatchProfile::new(5, Gender::Female)
        };
        let weak_b = MatchProfile {
            age: Some(41),
            ..MatchProfile::new(3, Gender::Female)
        };
        let same_gender = MatchProfile::new(2, Gender::Male);

        let ranked = rank_candidates(
            &anchor,
            &[weak_a, strong, same_gender, weak_b],
            &EligibilityFilter::default(),
            &Weights::default(),
        );

        let order: Vec<(i32, u8)> = ranked.iter().map(|r| (r.profile.id, r.score)).collect();
        assert_eq!(order, vec![(7, 50), (3, 0), (5, 0)]);
        assert_eq!(ranked[0].breakdown.religion, 20);
    }
}
