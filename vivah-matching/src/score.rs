use serde::Serialize;

use crate::profile::{present, same, MatchProfile, NEVER_MARRIED};
use crate::weights::{Weights, AGE_CLOSE_YEARS, AGE_FAR_YEARS, AGE_NEAR_YEARS};

/// Points earned per criterion for one pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub age: u32,
    pub religion: u32,
    pub caste: u32,
    pub education: u32,
    pub occupation: u32,
    pub location: u32,
    pub marital_status: u32,
    pub mother_tongue: u32,
}

impl ScoreBreakdown {
    pub fn earned(&self) -> u32 {
        self.age
            + self.religion
            + self.caste
            + self.education
            + self.occupation
            + self.location
            + self.marital_status
            + self.mother_tongue
    }

    /// Earned points as a share of the weight budget, rounded to 0..=100.
    pub fn percentage(&self, weights: &Weights) -> u8 {
        let total = weights.total();
        if total == 0 {
            return 0;
        }
        let pct = (self.earned() as f64 / total as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }
}

pub fn age_points(a: Option<i32>, b: Option<i32>, weights: &Weights) -> u32 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0;
    };
    match (a - b).abs() {
        d if d <= AGE_CLOSE_YEARS => weights.age_close,
        d if d <= AGE_NEAR_YEARS => weights.age_near,
        d if d <= AGE_FAR_YEARS => weights.age_far,
        _ => 0,
    }
}

fn education_points(a: &MatchProfile, b: &MatchProfile, weights: &Weights) -> u32 {
    if same(&a.education, &b.education) {
        weights.education
    } else if present(&a.education).is_some() && present(&b.education).is_some() {
        weights.education_partial
    } else {
        0
    }
}

fn occupation_points(a: &MatchProfile, b: &MatchProfile, weights: &Weights) -> u32 {
    if present(&a.occupation).is_none() || present(&b.occupation).is_none() {
        return 0;
    }
    let mut points = weights.occupation_present;
    if same(&a.occupation, &b.occupation) {
        points += weights.occupation_same;
    }
    points
}

fn location_points(a: &MatchProfile, b: &MatchProfile, weights: &Weights) -> u32 {
    if same(&a.city, &b.city) {
        weights.city
    } else if same(&a.state, &b.state) {
        weights.state
    } else {
        0
    }
}

fn marital_points(a: &MatchProfile, b: &MatchProfile, weights: &Weights) -> u32 {
    if same(&a.marital_status, &b.marital_status) {
        weights.marital_status
    } else if present(&a.marital_status) == Some(NEVER_MARRIED)
        || present(&b.marital_status) == Some(NEVER_MARRIED)
    {
        weights.marital_partial
    } else {
        0
    }
}

fn exact_points(a: &Option<String>, b: &Option<String>, points: u32) -> u32 {
    if same(a, b) {
        points
    } else {
        0
    }
}

pub fn score_breakdown(a: &MatchProfile, b: &MatchProfile, weights: &Weights) -> ScoreBreakdown {
    ScoreBreakdown {
        age: age_points(a.age, b.age, weights),
        religion: exact_points(&a.religion, &b.religion, weights.religion),
        caste: exact_points(&a.caste, &b.caste, weights.caste),
        education: education_points(a, b, weights),
        occupation: occupation_points(a, b, weights),
        location: location_points(a, b, weights),
        marital_status: marital_points(a, b, weights),
        mother_tongue: exact_points(&a.mother_tongue, &b.mother_tongue, weights.mother_tongue),
    }
}

/// Compatibility percentage (0..=100) between two records.
pub fn score(a: &MatchProfile, b: &MatchProfile, weights: &Weights) -> u8 {
    score_breakdown(a, b, weights).percentage(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Gender;
    use rstest::rstest;

    fn anchor() -> MatchProfile {
        MatchProfile {
            first_name: "Arun".into(),
            age: Some(30),
            religion: Some("Hindu".into()),
            caste: Some("Iyer".into()),
            education: Some("B.E".into()),
            occupation: Some("Engineer".into()),
            marital_status: Some(NEVER_MARRIED.into()),
            mother_tongue: Some("Tamil".into()),
            city: Some("Chennai".into()),
            state: Some("Tamil Nadu".into()),
            ..MatchProfile::new(1, Gender::Male)
        }
    }

    fn mirror() -> MatchProfile {
        MatchProfile {
            id: 2,
            first_name: "Priya".into(),
            gender: Gender::Female,
            age: Some(29),
            ..anchor()
        }
    }

    fn disjoint() -> MatchProfile {
        MatchProfile {
            first_name: "Meera".into(),
            age: Some(45),
            religion: Some("Christian".into()),
            caste: Some("Nadar".into()),
            education: None,
            occupation: None,
            marital_status: Some("divorced".into()),
            mother_tongue: Some("Malayalam".into()),
            city: Some("Kochi".into()),
            state: Some("Kerala".into()),
            ..MatchProfile::new(3, Gender::Female)
        }
    }

    #[test]
    fn identical_records_score_full() {
        let w = Weights::default();
        let breakdown = score_breakdown(&anchor(), &mirror(), &w);
        assert_eq!(
            breakdown,
            ScoreBreakdown {
                age: 15,
                religion: 20,
                caste: 10,
                education: 15,
                occupation: 10,
                location: 15,
                marital_status: 10,
                mother_tongue: 5,
            }
        );
        assert_eq!(score(&anchor(), &mirror(), &w), 100);
    }

    #[test]
    fn disjoint_records_score_zero() {
        let mut a = anchor();
        a.marital_status = Some("widowed".into());
        assert_eq!(score(&a, &disjoint(), &Weights::default()), 0);
    }

    #[test]
    fn never_married_on_one_side_earns_partial_marital_credit() {
        let breakdown = score_breakdown(&anchor(), &disjoint(), &Weights::default());
        assert_eq!(breakdown.marital_status, 5);
        assert_eq!(breakdown.earned(), 5);
    }

    #[rstest]
    #[case(30, 30, 15)]
    #[case(30, 32, 15)]
    #[case(30, 28, 15)]
    #[case(30, 33, 10)]
    #[case(30, 35, 10)]
    #[case(30, 36, 5)]
    #[case(30, 38, 5)]
    #[case(30, 39, 0)]
    #[case(30, 21, 0)]
    fn age_tiers_break_at_two_five_eight(#[case] a: i32, #[case] b: i32, #[case] expected: u32) {
        assert_eq!(age_points(Some(a), Some(b), &Weights::default()), expected);
    }

    #[test]
    fn age_points_never_increase_with_gap() {
        let w = Weights::default();
        let mut previous = u32::MAX;
        for gap in 0..30 {
            let points = age_points(Some(25), Some(25 + gap), &w);
            assert!(points <= previous, "gap {gap} scored {points} after {previous}");
            previous = points;
        }
    }

    #[test]
    fn missing_age_contributes_nothing() {
        let w = Weights::default();
        assert_eq!(age_points(None, Some(30), &w), 0);
        assert_eq!(age_points(Some(30), None, &w), 0);
    }

    #[test]
    fn different_education_both_present_earns_partial() {
        let mut b = mirror();
        b.education = Some("MBA".into());
        assert_eq!(score_breakdown(&anchor(), &b, &Weights::default()).education, 7);

        b.education = None;
        assert_eq!(score_breakdown(&anchor(), &b, &Weights::default()).education, 0);
    }

    #[test]
    fn occupation_counts_presence_then_equality() {
        let w = Weights::default();
        let mut b = mirror();
        b.occupation = Some("Doctor".into());
        assert_eq!(score_breakdown(&anchor(), &b, &w).occupation, 5);

        b.occupation = Some("   ".into());
        assert_eq!(score_breakdown(&anchor(), &b, &w).occupation, 0);
    }

    #[test]
    fn location_falls_back_to_state() {
        let w = Weights::default();
        let mut b = mirror();
        b.city = Some("Madurai".into());
        assert_eq!(score_breakdown(&anchor(), &b, &w).location, 10);

        b.state = Some("Karnataka".into());
        assert_eq!(score_breakdown(&anchor(), &b, &w).location, 0);
    }

    #[test]
    fn empty_records_score_zero() {
        let a = MatchProfile::new(1, Gender::Male);
        let b = MatchProfile::new(2, Gender::Female);
        assert_eq!(score(&a, &b, &Weights::default()), 0);
    }

    #[test]
    fn score_stays_within_bounds_across_combinations() {
        let w = Weights::default();
        let religions = [None, Some("Hindu"), Some("Muslim")];
        let statuses = [None, Some(NEVER_MARRIED), Some("divorced")];
        let cities = [None, Some("Chennai"), Some("Coimbatore")];
        let a = anchor();
        for age in [18, 28, 30, 33, 37, 60] {
            for religion in religions {
                for status in statuses {
                    for city in cities {
                        let b = MatchProfile {
                            age: Some(age),
                            religion: religion.map(String::from),
                            marital_status: status.map(String::from),
                            city: city.map(String::from),
                            ..disjoint()
                        };
                        let s = score(&a, &b, &w);
                        assert!(s <= 100);
                        assert_eq!(s, score(&b, &a, &w), "score must be symmetric");
                    }
                }
            }
        }
    }

    #[test]
    fn custom_weights_are_normalised_to_their_total() {
        let w = Weights {
            religion: 120,
            ..Weights::default()
        };
        let mut b = disjoint();
        b.religion = Some("Hindu".into());
        let mut a = anchor();
        a.marital_status = None;
        b.marital_status = None;
        // 120 of 200 points.
        assert_eq!(score(&a, &b, &w), 60);
    }

    #[test]
    fn zero_budget_scores_zero() {
        let w = Weights {
            age_close: 0,
            age_near: 0,
            age_far: 0,
            religion: 0,
            caste: 0,
            education: 0,
            education_partial: 0,
            occupation_present: 0,
            occupation_same: 0,
            city: 0,
            state: 0,
            marital_status: 0,
            marital_partial: 0,
            mother_tongue: 0,
        };
        assert_eq!(score(&anchor(), &mirror(), &w), 0);
    }
}
