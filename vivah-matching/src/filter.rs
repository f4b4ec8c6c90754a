use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::profile::{present, MatchProfile};

/// Caller-supplied narrowing of the candidate pool for one anchor.
///
/// Every criterion is conjunctive. Range bounds are inclusive and an empty
/// selection list places no constraint on that attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityFilter {
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
    pub height_min: Option<f64>,
    pub height_max: Option<f64>,
    pub marital_statuses: Vec<String>,
    pub religions: Vec<String>,
    pub castes: Vec<String>,
    pub educations: Vec<String>,
    pub occupations: Vec<String>,
    pub cities: Vec<String>,
    pub search: Option<String>,
    /// Ids to leave out, e.g. users already matched with the anchor.
    pub exclude_ids: BTreeSet<i32>,
}

fn in_selection(selection: &[String], value: &Option<String>) -> bool {
    if selection.is_empty() {
        return true;
    }
    match present(value) {
        Some(v) => selection.iter().any(|s| s.trim() == v),
        None => false,
    }
}

impl EligibilityFilter {
    pub fn eligible(&self, anchor: &MatchProfile, candidate: &MatchProfile) -> bool {
        if candidate.id == anchor.id || self.exclude_ids.contains(&candidate.id) {
            return false;
        }
        if anchor.gender.opposite() != Some(candidate.gender) {
            return false;
        }
        self.passes_age(candidate)
            && self.passes_height(candidate)
            && in_selection(&self.marital_statuses, &candidate.marital_status)
            && in_selection(&self.religions, &candidate.religion)
            && in_selection(&self.castes, &candidate.caste)
            && in_selection(&self.educations, &candidate.education)
            && in_selection(&self.occupations, &candidate.occupation)
            && in_selection(&self.cities, &candidate.city)
            && self.matches_search(candidate)
    }

    fn passes_age(&self, candidate: &MatchProfile) -> bool {
        if self.age_min.is_none() && self.age_max.is_none() {
            return true;
        }
        let Some(age) = candidate.age else {
            return false;
        };
        self.age_min.map_or(true, |min| age >= min) && self.age_max.map_or(true, |max| age <= max)
    }

    // Candidates without a recorded height are not filtered on height.
    fn passes_height(&self, candidate: &MatchProfile) -> bool {
        let Some(height) = candidate.height_cm else {
            return true;
        };
        self.height_min.map_or(true, |min| height >= min)
            && self.height_max.map_or(true, |max| height <= max)
    }

    fn matches_search(&self, candidate: &MatchProfile) -> bool {
        let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return true;
        };
        let term = term.to_lowercase();
        candidate.first_name.to_lowercase().contains(&term)
            || candidate.last_name.to_lowercase().contains(&term)
            || candidate.phone.contains(&term)
    }
}

pub fn filter_candidates<'a>(
    anchor: &MatchProfile,
    candidates: &'a [MatchProfile],
    filter: &EligibilityFilter,
) -> Vec<&'a MatchProfile> {
    candidates
        .iter()
        .filter(|c| filter.eligible(anchor, c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Gender;

    fn person(id: i32, gender: Gender, age: i32) -> MatchProfile {
        MatchProfile {
            first_name: format!("User{id}"),
            last_name: "Kumar".into(),
            phone: format!("98400000{id:02}"),
            age: Some(age),
            ..MatchProfile::new(id, gender)
        }
    }

    fn ids(found: Vec<&MatchProfile>) -> Vec<i32> {
        found.into_iter().map(|p| p.id).collect()
    }

    #[test]
    fn excludes_anchor_and_same_gender() {
        let anchor = person(1, Gender::Male, 30);
        let pool = vec![
            anchor.clone(),
            person(2, Gender::Male, 29),
            person(3, Gender::Female, 28),
            person(4, Gender::Other, 28),
        ];
        let found = filter_candidates(&anchor, &pool, &EligibilityFilter::default());
        assert_eq!(ids(found), vec![3]);
    }

    #[test]
    fn female_anchor_sees_only_men() {
        let anchor = person(10, Gender::Female, 27);
        let pool = vec![person(11, Gender::Male, 30), person(12, Gender::Female, 26)];
        assert_eq!(ids(filter_candidates(&anchor, &pool, &EligibilityFilter::default())), vec![11]);
    }

    #[test]
    fn other_gender_anchor_has_no_candidates() {
        let anchor = person(1, Gender::Other, 30);
        let pool = vec![person(2, Gender::Male, 30), person(3, Gender::Female, 30)];
        assert!(filter_candidates(&anchor, &pool, &EligibilityFilter::default()).is_empty());
    }

    #[test]
    fn age_range_is_inclusive_and_requires_age() {
        let anchor = person(1, Gender::Male, 30);
        let mut ageless = person(5, Gender::Female, 0);
        ageless.age = None;
        let pool = vec![
            person(2, Gender::Female, 24),
            person(3, Gender::Female, 25),
            person(4, Gender::Female, 30),
            person(6, Gender::Female, 31),
            ageless,
        ];
        let filter = EligibilityFilter {
            age_min: Some(25),
            age_max: Some(30),
            ..Default::default()
        };
        assert_eq!(ids(filter_candidates(&anchor, &pool, &filter)), vec![3, 4]);
    }

    #[test]
    fn height_filter_skips_candidates_without_height() {
        let anchor = person(1, Gender::Male, 30);
        let mut short = person(2, Gender::Female, 28);
        short.height_cm = Some(150.0);
        let mut tall = person(3, Gender::Female, 28);
        tall.height_cm = Some(165.0);
        let unknown = person(4, Gender::Female, 28);
        let pool = vec![short, tall, unknown];
        let filter = EligibilityFilter {
            height_min: Some(155.0),
            height_max: Some(165.0),
            ..Default::default()
        };
        assert_eq!(ids(filter_candidates(&anchor, &pool, &filter)), vec![3, 4]);
    }

    #[test]
    fn empty_selection_is_a_wildcard() {
        let anchor = person(1, Gender::Male, 30);
        let mut hindu = person(2, Gender::Female, 28);
        hindu.religion = Some("Hindu".into());
        let no_religion = person(3, Gender::Female, 28);
        let pool = vec![hindu, no_religion];

        let open = EligibilityFilter::default();
        assert_eq!(ids(filter_candidates(&anchor, &pool, &open)), vec![2, 3]);

        let narrowed = EligibilityFilter {
            religions: vec!["Hindu".into(), "Jain".into()],
            ..Default::default()
        };
        assert_eq!(ids(filter_candidates(&anchor, &pool, &narrowed)), vec![2]);
    }

    #[test]
    fn categorical_filters_are_conjunctive() {
        let anchor = person(1, Gender::Male, 30);
        let mut a = person(2, Gender::Female, 28);
        a.city = Some("Chennai".into());
        a.education = Some("MBA".into());
        let mut b = person(3, Gender::Female, 28);
        b.city = Some("Chennai".into());
        b.education = Some("B.Sc".into());
        let pool = vec![a, b];
        let filter = EligibilityFilter {
            cities: vec!["Chennai".into()],
            educations: vec!["MBA".into()],
            ..Default::default()
        };
        assert_eq!(ids(filter_candidates(&anchor, &pool, &filter)), vec![2]);
    }

    #[test]
    fn search_matches_names_case_insensitively_and_phone() {
        let anchor = person(1, Gender::Male, 30);
        let mut lakshmi = person(2, Gender::Female, 28);
        lakshmi.first_name = "Lakshmi".into();
        lakshmi.phone = "9876543210".into();
        let other = person(3, Gender::Female, 28);
        let pool = vec![lakshmi, other];

        let by_name = EligibilityFilter {
            search: Some("LAKSH".into()),
            ..Default::default()
        };
        assert_eq!(ids(filter_candidates(&anchor, &pool, &by_name)), vec![2]);

        let by_phone = EligibilityFilter {
            search: Some("54321".into()),
            ..Default::default()
        };
        assert_eq!(ids(filter_candidates(&anchor, &pool, &by_phone)), vec![2]);

        let by_surname = EligibilityFilter {
            search: Some("kumar".into()),
            ..Default::default()
        };
        assert_eq!(ids(filter_candidates(&anchor, &pool, &by_surname)), vec![2, 3]);

        let blank = EligibilityFilter {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(ids(filter_candidates(&anchor, &pool, &blank)), vec![2, 3]);
    }

    #[test]
    fn excluded_ids_are_dropped() {
        let anchor = person(1, Gender::Male, 30);
        let pool = vec![person(2, Gender::Female, 28), person(3, Gender::Female, 28)];
        let filter = EligibilityFilter {
            exclude_ids: [2].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(ids(filter_candidates(&anchor, &pool, &filter)), vec![3]);
    }
}
