use serde::Deserialize;
use vivah_matching::EligibilityFilter;

/// Query-string form of an eligibility filter. List criteria arrive
/// comma separated: `?religion=Hindu,Jain&city=Chennai`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateQuery {
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
    pub height_min: Option<f64>,
    pub height_max: Option<f64>,
    pub marital_status: Option<String>,
    pub religion: Option<String>,
    pub caste: Option<String>,
    pub education: Option<String>,
    pub occupation: Option<String>,
    pub city: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub exclude_matched: bool,
    pub limit: Option<usize>,
}

fn split_list(raw: &Option<String>) -> Vec<String> {
    raw.as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}

impl CandidateQuery {
    pub fn filter(&self) -> EligibilityFilter {
        EligibilityFilter {
            age_min: self.age_min,
            age_max: self.age_max,
            height_min: self.height_min,
            height_max: self.height_max,
            marital_statuses: split_list(&self.marital_status),
            religions: split_list(&self.religion),
            castes: split_list(&self.caste),
            educations: split_list(&self.education),
            occupations: split_list(&self.occupation),
            cities: split_list(&self.city),
            search: self.search.clone(),
            exclude_ids: Default::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_lists_become_selections() {
        let query = CandidateQuery {
            religion: Some("Hindu, Jain,,".into()),
            city: Some("  ".into()),
            age_min: Some(25),
            ..Default::default()
        };
        let filter = query.filter();
        assert_eq!(filter.religions, vec!["Hindu", "Jain"]);
        assert!(filter.cities.is_empty());
        assert_eq!(filter.age_min, Some(25));
        assert!(filter.exclude_ids.is_empty());
    }
}
