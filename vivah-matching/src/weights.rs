use serde::{Deserialize, Serialize};

/// Age gaps (in years) where the age criterion drops to the next tier.
pub const AGE_CLOSE_YEARS: i32 = 2;
pub const AGE_NEAR_YEARS: i32 = 5;
pub const AGE_FAR_YEARS: i32 = 8;

/// Points awarded per criterion. The defaults add up to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub age_close: u32,
    pub age_near: u32,
    pub age_far: u32,
    pub religion: u32,
    pub caste: u32,
    pub education: u32,
    pub education_partial: u32,
    pub occupation_present: u32,
    pub occupation_same: u32,
    pub city: u32,
    pub state: u32,
    pub marital_status: u32,
    pub marital_partial: u32,
    pub mother_tongue: u32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            age_close: 15,
            age_near: 10,
            age_far: 5,
            religion: 20,
            caste: 10,
            education: 15,
            education_partial: 7,
            occupation_present: 5,
            occupation_same: 5,
            city: 15,
            state: 10,
            marital_status: 10,
            marital_partial: 5,
            mother_tongue: 5,
        }
    }
}

impl Weights {
    /// Best attainable sum: the top tier of every criterion.
    pub fn total(&self) -> u32 {
        self.age_close.max(self.age_near).max(self.age_far)
            + self.religion
            + self.caste
            + self.education.max(self.education_partial)
            + self.occupation_present
            + self.occupation_same
            + self.city.max(self.state)
            + self.marital_status.max(self.marital_partial)
            + self.mother_tongue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget_is_one_hundred() {
        assert_eq!(Weights::default().total(), 100);
    }

    #[test]
    fn partial_config_keeps_remaining_defaults() {
        let weights: Weights = serde_json::from_str(r#"{"religion": 30}"#).unwrap();
        assert_eq!(weights.religion, 30);
        assert_eq!(weights.caste, 10);
        assert_eq!(weights.total(), 110);
    }
}
