use serde::{Deserialize, Serialize};

/// Marital status value that earns partial credit when the two sides differ.
pub const NEVER_MARRIED: &str = "never_married";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Only the binary genders pair up; `Other` has no counterpart.
    pub fn opposite(self) -> Option<Self> {
        match self {
            Self::Male => Some(Self::Female),
            Self::Female => Some(Self::Male),
            Self::Other => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(format!("unknown gender: {s}")),
        }
    }
}

/// Flattened user + profile record the scorer and the eligibility filter work on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchProfile {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub gender: Gender,
    pub age: Option<i32>,
    pub height_cm: Option<f64>,
    pub religion: Option<String>,
    pub caste: Option<String>,
    pub education: Option<String>,
    pub occupation: Option<String>,
    pub marital_status: Option<String>,
    pub mother_tongue: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl MatchProfile {
    pub fn new(id: i32, gender: Gender) -> Self {
        Self {
            id,
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            gender,
            age: None,
            height_cm: None,
            religion: None,
            caste: None,
            education: None,
            occupation: None,
            marital_status: None,
            mother_tongue: None,
            city: None,
            state: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Blank strings count as absent.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Both sides present and equal.
pub(crate) fn same(a: &Option<String>, b: &Option<String>) -> bool {
    matches!((present(a), present(b)), (Some(x), Some(y)) if x == y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_gender_is_binary_only() {
        assert_eq!(Gender::Male.opposite(), Some(Gender::Female));
        assert_eq!(Gender::Female.opposite(), Some(Gender::Male));
        assert_eq!(Gender::Other.opposite(), None);
    }

    #[test]
    fn gender_parses_loosely() {
        assert_eq!(" Male ".parse::<Gender>(), Ok(Gender::Male));
        assert_eq!("F".parse::<Gender>(), Ok(Gender::Female));
        assert!("unknown".parse::<Gender>().is_err());
    }

    #[test]
    fn blank_values_are_not_equal() {
        assert!(!same(&Some("  ".into()), &Some("  ".into())));
        assert!(!same(&None, &None));
        assert!(same(&Some("Hindu ".into()), &Some("Hindu".into())));
    }
}
