use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::profiles;

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = profiles)]
pub struct Profile {
    pub id: i32,
    pub user_id: i32,
    pub height_cm: Option<f64>,
    pub religion: Option<String>,
    pub caste: Option<String>,
    pub education: Option<String>,
    pub occupation: Option<String>,
    pub marital_status: Option<String>,
    pub mother_tongue: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub about: Option<String>,
    pub photo_url: Option<String>,
    pub rasi: Option<String>,
    pub nakshatra: Option<String>,
    pub gothram: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Editable matrimony attributes. `None` leaves a column untouched on update.
#[derive(Debug, Clone, Default, Deserialize, Serialize, AsChangeset, Insertable)]
#[diesel(table_name = profiles)]
pub struct ProfileFields {
    pub height_cm: Option<f64>,
    pub religion: Option<String>,
    pub caste: Option<String>,
    pub education: Option<String>,
    pub occupation: Option<String>,
    pub marital_status: Option<String>,
    pub mother_tongue: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub about: Option<String>,
    pub photo_url: Option<String>,
    pub rasi: Option<String>,
    pub nakshatra: Option<String>,
    pub gothram: Option<String>,
}

impl ProfileFields {
    pub fn is_empty(&self) -> bool {
        self.height_cm.is_none()
            && [
                &self.religion,
                &self.caste,
                &self.education,
                &self.occupation,
                &self.marital_status,
                &self.mother_tongue,
                &self.city,
                &self.state,
                &self.country,
                &self.address,
                &self.about,
                &self.photo_url,
                &self.rasi,
                &self.nakshatra,
                &self.gothram,
            ]
            .iter()
            .all(|f| f.is_none())
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = profiles)]
pub struct NewProfile {
    pub user_id: i32,
    #[diesel(embed)]
    pub fields: ProfileFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_are_detected() {
        assert!(ProfileFields::default().is_empty());
        let fields = ProfileFields {
            city: Some("Chennai".into()),
            ..Default::default()
        };
        assert!(!fields.is_empty());
    }
}
