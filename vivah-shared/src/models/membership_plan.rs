use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize, Serializer};

use crate::schema::membership_plans;

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = membership_plans)]
pub struct MembershipPlan {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub duration_months: i32,
    pub profile_views_limit: Option<i32>,
    #[serde(serialize_with = "serialize_features")]
    pub features: String,
    pub color: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl MembershipPlan {
    pub fn feature_list(&self) -> Vec<String> {
        decode_features(&self.features)
    }
}

/// Features are stored as a JSON array in a TEXT column; garbage reads as no features.
pub fn decode_features(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

pub fn encode_features(features: &[String]) -> String {
    serde_json::to_string(features).unwrap_or_else(|_| "[]".to_string())
}

#[allow(clippy::ptr_arg)]
fn serialize_features<S: Serializer>(raw: &String, serializer: S) -> Result<S::Ok, S::Error> {
    decode_features(raw).serialize(serializer)
}

#[derive(Debug, Insertable)]
#[diesel(table_name = membership_plans)]
pub struct NewMembershipPlan {
    pub name: String,
    pub price: f64,
    pub duration_months: i32,
    pub profile_views_limit: Option<i32>,
    pub features: String,
    pub color: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = membership_plans)]
pub struct MembershipPlanChanges {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub duration_months: Option<i32>,
    pub profile_views_limit: Option<i32>,
    pub features: Option<String>,
    pub color: Option<String>,
    pub is_active: Option<bool>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Request body shared by create and update; `features` travels as a list.
#[derive(Debug, Clone, Deserialize)]
pub struct MembershipPlanInput {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub duration_months: Option<i32>,
    pub profile_views_limit: Option<i32>,
    pub features: Option<Vec<String>>,
    pub color: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn features_serialize_as_a_list() {
        let plan = MembershipPlan {
            id: 1,
            name: "Gold".into(),
            price: 4999.0,
            duration_months: 6,
            profile_views_limit: Some(100),
            features: encode_features(&["Chat".into(), "Horoscope match".into()]),
            color: Some("#d4af37".into()),
            is_active: true,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        };
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["features"], serde_json::json!(["Chat", "Horoscope match"]));
        assert_eq!(plan.feature_list().len(), 2);
    }

    #[test]
    fn malformed_features_read_as_empty() {
        assert!(decode_features("not json").is_empty());
    }
}
