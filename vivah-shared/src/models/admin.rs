use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::admins;
use crate::types::auth::UserRole;

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = admins)]
pub struct Admin {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: NaiveDateTime,
}

impl Admin {
    /// Unknown role text degrades to the plain admin tier.
    pub fn role(&self) -> UserRole {
        match self.role.parse::<UserRole>() {
            Ok(UserRole::SuperAdmin) => UserRole::SuperAdmin,
            _ => UserRole::Admin,
        }
    }
}
