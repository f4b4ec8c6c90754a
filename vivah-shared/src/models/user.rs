use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use diesel::mysql::MysqlConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use vivah_matching::{Gender, MatchProfile};

use super::Profile;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::schema::{profiles, users};

text_enum!(PaymentStatus {
    Paid => "paid",
    Unpaid => "unpaid",
});

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub gender: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub payment_status: String,
    pub is_approved: bool,
    pub membership_type: Option<String>,
    pub membership_expiry: Option<NaiveDate>,
    pub interested_membership: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    pub fn has_password(&self) -> bool {
        self.password_hash.as_deref().is_some_and(|h| !h.is_empty())
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status.parse::<PaymentStatus>() == Ok(PaymentStatus::Paid)
    }

    /// A membership with no expiry date never lapses.
    pub fn membership_active(&self, today: NaiveDate) -> bool {
        self.membership_type.is_some() && self.membership_expiry.map_or(true, |exp| exp >= today)
    }

    pub fn gender(&self) -> Gender {
        self.gender.parse().unwrap_or(Gender::Other)
    }

    pub fn match_profile(&self, profile: Option<&Profile>) -> MatchProfile {
        let mut record = MatchProfile {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            age: self.age,
            ..MatchProfile::new(self.id, self.gender())
        };
        if let Some(p) = profile {
            record.height_cm = p.height_cm;
            record.religion = p.religion.clone();
            record.caste = p.caste.clone();
            record.education = p.education.clone();
            record.occupation = p.occupation.clone();
            record.marital_status = p.marital_status.clone();
            record.mother_tongue = p.mother_tongue.clone();
            record.city = p.city.clone();
            record.state = p.state.clone();
        }
        record
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub gender: String,
    pub password_hash: Option<String>,
    pub payment_status: String,
    pub is_approved: bool,
}

/// Account columns an admin may overwrite. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, Deserialize, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub payment_status: Option<String>,
    pub is_approved: Option<bool>,
    pub interested_membership: Option<String>,
}

/// User row joined with its (optional) profile row.
#[derive(Debug, Clone, Serialize)]
pub struct UserWithProfile {
    #[serde(flatten)]
    pub user: User,
    pub profile: Option<Profile>,
}

impl UserWithProfile {
    pub fn match_profile(&self) -> MatchProfile {
        self.user.match_profile(self.profile.as_ref())
    }
}

impl From<(User, Option<Profile>)> for UserWithProfile {
    fn from((user, profile): (User, Option<Profile>)) -> Self {
        Self { user, profile }
    }
}

// --- Queries ---

impl UserWithProfile {
    pub fn find(conn: &mut MysqlConnection, user_id: i32) -> AppResult<Self> {
        users::table
            .left_join(profiles::table)
            .filter(users::id.eq(user_id))
            .first::<(User, Option<Profile>)>(conn)
            .optional()?
            .map(Self::from)
            .ok_or_else(|| AppError::new(ErrorCode::UserNotFound, format!("user {user_id} not found")))
    }

    /// Approved accounts in id order, the pool matchmaking draws from.
    pub fn approved(conn: &mut MysqlConnection) -> AppResult<Vec<Self>> {
        let rows = users::table
            .left_join(profiles::table)
            .filter(users::is_approved.eq(true))
            .order(users::id.asc())
            .load::<(User, Option<Profile>)>(conn)?;
        Ok(rows.into_iter().map(Self::from).collect())
    }
}

/// "First Last" keyed by user id, for decorating listings.
pub fn display_names(conn: &mut MysqlConnection, ids: &[i32]) -> AppResult<HashMap<i32, String>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = users::table
        .filter(users::id.eq_any(ids))
        .select((users::id, users::first_name, users::last_name))
        .load::<(i32, String, String)>(conn)?;
    Ok(rows
        .into_iter()
        .map(|(id, first, last)| (id, format!("{first} {last}").trim().to_string()))
        .collect())
}

/// Fails with `PhoneAlreadyRegistered` if another account (other than `except`) owns `phone`.
pub fn ensure_phone_free(conn: &mut MysqlConnection, phone: &str, except: Option<i32>) -> AppResult<()> {
    let mut query = users::table.filter(users::phone.eq(phone)).select(users::id).into_boxed();
    if let Some(id) = except {
        query = query.filter(users::id.ne(id));
    }
    if query.first::<i32>(conn).optional()?.is_some() {
        return Err(AppError::new(ErrorCode::PhoneAlreadyRegistered, "phone number already registered"));
    }
    Ok(())
}
