use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use diesel::prelude::*;
use serde::Deserialize;
use validator::Validate;

use vivah_shared::clients::db;
use vivah_shared::errors::{AppError, AppResult};
use vivah_shared::middleware::MemberUser;
use vivah_shared::models::{NewProfile, ProfileFields, UserWithProfile};
use vivah_shared::schema::{profiles, users};
use vivah_shared::types::api::ApiResponse;
use vivah_shared::validation::validate_age;

use crate::AppState;

/// Account fields a member may edit on their own. Phone, payment, approval
/// and membership stay admin-controlled.
#[derive(Debug, Default, Deserialize, Validate, AsChangeset)]
#[diesel(table_name = users)]
pub struct SelfChanges {
    #[validate(length(min = 1, message = "first name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "last name cannot be empty"))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub age: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMeRequest {
    #[serde(flatten)]
    pub account: SelfChanges,
    #[serde(flatten)]
    pub profile: ProfileFields,
}

pub async fn get_me(
    State(state): State<Arc<AppState>>,
    MemberUser(me): MemberUser,
) -> AppResult<Json<ApiResponse<UserWithProfile>>> {
    let mut conn = db::conn(&state.db)?;
    Ok(Json(ApiResponse::ok(UserWithProfile::find(&mut conn, me.id)?)))
}

pub async fn update_me(
    State(state): State<Arc<AppState>>,
    MemberUser(me): MemberUser,
    Json(req): Json<UpdateMeRequest>,
) -> AppResult<Json<ApiResponse<UserWithProfile>>> {
    req.account.validate()?;
    if let Some(age) = req.account.age {
        validate_age(age)?;
    }

    let mut conn = db::conn(&state.db)?;
    let existing = UserWithProfile::find(&mut conn, me.id)?;
    let now = Utc::now().naive_utc();

    conn.transaction::<_, AppError, _>(|conn| {
        diesel::update(users::table.find(me.id))
            .set((&req.account, users::updated_at.eq(now)))
            .execute(conn)?;
        if !req.profile.is_empty() {
            if existing.profile.is_some() {
                diesel::update(profiles::table.filter(profiles::user_id.eq(me.id)))
                    .set((&req.profile, profiles::updated_at.eq(now)))
                    .execute(conn)?;
            } else {
                diesel::insert_into(profiles::table)
                    .values(&NewProfile { user_id: me.id, fields: req.profile.clone() })
                    .execute(conn)?;
            }
        }
        Ok(())
    })?;

    tracing::info!(user_id = me.id, "member updated own profile");
    Ok(Json(ApiResponse::ok(UserWithProfile::find(&mut conn, me.id)?)))
}
