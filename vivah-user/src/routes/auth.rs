use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use vivah_matching::Gender;
use vivah_shared::clients::db;
use vivah_shared::errors::{AppError, AppResult, ErrorCode};
use vivah_shared::models::{
    ensure_phone_free, NewProfile, NewUser, PaymentStatus, ProfileFields, User, UserWithProfile,
};
use vivah_shared::schema::{profiles, users};
use vivah_shared::security::{hash_password, issue_access_token, validate_password};
use vivah_shared::types::api::ApiResponse;
use vivah_shared::types::auth::{AccessToken, UserRole};
use vivah_shared::validation::{normalize_phone, validate_age, validate_phone};

use crate::services::accounts::check_login;
use crate::AppState;

// --- Request / Response types ---

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    pub age: i32,
    pub gender: String,
    pub password: String,
    #[serde(flatten)]
    pub profile: ProfileFields,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub token: AccessToken,
    pub user: User,
}

// --- Register ---

/// New accounts start unpaid and unapproved; an admin has to approve them
/// before the first login.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<UserWithProfile>>> {
    req.validate()?;
    let phone = validate_phone(&req.phone)?;
    validate_age(req.age)?;
    validate_password(&req.password)?;
    let gender = req.gender.parse::<Gender>().map_err(AppError::Validation)?;
    let password_hash = hash_password(&req.password)?;

    let mut conn = db::conn(&state.db)?;
    let user_id = conn.transaction::<_, AppError, _>(|conn| {
        ensure_phone_free(conn, &phone, None)?;
        diesel::insert_into(users::table)
            .values(&NewUser {
                first_name: req.first_name.trim().to_string(),
                last_name: req.last_name.trim().to_string(),
                phone: phone.clone(),
                email: req.email.clone(),
                age: Some(req.age),
                gender: gender.as_str().to_string(),
                password_hash: Some(password_hash),
                payment_status: PaymentStatus::Unpaid.as_str().to_string(),
                is_approved: false,
            })
            .execute(conn)?;
        let user_id = db::inserted_id(conn)?;
        diesel::insert_into(profiles::table)
            .values(&NewProfile { user_id, fields: req.profile.clone() })
            .execute(conn)?;
        Ok(user_id)
    })?;

    let created = UserWithProfile::find(&mut conn, user_id)?;
    tracing::info!(user_id, "member registered");
    Ok(Json(ApiResponse::ok_with_message(
        created,
        "registration received, awaiting admin approval",
    )))
}

// --- Login ---

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    req.validate()?;
    let phone = normalize_phone(&req.phone);

    let mut conn = db::conn(&state.db)?;
    let user = users::table
        .filter(users::phone.eq(&phone))
        .first::<User>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCredentials, "invalid phone or password"))?;

    if let Err(e) = check_login(&user, &req.password) {
        tracing::warn!(user_id = user.id, error = %e, "member login rejected");
        return Err(e);
    }

    let token = issue_access_token(user.id, UserRole::User, &state.config.jwt_secret, state.config.jwt_ttl_secs)?;
    tracing::info!(user_id = user.id, "member logged in");
    Ok(Json(ApiResponse::ok(LoginResponse { token, user })))
}
