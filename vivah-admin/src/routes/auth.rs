use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use serde::Deserialize;
use validator::Validate;

use vivah_shared::clients::db;
use vivah_shared::errors::{AppError, AppResult, ErrorCode};
use vivah_shared::models::Admin;
use vivah_shared::schema::admins;
use vivah_shared::security::{issue_access_token, verify_password};
use vivah_shared::types::api::ApiResponse;
use vivah_shared::types::auth::{AccessToken, UserRole};

use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct AdminLoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

fn authenticate(state: &AppState, req: &AdminLoginRequest) -> AppResult<Admin> {
    let mut conn = db::conn(&state.db)?;

    let admin = admins::table
        .filter(admins::username.eq(req.username.trim()))
        .first::<Admin>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCredentials, "invalid username or password"))?;

    if !verify_password(&req.password, &admin.password_hash)? {
        tracing::warn!(username = %admin.username, "admin login rejected");
        return Err(AppError::new(ErrorCode::InvalidCredentials, "invalid username or password"));
    }
    Ok(admin)
}

fn token_for(state: &AppState, admin: &Admin) -> AppResult<AccessToken> {
    issue_access_token(admin.id, admin.role(), &state.config.jwt_secret, state.config.jwt_ttl_secs)
}

// --- Admin panel login (admin or superadmin) ---

pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AdminLoginRequest>,
) -> AppResult<Json<ApiResponse<AccessToken>>> {
    req.validate()?;
    let admin = authenticate(&state, &req)?;
    let token = token_for(&state, &admin)?;

    tracing::info!(admin_id = admin.id, role = %admin.role(), "admin logged in");
    Ok(Json(ApiResponse::ok(token)))
}

// --- Superadmin console login ---

pub async fn superadmin_login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AdminLoginRequest>,
) -> AppResult<Json<ApiResponse<AccessToken>>> {
    req.validate()?;
    let admin = authenticate(&state, &req)?;
    if admin.role() != UserRole::SuperAdmin {
        return Err(AppError::forbidden("superadmin access required"));
    }
    let token = token_for(&state, &admin)?;

    tracing::info!(admin_id = admin.id, "superadmin logged in");
    Ok(Json(ApiResponse::ok(token)))
}
