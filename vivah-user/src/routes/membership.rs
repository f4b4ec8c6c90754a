use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use diesel::mysql::MysqlConnection;
use diesel::prelude::*;
use serde::Deserialize;

use vivah_shared::clients::db;
use vivah_shared::errors::{AppError, AppResult, ErrorCode};
use vivah_shared::middleware::MemberUser;
use vivah_shared::models::{MembershipPlan, UserWithProfile};
use vivah_shared::schema::{membership_plans, users};
use vivah_shared::settings::{self, defaults, module_enabled, SettingKey, MEMBERSHIP_MODULE};
use vivah_shared::types::api::ApiResponse;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MembershipInterestRequest {
    pub plan_id: i32,
}

fn membership_on(conn: &mut MysqlConnection) -> AppResult<bool> {
    let modules = settings::load(conn, SettingKey::Modules, defaults::modules)?;
    Ok(module_enabled(&modules, MEMBERSHIP_MODULE))
}

/// Active plans, cheapest first. Empty while the membership module is off.
pub async fn list_plans(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<MembershipPlan>>>> {
    let mut conn = db::conn(&state.db)?;
    if !membership_on(&mut conn)? {
        return Ok(Json(ApiResponse::ok(Vec::new())));
    }
    let plans = membership_plans::table
        .filter(membership_plans::is_active.eq(true))
        .order((membership_plans::price.asc(), membership_plans::id.asc()))
        .load::<MembershipPlan>(&mut conn)?;
    Ok(Json(ApiResponse::ok(plans)))
}

/// Records which plan the member wants; an admin assigns it after payment.
pub async fn register_interest(
    State(state): State<Arc<AppState>>,
    MemberUser(me): MemberUser,
    Json(req): Json<MembershipInterestRequest>,
) -> AppResult<Json<ApiResponse<UserWithProfile>>> {
    let mut conn = db::conn(&state.db)?;
    if !membership_on(&mut conn)? {
        return Err(AppError::new(ErrorCode::MembershipModuleDisabled, "membership is not available"));
    }

    let plan = membership_plans::table
        .find(req.plan_id)
        .first::<MembershipPlan>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::PlanNotFound, format!("plan {} not found", req.plan_id)))?;
    if !plan.is_active {
        return Err(AppError::new(ErrorCode::PlanInactive, format!("plan '{}' is inactive", plan.name)));
    }

    diesel::update(users::table.find(me.id))
        .set((
            users::interested_membership.eq(Some(plan.name.clone())),
            users::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

    tracing::info!(user_id = me.id, plan = %plan.name, "membership interest recorded");
    Ok(Json(ApiResponse::ok_with_message(
        UserWithProfile::find(&mut conn, me.id)?,
        "interest recorded, our team will contact you",
    )))
}
