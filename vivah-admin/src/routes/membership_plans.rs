use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use diesel::mysql::MysqlConnection;
use diesel::prelude::*;

use vivah_shared::clients::db;
use vivah_shared::errors::{AppError, AppResult, ErrorCode};
use vivah_shared::middleware::AdminUser;
use vivah_shared::models::{
    encode_features, MembershipPlan, MembershipPlanChanges, MembershipPlanInput, NewMembershipPlan,
};
use vivah_shared::schema::membership_plans;
use vivah_shared::types::api::ApiResponse;

use crate::AppState;

fn check_numbers(input: &MembershipPlanInput) -> AppResult<()> {
    if input.price.is_some_and(|p| !p.is_finite() || p < 0.0) {
        return Err(AppError::Validation("price must be zero or more".into()));
    }
    if input.duration_months.is_some_and(|m| m < 1) {
        return Err(AppError::Validation("duration must be at least one month".into()));
    }
    if input.profile_views_limit.is_some_and(|l| l < 0) {
        return Err(AppError::Validation("profile view limit cannot be negative".into()));
    }
    Ok(())
}

fn find_plan(conn: &mut MysqlConnection, plan_id: i32) -> AppResult<MembershipPlan> {
    membership_plans::table
        .find(plan_id)
        .first::<MembershipPlan>(conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::PlanNotFound, format!("plan {plan_id} not found")))
}

pub async fn list_plans(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<Vec<MembershipPlan>>>> {
    let mut conn = db::conn(&state.db)?;
    let plans = membership_plans::table
        .order((membership_plans::price.asc(), membership_plans::id.asc()))
        .load::<MembershipPlan>(&mut conn)?;
    Ok(Json(ApiResponse::ok(plans)))
}

pub async fn get_plan(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(plan_id): Path<i32>,
) -> AppResult<Json<ApiResponse<MembershipPlan>>> {
    let mut conn = db::conn(&state.db)?;
    Ok(Json(ApiResponse::ok(find_plan(&mut conn, plan_id)?)))
}

pub async fn create_plan(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(input): Json<MembershipPlanInput>,
) -> AppResult<Json<ApiResponse<MembershipPlan>>> {
    check_numbers(&input)?;
    let name = input
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::Validation("plan name is required".into()))?
        .to_string();
    let price = input
        .price
        .ok_or_else(|| AppError::Validation("price is required".into()))?;
    let duration_months = input
        .duration_months
        .ok_or_else(|| AppError::Validation("duration_months is required".into()))?;

    let mut conn = db::conn(&state.db)?;
    let plan_id = conn.transaction::<_, AppError, _>(|conn| {
        diesel::insert_into(membership_plans::table)
            .values(&NewMembershipPlan {
                name,
                price,
                duration_months,
                profile_views_limit: input.profile_views_limit,
                features: encode_features(input.features.as_deref().unwrap_or_default()),
                color: input.color.clone(),
                is_active: input.is_active.unwrap_or(true),
            })
            .execute(conn)?;
        db::inserted_id(conn)
    })?;

    let plan = find_plan(&mut conn, plan_id)?;
    tracing::info!(plan_id, name = %plan.name, admin_id = admin.id, "membership plan created");
    Ok(Json(ApiResponse::ok_with_message(plan, "plan created")))
}

pub async fn update_plan(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(plan_id): Path<i32>,
    Json(input): Json<MembershipPlanInput>,
) -> AppResult<Json<ApiResponse<MembershipPlan>>> {
    check_numbers(&input)?;
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::Validation("plan name is required".into()));
    }

    let mut conn = db::conn(&state.db)?;
    find_plan(&mut conn, plan_id)?;

    let changes = MembershipPlanChanges {
        name: input.name.map(|n| n.trim().to_string()),
        price: input.price,
        duration_months: input.duration_months,
        profile_views_limit: input.profile_views_limit,
        features: input.features.as_deref().map(encode_features),
        color: input.color,
        is_active: input.is_active,
        updated_at: Some(Utc::now().naive_utc()),
    };
    diesel::update(membership_plans::table.find(plan_id))
        .set(&changes)
        .execute(&mut conn)?;

    let plan = find_plan(&mut conn, plan_id)?;
    tracing::info!(plan_id, admin_id = admin.id, "membership plan updated");
    Ok(Json(ApiResponse::ok_with_message(plan, "plan updated")))
}

pub async fn delete_plan(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(plan_id): Path<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    let mut conn = db::conn(&state.db)?;
    let removed = diesel::delete(membership_plans::table.find(plan_id)).execute(&mut conn)?;
    if removed == 0 {
        return Err(AppError::new(ErrorCode::PlanNotFound, format!("plan {plan_id} not found")));
    }
    tracing::info!(plan_id, admin_id = admin.id, "membership plan deleted");
    Ok(Json(ApiResponse::ok_with_message((), "plan deleted")))
}

/// Flips `is_active`; inactive plans are hidden from members.
pub async fn toggle_plan(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(plan_id): Path<i32>,
) -> AppResult<Json<ApiResponse<MembershipPlan>>> {
    let mut conn = db::conn(&state.db)?;
    let plan = find_plan(&mut conn, plan_id)?;

    diesel::update(membership_plans::table.find(plan_id))
        .set((
            membership_plans::is_active.eq(!plan.is_active),
            membership_plans::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

    let plan = find_plan(&mut conn, plan_id)?;
    tracing::info!(plan_id, active = plan.is_active, admin_id = admin.id, "membership plan toggled");
    Ok(Json(ApiResponse::ok(plan)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> MembershipPlanInput {
        MembershipPlanInput {
            name: Some("Gold".into()),
            price: Some(4999.0),
            duration_months: Some(6),
            profile_views_limit: Some(100),
            features: None,
            color: None,
            is_active: None,
        }
    }

    #[test]
    fn plan_numbers_are_checked() {
        assert!(check_numbers(&input()).is_ok());
        assert!(check_numbers(&MembershipPlanInput { price: Some(-1.0), ..input() }).is_err());
        assert!(check_numbers(&MembershipPlanInput { duration_months: Some(0), ..input() }).is_err());
        assert!(check_numbers(&MembershipPlanInput { profile_views_limit: Some(-5), ..input() }).is_err());
    }
}
