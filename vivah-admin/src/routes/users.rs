use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use diesel::mysql::{Mysql, MysqlConnection};
use diesel::prelude::*;
use serde::Deserialize;
use validator::Validate;

use vivah_matching::Gender;
use vivah_shared::clients::db;
use vivah_shared::errors::{AppError, AppResult, ErrorCode};
use vivah_shared::middleware::AdminUser;
use vivah_shared::models::{
    ensure_phone_free, MembershipPlan, NewProfile, NewUser, PaymentStatus, ProfileFields, User,
    UserChanges, UserWithProfile,
};
use vivah_shared::schema::{membership_plans, profiles, users};
use vivah_shared::security::{hash_password, validate_password};
use vivah_shared::types::api::ApiResponse;
use vivah_shared::types::pagination::{Paginated, PaginationParams};
use vivah_shared::validation::{validate_age, validate_phone};

use crate::services::bulk::{run_each, BulkOutcome};
use crate::services::{membership, users as user_service};
use crate::AppState;

// --- Request types ---

#[derive(Debug, Deserialize)]
pub struct UserListParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
    pub search: Option<String>,
    pub gender: Option<String>,
    pub payment_status: Option<String>,
    pub is_approved: Option<bool>,
}

fn default_page() -> i64 { 1 }
fn default_per_page() -> i64 { 20 }

impl UserListParams {
    fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    pub age: Option<i32>,
    pub gender: String,
    pub password: Option<String>,
    pub payment_status: Option<String>,
    pub is_approved: Option<bool>,
    #[serde(flatten)]
    pub profile: ProfileFields,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(flatten)]
    pub user: UserChanges,
    #[serde(flatten)]
    pub profile: ProfileFields,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub payment_status: String,
}

#[derive(Debug, Deserialize)]
pub struct ApprovalRequest {
    pub is_approved: bool,
}

#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct MembershipRequest {
    pub plan_id: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkDeleteRequest {
    #[validate(length(min = 1, message = "no users selected"))]
    pub user_ids: Vec<i32>,
}

fn parse_gender(raw: &str) -> AppResult<Gender> {
    raw.parse::<Gender>().map_err(AppError::Validation)
}

fn parse_payment(raw: &str) -> AppResult<PaymentStatus> {
    raw.parse::<PaymentStatus>().map_err(AppError::Validation)
}

/// `LIKE` pattern matching `term` literally anywhere in the column.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn filtered(params: &UserListParams) -> users::BoxedQuery<'static, Mysql> {
    let mut query = users::table.into_boxed();
    if let Some(term) = params.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = contains_pattern(term);
        query = query.filter(
            users::first_name
                .like(pattern.clone())
                .or(users::last_name.like(pattern.clone()))
                .or(users::phone.like(pattern)),
        );
    }
    if let Some(gender) = params.gender.as_deref().and_then(|g| g.parse::<Gender>().ok()) {
        query = query.filter(users::gender.eq(gender.as_str()));
    }
    if let Some(status) = params.payment_status.as_deref().and_then(|s| s.parse::<PaymentStatus>().ok()) {
        query = query.filter(users::payment_status.eq(status.as_str()));
    }
    if let Some(approved) = params.is_approved {
        query = query.filter(users::is_approved.eq(approved));
    }
    query
}

fn touch_user(conn: &mut MysqlConnection, user_id: i32) -> AppResult<()> {
    let updated = diesel::update(users::table.find(user_id))
        .set(users::updated_at.eq(Utc::now().naive_utc()))
        .execute(conn)?;
    if updated == 0 {
        return Err(AppError::new(ErrorCode::UserNotFound, format!("user {user_id} not found")));
    }
    Ok(())
}

// --- List users (paginated, filtered) ---

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(params): Query<UserListParams>,
) -> AppResult<Json<ApiResponse<Paginated<User>>>> {
    let mut conn = db::conn(&state.db)?;
    let pagination = params.pagination();

    let total: i64 = filtered(&params).count().get_result(&mut conn)?;
    let items = filtered(&params)
        .order(users::created_at.desc())
        .offset(pagination.offset())
        .limit(pagination.limit())
        .load::<User>(&mut conn)?;

    Ok(Json(ApiResponse::ok(Paginated::new(items, total, &pagination))))
}

pub async fn list_approved(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<Vec<User>>>> {
    let mut conn = db::conn(&state.db)?;
    let items = users::table
        .filter(users::is_approved.eq(true))
        .order((users::first_name.asc(), users::last_name.asc()))
        .load::<User>(&mut conn)?;
    Ok(Json(ApiResponse::ok(items)))
}

/// Accounts that can already sign in to the member app.
pub async fn list_with_passwords(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<Vec<User>>>> {
    let mut conn = db::conn(&state.db)?;
    let items = users::table
        .filter(users::password_hash.is_not_null().and(users::password_hash.ne("")))
        .order(users::first_name.asc())
        .load::<User>(&mut conn)?;
    Ok(Json(ApiResponse::ok(items)))
}

/// Paid accounts still waiting for credentials.
pub async fn list_paid_without_password(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<Vec<User>>>> {
    let mut conn = db::conn(&state.db)?;
    let items = users::table
        .filter(users::payment_status.eq(PaymentStatus::Paid.as_str()))
        .filter(users::password_hash.is_null().or(users::password_hash.eq("")))
        .order(users::first_name.asc())
        .load::<User>(&mut conn)?;
    Ok(Json(ApiResponse::ok(items)))
}

// --- Create user with profile ---

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<Json<ApiResponse<UserWithProfile>>> {
    req.validate()?;
    let phone = validate_phone(&req.phone)?;
    if let Some(age) = req.age {
        validate_age(age)?;
    }
    let gender = parse_gender(&req.gender)?;
    let payment_status = match req.payment_status.as_deref() {
        Some(raw) => parse_payment(raw)?,
        None => PaymentStatus::Unpaid,
    };
    let password_hash = match req.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => {
            validate_password(password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let mut conn = db::conn(&state.db)?;
    let user_id = conn.transaction::<_, AppError, _>(|conn| {
        ensure_phone_free(conn, &phone, None)?;
        diesel::insert_into(users::table)
            .values(&NewUser {
                first_name: req.first_name.trim().to_string(),
                last_name: req.last_name.trim().to_string(),
                phone: phone.clone(),
                email: req.email.clone(),
                age: req.age,
                gender: gender.as_str().to_string(),
                password_hash,
                payment_status: payment_status.as_str().to_string(),
                is_approved: req.is_approved.unwrap_or(false),
            })
            .execute(conn)?;
        let user_id = db::inserted_id(conn)?;
        diesel::insert_into(profiles::table)
            .values(&NewProfile { user_id, fields: req.profile.clone() })
            .execute(conn)?;
        Ok(user_id)
    })?;

    let created = UserWithProfile::find(&mut conn, user_id)?;
    tracing::info!(user_id, admin_id = admin.id, "user created");
    Ok(Json(ApiResponse::ok_with_message(created, "user created")))
}

// --- Single user ---

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<ApiResponse<UserWithProfile>>> {
    let mut conn = db::conn(&state.db)?;
    Ok(Json(ApiResponse::ok(UserWithProfile::find(&mut conn, user_id)?)))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i32>,
    Json(req): Json<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<UserWithProfile>>> {
    let mut changes = req.user;
    if let Some(phone) = changes.phone.as_deref() {
        changes.phone = Some(validate_phone(phone)?);
    }
    if let Some(age) = changes.age {
        validate_age(age)?;
    }
    if let Some(gender) = changes.gender.as_deref() {
        changes.gender = Some(parse_gender(gender)?.as_str().to_string());
    }
    if let Some(status) = changes.payment_status.as_deref() {
        changes.payment_status = Some(parse_payment(status)?.as_str().to_string());
    }
    if changes.first_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::Validation("first name is required".into()));
    }

    let mut conn = db::conn(&state.db)?;
    let existing = UserWithProfile::find(&mut conn, user_id)?;
    let now = Utc::now().naive_utc();

    conn.transaction::<_, AppError, _>(|conn| {
        if let Some(phone) = changes.phone.as_deref() {
            ensure_phone_free(conn, phone, Some(user_id))?;
        }
        diesel::update(users::table.find(user_id))
            .set((&changes, users::updated_at.eq(now)))
            .execute(conn)?;

        if !req.profile.is_empty() {
            if existing.profile.is_some() {
                diesel::update(profiles::table.filter(profiles::user_id.eq(user_id)))
                    .set((&req.profile, profiles::updated_at.eq(now)))
                    .execute(conn)?;
            } else {
                diesel::insert_into(profiles::table)
                    .values(&NewProfile { user_id, fields: req.profile.clone() })
                    .execute(conn)?;
            }
        }
        Ok(())
    })?;

    let updated = UserWithProfile::find(&mut conn, user_id)?;
    tracing::info!(user_id, admin_id = admin.id, "user updated");
    Ok(Json(ApiResponse::ok_with_message(updated, "user updated")))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    let mut conn = db::conn(&state.db)?;
    if !user_service::delete_user_cascade(&mut conn, user_id)? {
        return Err(AppError::new(ErrorCode::UserNotFound, format!("user {user_id} not found")));
    }
    tracing::info!(user_id, admin_id = admin.id, "user deleted");
    Ok(Json(ApiResponse::ok_with_message((), "user deleted")))
}

// --- Account flags ---

pub async fn set_payment_status(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i32>,
    Json(req): Json<PaymentRequest>,
) -> AppResult<Json<ApiResponse<UserWithProfile>>> {
    let status = parse_payment(&req.payment_status)?;
    let mut conn = db::conn(&state.db)?;

    touch_user(&mut conn, user_id)?;
    diesel::update(users::table.find(user_id))
        .set(users::payment_status.eq(status.as_str()))
        .execute(&mut conn)?;

    tracing::info!(user_id, admin_id = admin.id, status = %status, "payment status changed");
    Ok(Json(ApiResponse::ok(UserWithProfile::find(&mut conn, user_id)?)))
}

pub async fn set_approval(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i32>,
    Json(req): Json<ApprovalRequest>,
) -> AppResult<Json<ApiResponse<UserWithProfile>>> {
    let mut conn = db::conn(&state.db)?;

    touch_user(&mut conn, user_id)?;
    diesel::update(users::table.find(user_id))
        .set(users::is_approved.eq(req.is_approved))
        .execute(&mut conn)?;

    tracing::info!(user_id, admin_id = admin.id, approved = req.is_approved, "approval changed");
    Ok(Json(ApiResponse::ok(UserWithProfile::find(&mut conn, user_id)?)))
}

pub async fn set_password(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i32>,
    Json(req): Json<PasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    validate_password(&req.password)?;
    let hash = hash_password(&req.password)?;
    let mut conn = db::conn(&state.db)?;

    touch_user(&mut conn, user_id)?;
    diesel::update(users::table.find(user_id))
        .set(users::password_hash.eq(Some(hash)))
        .execute(&mut conn)?;

    tracing::info!(user_id, admin_id = admin.id, "member password set");
    Ok(Json(ApiResponse::ok_with_message((), "password updated")))
}

// --- Membership ---

pub async fn assign_membership(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i32>,
    Json(req): Json<MembershipRequest>,
) -> AppResult<Json<ApiResponse<UserWithProfile>>> {
    let mut conn = db::conn(&state.db)?;

    let plan = membership_plans::table
        .find(req.plan_id)
        .first::<MembershipPlan>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::PlanNotFound, format!("plan {} not found", req.plan_id)))?;
    if !plan.is_active {
        return Err(AppError::new(ErrorCode::PlanInactive, format!("plan '{}' is inactive", plan.name)));
    }
    let expiry = membership::expiry_for(&plan, Utc::now().date_naive())?;

    touch_user(&mut conn, user_id)?;
    diesel::update(users::table.find(user_id))
        .set((
            users::membership_type.eq(Some(plan.name.clone())),
            users::membership_expiry.eq(Some(expiry)),
            users::interested_membership.eq(None::<String>),
        ))
        .execute(&mut conn)?;

    tracing::info!(user_id, admin_id = admin.id, plan = %plan.name, %expiry, "membership assigned");
    Ok(Json(ApiResponse::ok(UserWithProfile::find(&mut conn, user_id)?)))
}

pub async fn revoke_membership(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<ApiResponse<UserWithProfile>>> {
    let mut conn = db::conn(&state.db)?;

    touch_user(&mut conn, user_id)?;
    diesel::update(users::table.find(user_id))
        .set((
            users::membership_type.eq(None::<String>),
            users::membership_expiry.eq(None::<chrono::NaiveDate>),
        ))
        .execute(&mut conn)?;

    tracing::info!(user_id, admin_id = admin.id, "membership revoked");
    Ok(Json(ApiResponse::ok(UserWithProfile::find(&mut conn, user_id)?)))
}

// --- Bulk delete ---

pub async fn bulk_delete(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(req): Json<BulkDeleteRequest>,
) -> AppResult<Json<ApiResponse<BulkOutcome>>> {
    req.validate()?;
    let mut conn = db::conn(&state.db)?;

    let outcome = run_each(&req.user_ids, |id| user_service::delete_user_cascade(&mut conn, id));

    tracing::info!(
        admin_id = admin.id,
        deleted = outcome.deleted,
        failed = outcome.failed,
        "bulk delete finished"
    );
    let message = format!("{} deleted, {} failed", outcome.deleted, outcome.failed);
    Ok(Json(ApiResponse::ok_with_message(outcome, message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_wildcards_are_escaped() {
        assert_eq!(contains_pattern("lakshmi"), "%lakshmi%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }
}
