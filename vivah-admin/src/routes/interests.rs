use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use diesel::mysql::{Mysql, MysqlConnection};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use vivah_shared::clients::db;
use vivah_shared::errors::{AppError, AppResult};
use vivah_shared::middleware::AdminUser;
use vivah_shared::models::{display_names, Interest, InterestStatus, UserWithProfile};
use vivah_shared::schema::interests;
use vivah_shared::types::api::ApiResponse;
use vivah_shared::types::pagination::{Paginated, PaginationParams};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct InterestListParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
    pub status: Option<String>,
}

fn default_page() -> i64 { 1 }
fn default_per_page() -> i64 { 20 }

#[derive(Debug, Serialize)]
pub struct InterestView {
    #[serde(flatten)]
    pub interest: Interest,
    pub sender_name: Option<String>,
    pub receiver_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserInterests {
    pub user_id: i32,
    pub sent: Vec<InterestView>,
    pub received: Vec<InterestView>,
}

fn decorate(conn: &mut MysqlConnection, rows: Vec<Interest>) -> AppResult<Vec<InterestView>> {
    let ids: Vec<i32> = rows.iter().flat_map(|i| [i.sender_id, i.receiver_id]).collect();
    let names = display_names(conn, &ids)?;
    Ok(rows
        .into_iter()
        .map(|i| InterestView {
            sender_name: names.get(&i.sender_id).cloned(),
            receiver_name: names.get(&i.receiver_id).cloned(),
            interest: i,
        })
        .collect())
}

pub async fn list_interests(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(params): Query<InterestListParams>,
) -> AppResult<Json<ApiResponse<Paginated<InterestView>>>> {
    let mut conn = db::conn(&state.db)?;
    let pagination = PaginationParams::new(params.page, params.per_page);

    let status = params
        .status
        .as_deref()
        .map(|s| s.parse::<InterestStatus>().map_err(AppError::Validation))
        .transpose()?;

    let filtered = || -> interests::BoxedQuery<'static, Mysql> {
        let mut query = interests::table.into_boxed();
        if let Some(status) = status {
            query = query.filter(interests::status.eq(status.as_str()));
        }
        query
    };

    let total: i64 = filtered().count().get_result(&mut conn)?;
    let rows = filtered()
        .order(interests::sent_at.desc())
        .offset(pagination.offset())
        .limit(pagination.limit())
        .load::<Interest>(&mut conn)?;

    let items = decorate(&mut conn, rows)?;
    Ok(Json(ApiResponse::ok(Paginated::new(items, total, &pagination))))
}

pub async fn user_interests(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<ApiResponse<UserInterests>>> {
    let mut conn = db::conn(&state.db)?;
    UserWithProfile::find(&mut conn, user_id)?;

    let sent = interests::table
        .filter(interests::sender_id.eq(user_id))
        .order(interests::sent_at.desc())
        .load::<Interest>(&mut conn)?;
    let received = interests::table
        .filter(interests::receiver_id.eq(user_id))
        .order(interests::sent_at.desc())
        .load::<Interest>(&mut conn)?;

    Ok(Json(ApiResponse::ok(UserInterests {
        user_id,
        sent: decorate(&mut conn, sent)?,
        received: decorate(&mut conn, received)?,
    })))
}
