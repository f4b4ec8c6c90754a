use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use serde::Serialize;

use vivah_shared::clients::db;
use vivah_shared::errors::AppResult;
use vivah_shared::middleware::MemberUser;
use vivah_shared::models::{display_names, Match};
use vivah_shared::schema::matches;
use vivah_shared::types::api::ApiResponse;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MyMatch {
    pub id: i32,
    pub partner_id: i32,
    pub partner_name: Option<String>,
    pub match_score: i32,
    pub status: String,
    pub created_at: chrono::NaiveDateTime,
}

pub async fn my_matches(
    State(state): State<Arc<AppState>>,
    MemberUser(me): MemberUser,
) -> AppResult<Json<ApiResponse<Vec<MyMatch>>>> {
    let mut conn = db::conn(&state.db)?;
    let rows = matches::table
        .filter(matches::user1_id.eq(me.id).or(matches::user2_id.eq(me.id)))
        .order((matches::match_score.desc(), matches::created_at.desc()))
        .load::<Match>(&mut conn)?;

    let partners: Vec<i32> = rows.iter().filter_map(|m| m.partner_of(me.id)).collect();
    let names = display_names(&mut conn, &partners)?;

    let items = rows
        .into_iter()
        .filter_map(|m| {
            let partner_id = m.partner_of(me.id)?;
            Some(MyMatch {
                id: m.id,
                partner_id,
                partner_name: names.get(&partner_id).cloned(),
                match_score: m.match_score,
                status: m.status,
                created_at: m.created_at,
            })
        })
        .collect();
    Ok(Json(ApiResponse::ok(items)))
}
