use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use diesel::prelude::*;
use serde::Serialize;

use vivah_matching::{rank_candidates, MatchProfile};
use vivah_shared::clients::db;
use vivah_shared::errors::AppResult;
use vivah_shared::middleware::MemberUser;
use vivah_shared::models::{Match, UserWithProfile};
use vivah_shared::schema::matches;
use vivah_shared::types::api::ApiResponse;
use vivah_shared::types::search::CandidateQuery;

use crate::services::directory::{view_profile, ProfileCard};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileList {
    pub total: usize,
    pub profiles: Vec<ProfileCard>,
}

/// Approved opposite-gender members passing the filter, best match first.
pub async fn browse(
    State(state): State<Arc<AppState>>,
    MemberUser(me): MemberUser,
    Query(query): Query<CandidateQuery>,
) -> AppResult<Json<ApiResponse<ProfileList>>> {
    let mut conn = db::conn(&state.db)?;
    let viewer = UserWithProfile::find(&mut conn, me.id)?.match_profile();

    let members = UserWithProfile::approved(&mut conn)?;
    let pool: Vec<MatchProfile> = members.iter().map(|m| m.match_profile()).collect();
    let by_id: HashMap<i32, &UserWithProfile> = members.iter().map(|m| (m.user.id, m)).collect();

    let mut filter = query.filter();
    if query.exclude_matched {
        let existing = matches::table
            .filter(matches::user1_id.eq(me.id).or(matches::user2_id.eq(me.id)))
            .load::<Match>(&mut conn)?;
        filter.exclude_ids.extend(existing.iter().filter_map(|m| m.partner_of(me.id)));
    }

    let limit = query
        .limit
        .unwrap_or(state.config.max_profiles)
        .min(state.config.max_profiles);
    let ranked = rank_candidates(&viewer, &pool, &filter, &state.config.weights);
    let total = ranked.len();
    let profiles: Vec<ProfileCard> = ranked
        .iter()
        .take(limit)
        .filter_map(|r| by_id.get(&r.profile.id).map(|m| ProfileCard::from_ranked(m, r)))
        .collect();

    Ok(Json(ApiResponse::ok(ProfileList { total, profiles })))
}

pub async fn view(
    State(state): State<Arc<AppState>>,
    MemberUser(me): MemberUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<ApiResponse<ProfileCard>>> {
    let mut conn = db::conn(&state.db)?;
    let viewer = UserWithProfile::find(&mut conn, me.id)?;
    let target = UserWithProfile::find(&mut conn, user_id)?;
    Ok(Json(ApiResponse::ok(view_profile(&viewer, &target, &state.config.weights)?)))
}
