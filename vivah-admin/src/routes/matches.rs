use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use diesel::mysql::MysqlConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use vivah_matching::{score_breakdown, MatchProfile, RankedCandidate, ScoreBreakdown};
use vivah_shared::clients::db;
use vivah_shared::errors::{AppError, AppResult, ErrorCode};
use vivah_shared::middleware::AdminUser;
use vivah_shared::models::{display_names, Match, MatchStatus, NewMatch, UserWithProfile};
use vivah_shared::schema::matches;
use vivah_shared::types::api::ApiResponse;
use vivah_shared::types::search::CandidateQuery;

use crate::services::matchmaking::{best_candidates, check_pair, check_score};
use crate::AppState;

// --- Request / Response types ---

#[derive(Debug, Deserialize)]
pub struct MatchListParams {
    pub status: Option<String>,
    pub user_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    pub user1_id: i32,
    pub user2_id: i32,
    /// Computed from the two profiles when omitted.
    pub match_score: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct PairParams {
    pub user1_id: i32,
    pub user2_id: i32,
}

#[derive(Debug, Serialize)]
pub struct MatchView {
    #[serde(flatten)]
    pub pairing: Match,
    pub user1_name: Option<String>,
    pub user2_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CandidateList {
    pub anchor: MatchProfile,
    pub total: usize,
    pub candidates: Vec<RankedCandidate>,
}

#[derive(Debug, Serialize)]
pub struct PairScore {
    pub user1_id: i32,
    pub user2_id: i32,
    pub score: u8,
    pub earned: u32,
    pub possible: u32,
    pub breakdown: ScoreBreakdown,
}

fn parse_status(raw: &str) -> AppResult<MatchStatus> {
    raw.parse::<MatchStatus>()
        .map_err(|e| AppError::new(ErrorCode::InvalidMatchStatus, e))
}

fn decorate(conn: &mut MysqlConnection, rows: Vec<Match>) -> AppResult<Vec<MatchView>> {
    let ids: Vec<i32> = rows.iter().flat_map(|m| [m.user1_id, m.user2_id]).collect();
    let names = display_names(conn, &ids)?;
    Ok(rows
        .into_iter()
        .map(|m| MatchView {
            user1_name: names.get(&m.user1_id).cloned(),
            user2_name: names.get(&m.user2_id).cloned(),
            pairing: m,
        })
        .collect())
}

fn pair_exists(conn: &mut MysqlConnection, a: i32, b: i32) -> AppResult<bool> {
    let existing = matches::table
        .filter(
            matches::user1_id.eq(a).and(matches::user2_id.eq(b))
                .or(matches::user1_id.eq(b).and(matches::user2_id.eq(a))),
        )
        .select(matches::id)
        .first::<i32>(conn)
        .optional()?;
    Ok(existing.is_some())
}

// --- List matches ---

pub async fn list_matches(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(params): Query<MatchListParams>,
) -> AppResult<Json<ApiResponse<Vec<MatchView>>>> {
    let mut conn = db::conn(&state.db)?;

    let mut query = matches::table.into_boxed();
    if let Some(status) = params.status.as_deref() {
        query = query.filter(matches::status.eq(parse_status(status)?.as_str()));
    }
    if let Some(user_id) = params.user_id {
        query = query.filter(matches::user1_id.eq(user_id).or(matches::user2_id.eq(user_id)));
    }
    let rows = query.order(matches::created_at.desc()).load::<Match>(&mut conn)?;

    Ok(Json(ApiResponse::ok(decorate(&mut conn, rows)?)))
}

// --- Create match ---

pub async fn create_match(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(req): Json<CreateMatchRequest>,
) -> AppResult<Json<ApiResponse<MatchView>>> {
    let status = match req.status.as_deref() {
        Some(raw) => parse_status(raw)?,
        None => MatchStatus::Pending,
    };
    if req.user1_id == req.user2_id {
        return Err(AppError::new(ErrorCode::CannotMatchSelf, "cannot match a user with themselves"));
    }

    let mut conn = db::conn(&state.db)?;
    let first = UserWithProfile::find(&mut conn, req.user1_id)?.match_profile();
    let second = UserWithProfile::find(&mut conn, req.user2_id)?.match_profile();
    check_pair(&first, &second)?;

    let match_score = match req.match_score {
        Some(score) => check_score(score)?,
        None => i32::from(vivah_matching::score(&first, &second, &state.config.weights)),
    };

    let match_id = conn.transaction::<_, AppError, _>(|conn| {
        if pair_exists(conn, req.user1_id, req.user2_id)? {
            return Err(AppError::new(ErrorCode::MatchAlreadyExists, "these users are already matched"));
        }
        diesel::insert_into(matches::table)
            .values(&NewMatch {
                user1_id: req.user1_id,
                user2_id: req.user2_id,
                match_score,
                status: status.as_str().to_string(),
                created_by: Some(admin.id),
            })
            .execute(conn)?;
        db::inserted_id(conn)
    })?;

    let created = matches::table.find(match_id).first::<Match>(&mut conn)?;
    tracing::info!(
        match_id,
        user1_id = req.user1_id,
        user2_id = req.user2_id,
        match_score,
        admin_id = admin.id,
        "match created"
    );

    let view = decorate(&mut conn, vec![created])?
        .pop()
        .ok_or_else(|| AppError::internal("created match vanished"))?;
    Ok(Json(ApiResponse::ok_with_message(view, "match created")))
}

pub async fn delete_match(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(match_id): Path<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    let mut conn = db::conn(&state.db)?;
    let removed = diesel::delete(matches::table.find(match_id)).execute(&mut conn)?;
    if removed == 0 {
        return Err(AppError::new(ErrorCode::MatchNotFound, format!("match {match_id} not found")));
    }
    tracing::info!(match_id, admin_id = admin.id, "match deleted");
    Ok(Json(ApiResponse::ok_with_message((), "match deleted")))
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(match_id): Path<i32>,
    Json(req): Json<MatchStatusRequest>,
) -> AppResult<Json<ApiResponse<Match>>> {
    let status = parse_status(&req.status)?;
    let mut conn = db::conn(&state.db)?;

    matches::table
        .find(match_id)
        .select(matches::id)
        .first::<i32>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::MatchNotFound, format!("match {match_id} not found")))?;

    diesel::update(matches::table.find(match_id))
        .set(matches::status.eq(status.as_str()))
        .execute(&mut conn)?;
    let updated = matches::table.find(match_id).first::<Match>(&mut conn)?;

    tracing::info!(match_id, admin_id = admin.id, status = %status, "match status changed");
    Ok(Json(ApiResponse::ok(updated)))
}

// --- Assisted matchmaking ---

pub async fn list_candidates(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(user_id): Path<i32>,
    Query(query): Query<CandidateQuery>,
) -> AppResult<Json<ApiResponse<CandidateList>>> {
    let mut conn = db::conn(&state.db)?;

    let anchor = UserWithProfile::find(&mut conn, user_id)?.match_profile();
    let pool: Vec<MatchProfile> = UserWithProfile::approved(&mut conn)?
        .iter()
        .map(|u| u.match_profile())
        .collect();

    let mut filter = query.filter();
    if query.exclude_matched {
        let existing = matches::table
            .filter(matches::user1_id.eq(user_id).or(matches::user2_id.eq(user_id)))
            .load::<Match>(&mut conn)?;
        filter.exclude_ids.extend(existing.iter().filter_map(|m| m.partner_of(user_id)));
    }

    let candidates = best_candidates(&anchor, &pool, &filter, &state.config.weights, query.limit);
    tracing::debug!(user_id, pool = pool.len(), found = candidates.len(), "candidates ranked");

    Ok(Json(ApiResponse::ok(CandidateList {
        anchor,
        total: candidates.len(),
        candidates,
    })))
}

pub async fn score_pair(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(params): Query<PairParams>,
) -> AppResult<Json<ApiResponse<PairScore>>> {
    let mut conn = db::conn(&state.db)?;
    let first = UserWithProfile::find(&mut conn, params.user1_id)?.match_profile();
    let second = UserWithProfile::find(&mut conn, params.user2_id)?.match_profile();

    let weights = &state.config.weights;
    let breakdown = score_breakdown(&first, &second, weights);

    Ok(Json(ApiResponse::ok(PairScore {
        user1_id: first.id,
        user2_id: second.id,
        score: breakdown.percentage(weights),
        earned: breakdown.earned(),
        possible: weights.total(),
        breakdown,
    })))
}
