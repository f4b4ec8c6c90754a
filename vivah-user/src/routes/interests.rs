use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use diesel::mysql::MysqlConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use vivah_shared::clients::db;
use vivah_shared::errors::{AppError, AppResult, ErrorCode};
use vivah_shared::middleware::MemberUser;
use vivah_shared::models::{
    display_names, Interest, InterestStatus, MatchStatus, NewInterest, NewMatch, UserWithProfile,
};
use vivah_shared::schema::{interests, matches};
use vivah_shared::types::api::ApiResponse;

use crate::services::directory::check_visible;
use crate::services::interests::{
    check_claimed, check_not_self, check_receiver, check_response, parse_decision,
};
use crate::AppState;

// --- Request / Response types ---

#[derive(Debug, Deserialize)]
pub struct SendInterestRequest {
    pub receiver_id: i32,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    #[default]
    Received,
}

#[derive(Debug, Deserialize)]
pub struct InterestListParams {
    #[serde(default)]
    pub direction: Direction,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct InterestView {
    #[serde(flatten)]
    pub interest: Interest,
    /// Name of the member on the other side.
    pub other_name: Option<String>,
}

fn find_interest(conn: &mut MysqlConnection, interest_id: i32) -> AppResult<Interest> {
    interests::table
        .find(interest_id)
        .first::<Interest>(conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::InterestNotFound, format!("interest {interest_id} not found")))
}

// --- Send ---

pub async fn send_interest(
    State(state): State<Arc<AppState>>,
    MemberUser(me): MemberUser,
    Json(req): Json<SendInterestRequest>,
) -> AppResult<Json<ApiResponse<Interest>>> {
    check_not_self(me.id, req.receiver_id)?;

    let mut conn = db::conn(&state.db)?;
    let sender = UserWithProfile::find(&mut conn, me.id)?;
    let receiver = UserWithProfile::find(&mut conn, req.receiver_id)?;
    check_receiver(&sender, &receiver)?;

    let interest_id = conn.transaction::<_, AppError, _>(|conn| {
        let already = interests::table
            .filter(interests::sender_id.eq(me.id))
            .filter(interests::receiver_id.eq(req.receiver_id))
            .select(interests::id)
            .first::<i32>(conn)
            .optional()?;
        if already.is_some() {
            return Err(AppError::new(ErrorCode::InterestAlreadySent, "interest already sent"));
        }
        diesel::insert_into(interests::table)
            .values(&NewInterest {
                sender_id: me.id,
                receiver_id: req.receiver_id,
                status: InterestStatus::Sent.as_str().to_string(),
            })
            .execute(conn)?;
        db::inserted_id(conn)
    })?;

    let interest = find_interest(&mut conn, interest_id)?;
    tracing::info!(interest_id, sender_id = me.id, receiver_id = req.receiver_id, "interest sent");
    Ok(Json(ApiResponse::ok_with_message(interest, "interest sent")))
}

// --- List ---

pub async fn list_interests(
    State(state): State<Arc<AppState>>,
    MemberUser(me): MemberUser,
    Query(params): Query<InterestListParams>,
) -> AppResult<Json<ApiResponse<Vec<InterestView>>>> {
    let mut conn = db::conn(&state.db)?;

    let rows = match params.direction {
        Direction::Sent => interests::table
            .filter(interests::sender_id.eq(me.id))
            .order(interests::sent_at.desc())
            .load::<Interest>(&mut conn)?,
        Direction::Received => interests::table
            .filter(interests::receiver_id.eq(me.id))
            .order(interests::sent_at.desc())
            .load::<Interest>(&mut conn)?,
    };

    let other = |i: &Interest| if i.sender_id == me.id { i.receiver_id } else { i.sender_id };
    let ids: Vec<i32> = rows.iter().map(other).collect();
    let names = display_names(&mut conn, &ids)?;

    let views = rows
        .into_iter()
        .map(|i| InterestView {
            other_name: names.get(&other(&i)).cloned(),
            interest: i,
        })
        .collect();
    Ok(Json(ApiResponse::ok(views)))
}

// --- Respond ---

/// Accepting an interest also records a match between the pair, scored with
/// the configured weights, unless one already exists.
pub async fn respond(
    State(state): State<Arc<AppState>>,
    MemberUser(me): MemberUser,
    Path(interest_id): Path<i32>,
    Json(req): Json<RespondRequest>,
) -> AppResult<Json<ApiResponse<Interest>>> {
    let decision = parse_decision(&req.status)?;
    let mut conn = db::conn(&state.db)?;

    let interest = find_interest(&mut conn, interest_id)?;
    check_response(&interest, me.id)?;

    let match_score = if decision == InterestStatus::Accepted {
        let sender = UserWithProfile::find(&mut conn, interest.sender_id)?;
        let receiver = UserWithProfile::find(&mut conn, interest.receiver_id)?;
        check_visible(&receiver, &sender)?;
        let score = vivah_matching::score(
            &sender.match_profile(),
            &receiver.match_profile(),
            &state.config.weights,
        );
        Some(i32::from(score))
    } else {
        None
    };

    conn.transaction::<_, AppError, _>(|conn| {
        let claimed = diesel::update(
            interests::table
                .find(interest_id)
                .filter(interests::status.eq(InterestStatus::Sent.as_str())),
        )
        .set((
            interests::status.eq(decision.as_str()),
            interests::responded_at.eq(Some(Utc::now().naive_utc())),
        ))
        .execute(conn)?;
        check_claimed(claimed)?;

        if let Some(match_score) = match_score {
            let (a, b) = (interest.sender_id, interest.receiver_id);
            let existing = matches::table
                .filter(
                    matches::user1_id.eq(a).and(matches::user2_id.eq(b))
                        .or(matches::user1_id.eq(b).and(matches::user2_id.eq(a))),
                )
                .select(matches::id)
                .first::<i32>(conn)
                .optional()?;
            if existing.is_none() {
                diesel::insert_into(matches::table)
                    .values(&NewMatch {
                        user1_id: a,
                        user2_id: b,
                        match_score,
                        status: MatchStatus::Accepted.as_str().to_string(),
                        created_by: None,
                    })
                    .execute(conn)?;
            }
        }
        Ok(())
    })?;

    let updated = find_interest(&mut conn, interest_id)?;
    tracing::info!(interest_id, user_id = me.id, decision = %decision, "interest answered");
    Ok(Json(ApiResponse::ok(updated)))
}
