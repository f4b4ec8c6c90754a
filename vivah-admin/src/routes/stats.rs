use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Duration, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Date};
use serde::{Deserialize, Serialize};

use vivah_shared::clients::db;
use vivah_shared::errors::AppResult;
use vivah_shared::middleware::AdminUser;
use vivah_shared::models::{InterestStatus, PaymentStatus};
use vivah_shared::schema::{interests, matches, membership_plans, users};
use vivah_shared::types::api::ApiResponse;

use crate::AppState;

const MAX_REGISTRATION_DAYS: i64 = 365;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_users: i64,
    pub approved_users: i64,
    pub pending_approval: i64,
    pub paid_users: i64,
    pub male_users: i64,
    pub female_users: i64,
    pub active_memberships: i64,
    pub total_matches: i64,
    pub total_interests: i64,
    pub pending_interests: i64,
    pub active_plans: i64,
}

#[derive(Debug, Deserialize)]
pub struct RegistrationParams {
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_days() -> i64 { 30 }

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(QueryableByName)]
struct DayRow {
    #[diesel(sql_type = Date)]
    day: NaiveDate,
    #[diesel(sql_type = BigInt)]
    cnt: i64,
}

/// One entry per day from `start` through `end`, zero where nobody registered.
fn fill_days(start: NaiveDate, end: NaiveDate, rows: &[(NaiveDate, i64)]) -> Vec<DailyCount> {
    let counts: BTreeMap<NaiveDate, i64> = rows.iter().copied().collect();
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|date| DailyCount {
            date,
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let mut conn = db::conn(&state.db)?;
    let today = Utc::now().date_naive();

    let total_users = users::table.count().get_result(&mut conn)?;
    let approved_users = users::table
        .filter(users::is_approved.eq(true))
        .count()
        .get_result(&mut conn)?;
    let paid_users = users::table
        .filter(users::payment_status.eq(PaymentStatus::Paid.as_str()))
        .count()
        .get_result(&mut conn)?;
    let male_users = users::table
        .filter(users::gender.eq("male"))
        .count()
        .get_result(&mut conn)?;
    let female_users = users::table
        .filter(users::gender.eq("female"))
        .count()
        .get_result(&mut conn)?;
    let active_memberships = users::table
        .filter(users::membership_type.is_not_null())
        .filter(users::membership_expiry.is_null().or(users::membership_expiry.ge(today)))
        .count()
        .get_result(&mut conn)?;
    let total_matches = matches::table.count().get_result(&mut conn)?;
    let total_interests = interests::table.count().get_result(&mut conn)?;
    let pending_interests = interests::table
        .filter(interests::status.eq(InterestStatus::Sent.as_str()))
        .count()
        .get_result(&mut conn)?;
    let active_plans = membership_plans::table
        .filter(membership_plans::is_active.eq(true))
        .count()
        .get_result(&mut conn)?;

    Ok(Json(ApiResponse::ok(DashboardStats {
        total_users,
        approved_users,
        pending_approval: total_users - approved_users,
        paid_users,
        male_users,
        female_users,
        active_memberships,
        total_matches,
        total_interests,
        pending_interests,
        active_plans,
    })))
}

pub async fn registrations(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(params): Query<RegistrationParams>,
) -> AppResult<Json<ApiResponse<Vec<DailyCount>>>> {
    let mut conn = db::conn(&state.db)?;
    let days = params.days.clamp(1, MAX_REGISTRATION_DAYS);
    let today = Utc::now().date_naive();
    let start = today - Duration::days(days - 1);

    let rows = diesel::sql_query(
        "SELECT DATE(created_at) AS day, COUNT(*) AS cnt \
         FROM users \
         WHERE created_at >= ? \
         GROUP BY DATE(created_at) \
         ORDER BY day",
    )
    .bind::<Date, _>(start)
    .load::<DayRow>(&mut conn)?;

    let rows: Vec<(NaiveDate, i64)> = rows.into_iter().map(|r| (r.day, r.cnt)).collect();
    Ok(Json(ApiResponse::ok(fill_days(start, today, &rows))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn missing_days_are_zero_filled() {
        let filled = fill_days(date(1), date(4), &[(date(2), 3), (date(4), 1)]);
        let counts: Vec<i64> = filled.iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![0, 3, 0, 1]);
        assert_eq!(filled[0].date, date(1));
    }

    #[test]
    fn single_day_window() {
        assert_eq!(fill_days(date(5), date(5), &[]), vec![DailyCount { date: date(5), count: 0 }]);
    }
}
