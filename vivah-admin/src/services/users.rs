use diesel::mysql::MysqlConnection;
use diesel::prelude::*;

use vivah_shared::errors::{AppError, AppResult};
use vivah_shared::schema::{interests, matches, profiles, users};

/// Removes a user together with their profile, interests and matches.
/// Returns `false` when no such user exists.
pub fn delete_user_cascade(conn: &mut MysqlConnection, user_id: i32) -> AppResult<bool> {
    conn.transaction::<_, AppError, _>(|conn| {
        diesel::delete(
            interests::table.filter(
                interests::sender_id.eq(user_id).or(interests::receiver_id.eq(user_id)),
            ),
        )
        .execute(conn)?;
        diesel::delete(
            matches::table.filter(matches::user1_id.eq(user_id).or(matches::user2_id.eq(user_id))),
        )
        .execute(conn)?;
        diesel::delete(profiles::table.filter(profiles::user_id.eq(user_id))).execute(conn)?;
        let removed = diesel::delete(users::table.find(user_id)).execute(conn)?;
        Ok(removed > 0)
    })
}
