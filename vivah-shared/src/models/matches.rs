use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::matches;

text_enum!(MatchStatus {
    Pending => "pending",
    Accepted => "accepted",
    Rejected => "rejected",
    Active => "active",
});

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = matches)]
pub struct Match {
    pub id: i32,
    pub user1_id: i32,
    pub user2_id: i32,
    pub match_score: i32,
    pub status: String,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
}

impl Match {
    pub fn involves(&self, user_id: i32) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }

    /// The other side of the pairing, if `user_id` is one of the two.
    pub fn partner_of(&self, user_id: i32) -> Option<i32> {
        if self.user1_id == user_id {
            Some(self.user2_id)
        } else if self.user2_id == user_id {
            Some(self.user1_id)
        } else {
            None
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = matches)]
pub struct NewMatch {
    pub user1_id: i32,
    pub user2_id: i32,
    pub match_score: i32,
    pub status: String,
    pub created_by: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partner_lookup_works_from_either_side() {
        let m = Match {
            id: 1,
            user1_id: 4,
            user2_id: 9,
            match_score: 80,
            status: MatchStatus::Pending.to_string(),
            created_by: None,
            created_at: NaiveDateTime::default(),
        };
        assert_eq!(m.partner_of(4), Some(9));
        assert_eq!(m.partner_of(9), Some(4));
        assert_eq!(m.partner_of(5), None);
        assert!(m.involves(9));
    }

    #[test]
    fn status_text_parses_case_insensitively() {
        assert_eq!("Active".parse::<MatchStatus>(), Ok(MatchStatus::Active));
        assert!("closed".parse::<MatchStatus>().is_err());
    }
}
