use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::interests;

text_enum!(InterestStatus {
    Sent => "sent",
    Accepted => "accepted",
    Rejected => "rejected",
});

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = interests)]
pub struct Interest {
    pub id: i32,
    pub sender_id: i32,
    pub receiver_id: i32,
    pub status: String,
    pub sent_at: NaiveDateTime,
    pub responded_at: Option<NaiveDateTime>,
}

impl Interest {
    pub fn is_pending(&self) -> bool {
        self.status.parse::<InterestStatus>() == Ok(InterestStatus::Sent)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = interests)]
pub struct NewInterest {
    pub sender_id: i32,
    pub receiver_id: i32,
    pub status: String,
}
