pub mod bulk;
pub mod matchmaking;
pub mod membership;
pub mod users;
