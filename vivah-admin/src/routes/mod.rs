pub mod auth;
pub mod health;
pub mod interests;
pub mod matches;
pub mod membership_plans;
pub mod settings;
pub mod stats;
pub mod users;
