pub mod auth;
pub mod health;
pub mod interests;
pub mod matches;
pub mod me;
pub mod membership;
pub mod profiles;
pub mod settings;
