pub mod clients;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod schema;
pub mod security;
pub mod settings;
pub mod types;
pub mod validation;

pub use errors::{AppError, AppResult, ErrorCode};
pub use types::*;
