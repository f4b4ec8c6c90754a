use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{area}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Auth errors
/// - E2xxx: User and profile errors
/// - E3xxx: Match errors
/// - E4xxx: Interest errors
/// - E5xxx: Membership errors
/// - E6xxx: Settings errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    Unauthorized,
    Forbidden,
    BadRequest,

    // Auth (E1xxx)
    InvalidCredentials,
    TokenExpired,
    TokenInvalid,
    PasswordTooWeak,
    PasswordNotSet,
    AccountNotApproved,

    // Users (E2xxx)
    UserNotFound,
    ProfileNotFound,
    PhoneAlreadyRegistered,
    InvalidPhone,
    InvalidAge,

    // Matches (E3xxx)
    MatchNotFound,
    MatchAlreadyExists,
    CannotMatchSelf,
    IncompatibleGenders,
    InvalidMatchScore,
    InvalidMatchStatus,

    // Interests (E4xxx)
    InterestNotFound,
    InterestAlreadySent,
    CannotSendInterestToSelf,
    InterestAlreadyResponded,
    NotInterestReceiver,

    // Membership (E5xxx)
    PlanNotFound,
    PlanInactive,
    MembershipModuleDisabled,

    // Settings (E6xxx)
    UnknownSetting,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::Unauthorized => "E0004",
            Self::Forbidden => "E0005",
            Self::BadRequest => "E0006",

            // Auth
            Self::InvalidCredentials => "E1001",
            Self::TokenExpired => "E1002",
            Self::TokenInvalid => "E1003",
            Self::PasswordTooWeak => "E1004",
            Self::PasswordNotSet => "E1005",
            Self::AccountNotApproved => "E1006",

            // Users
            Self::UserNotFound => "E2001",
            Self::ProfileNotFound => "E2002",
            Self::PhoneAlreadyRegistered => "E2003",
            Self::InvalidPhone => "E2004",
            Self::InvalidAge => "E2005",

            // Matches
            Self::MatchNotFound => "E3001",
            Self::MatchAlreadyExists => "E3002",
            Self::CannotMatchSelf => "E3003",
            Self::IncompatibleGenders => "E3004",
            Self::InvalidMatchScore => "E3005",
            Self::InvalidMatchStatus => "E3006",

            // Interests
            Self::InterestNotFound => "E4001",
            Self::InterestAlreadySent => "E4002",
            Self::CannotSendInterestToSelf => "E4003",
            Self::InterestAlreadyResponded => "E4004",
            Self::NotInterestReceiver => "E4005",

            // Membership
            Self::PlanNotFound => "E5001",
            Self::PlanInactive => "E5002",
            Self::MembershipModuleDisabled => "E5003",

            // Settings
            Self::UnknownSetting => "E6001",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError | Self::BadRequest | Self::PasswordTooWeak
            | Self::InvalidPhone | Self::InvalidAge | Self::InvalidMatchScore
            | Self::InvalidMatchStatus | Self::IncompatibleGenders | Self::PlanInactive => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound | Self::UserNotFound | Self::ProfileNotFound | Self::MatchNotFound
            | Self::InterestNotFound | Self::PlanNotFound | Self::UnknownSetting => {
                StatusCode::NOT_FOUND
            }
            Self::Unauthorized | Self::InvalidCredentials | Self::TokenExpired
            | Self::TokenInvalid | Self::PasswordNotSet => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::AccountNotApproved | Self::CannotMatchSelf
            | Self::CannotSendInterestToSelf | Self::NotInterestReceiver
            | Self::MembershipModuleDisabled => StatusCode::FORBIDDEN,
            Self::PhoneAlreadyRegistered | Self::MatchAlreadyExists | Self::InterestAlreadySent
            | Self::InterestAlreadyResponded => StatusCode::CONFLICT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// HTTP status this error renders with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Known { code, .. } => code.status_code(),
            Self::Database(diesel::result::Error::NotFound) => StatusCode::NOT_FOUND,
            Self::Internal(_) | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(errors.field_errors()).ok();
        Self::Known {
            code: ErrorCode::ValidationError,
            message: errors.to_string(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_response = match &self {
            AppError::Known { code, message, details } => {
                let mut resp = ApiErrorResponse::new(code.code(), message);
                if let Some(d) = details {
                    resp = resp.with_details(d.clone());
                }
                resp
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                ApiErrorResponse::new("E0001", "internal server error")
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                match err {
                    diesel::result::Error::NotFound => {
                        ApiErrorResponse::new("E0003", "resource not found")
                    }
                    _ => ApiErrorResponse::new("E0001", "database error"),
                }
            }
            AppError::Validation(msg) => ApiErrorResponse::new("E0002", msg),
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorCode::InvalidCredentials, StatusCode::UNAUTHORIZED, "E1001")]
    #[case(ErrorCode::PasswordTooWeak, StatusCode::BAD_REQUEST, "E1004")]
    #[case(ErrorCode::UserNotFound, StatusCode::NOT_FOUND, "E2001")]
    #[case(ErrorCode::MatchAlreadyExists, StatusCode::CONFLICT, "E3002")]
    #[case(ErrorCode::NotInterestReceiver, StatusCode::FORBIDDEN, "E4005")]
    #[case(ErrorCode::MembershipModuleDisabled, StatusCode::FORBIDDEN, "E5003")]
    #[case(ErrorCode::UnknownSetting, StatusCode::NOT_FOUND, "E6001")]
    fn codes_map_to_status(#[case] code: ErrorCode, #[case] status: StatusCode, #[case] text: &str) {
        assert_eq!(code.status_code(), status);
        assert_eq!(code.code(), text);
    }

    #[test]
    fn diesel_not_found_renders_404() {
        let err = AppError::from(diesel::result::Error::NotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn known_error_keeps_message_verbatim() {
        let err = AppError::new(ErrorCode::PhoneAlreadyRegistered, "phone number already registered");
        assert_eq!(err.to_string(), "phone number already registered");
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
