use vivah_shared::errors::{AppError, AppResult, ErrorCode};
use vivah_shared::models::User;
use vivah_shared::security::verify_password;

/// Credentials first, then account state, so a wrong password never reveals
/// whether the account is approved.
pub fn check_login(user: &User, password: &str) -> AppResult<()> {
    let Some(hash) = user.password_hash.as_deref().filter(|h| !h.is_empty()) else {
        return Err(AppError::new(
            ErrorCode::PasswordNotSet,
            "no password set for this account yet, contact the admin",
        ));
    };
    if !verify_password(password, hash)? {
        return Err(AppError::new(ErrorCode::InvalidCredentials, "invalid phone or password"));
    }
    if !user.is_approved {
        return Err(AppError::new(ErrorCode::AccountNotApproved, "account is awaiting approval"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::member;
    use vivah_shared::security::hash_password;

    #[test]
    fn approved_member_with_password_can_log_in() {
        let user = User { password_hash: Some(hash_password("secret1").unwrap()), ..member(1, "male") };
        assert!(check_login(&user, "secret1").is_ok());
    }

    #[test]
    fn wrong_password_is_rejected_before_approval_check() {
        let user = User {
            password_hash: Some(hash_password("secret1").unwrap()),
            is_approved: false,
            ..member(1, "male")
        };
        let err = check_login(&user, "nope").unwrap_err();
        assert_eq!(err.to_string(), "invalid phone or password");

        let err = check_login(&user, "secret1").unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn missing_password_is_reported() {
        let err = check_login(&member(1, "female"), "anything").unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
