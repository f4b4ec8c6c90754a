use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::errors::{AppError, ErrorCode};
use crate::types::auth::{AccessToken, Claims, UserRole};

pub const MIN_PASSWORD_LEN: usize = 6;

const DEV_JWT_SECRET: &str = "development-secret-change-in-production";

/// Secret shared by every service; `main` exports the configured value as `JWT_SECRET`.
pub fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string())
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::internal(format!("password hashing failed: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("invalid password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::new(
            ErrorCode::PasswordTooWeak,
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

pub fn issue_access_token(
    subject_id: i32,
    role: UserRole,
    secret: &str,
    ttl_secs: i64,
) -> Result<AccessToken, AppError> {
    let claims = Claims::new(subject_id, role, ttl_secs);
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(format!("JWT encoding failed: {e}")))?;
    Ok(AccessToken::new(token, role, ttl_secs))
}

pub fn decode_access_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::new(ErrorCode::TokenExpired, "token has expired")
            }
            _ => AppError::new(ErrorCode::TokenInvalid, format!("invalid token: {e}")),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("secret2", &hash).unwrap());
        assert!(verify_password("secret1", "not-a-hash").is_err());
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn issued_token_decodes_with_same_secret_only() {
        let issued = issue_access_token(42, UserRole::Admin, "s3cret", 3600).unwrap();
        assert_eq!(issued.token_type, "Bearer");

        let claims = decode_access_token(&issued.token, "s3cret").unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, UserRole::Admin);

        assert!(decode_access_token(&issued.token, "other").is_err());
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        // Beyond jsonwebtoken's default 60s leeway.
        let issued = issue_access_token(1, UserRole::User, "s3cret", -300).unwrap();
        match decode_access_token(&issued.token, "s3cret") {
            Err(AppError::Known { code, .. }) => assert_eq!(code, ErrorCode::TokenExpired),
            other => panic!("expected expiry error, got {other:?}"),
        }
    }
}
