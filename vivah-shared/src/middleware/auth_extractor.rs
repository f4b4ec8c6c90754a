use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::errors::{AppError, ErrorCode};
use crate::security::{decode_access_token, jwt_secret};
use crate::types::auth::{AuthUser, UserRole};

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;
        let claims = decode_access_token(token, &jwt_secret())?;

        if claims.is_expired() {
            return Err(AppError::new(ErrorCode::TokenExpired, "token has expired"));
        }

        Ok(AuthUser::from(claims))
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::new(ErrorCode::Unauthorized, "missing authorization header"))?
        .to_str()
        .map_err(|_| AppError::new(ErrorCode::Unauthorized, "invalid authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::new(ErrorCode::Unauthorized, "authorization header must use Bearer scheme")
        })
}

/// Require a member (client app) token
pub struct MemberUser(pub AuthUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for MemberUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::User {
            return Err(AppError::new(ErrorCode::Forbidden, "member access required"));
        }
        Ok(Self(user))
    }
}

/// Require Admin or SuperAdmin role
pub struct AdminUser(pub AuthUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.is_admin() {
            return Err(AppError::new(ErrorCode::Forbidden, "admin access required"));
        }
        Ok(Self(user))
    }
}

/// Require SuperAdmin role
pub struct SuperAdminUser(pub AuthUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for SuperAdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::SuperAdmin {
            return Err(AppError::new(ErrorCode::Forbidden, "superadmin access required"));
        }
        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::issue_access_token;
    use axum::http::{Request, StatusCode};

    fn parts_with(header: Option<String>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn bearer(role: UserRole) -> Option<String> {
        let token = issue_access_token(9, role, &jwt_secret(), 600).unwrap();
        Some(format!("Bearer {}", token.token))
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let mut parts = parts_with(None);
        let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_unauthorized() {
        let mut parts = parts_with(Some("Basic abc".into()));
        let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_extractor_accepts_both_admin_tiers() {
        let mut parts = parts_with(bearer(UserRole::Admin));
        assert!(AdminUser::from_request_parts(&mut parts, &()).await.is_ok());

        let mut parts = parts_with(bearer(UserRole::SuperAdmin));
        let AdminUser(user) = AdminUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.id, 9);
    }

    #[tokio::test]
    async fn role_mismatch_is_forbidden() {
        let mut parts = parts_with(bearer(UserRole::User));
        let err = AdminUser::from_request_parts(&mut parts, &()).await.err().unwrap();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let mut parts = parts_with(bearer(UserRole::Admin));
        let err = SuperAdminUser::from_request_parts(&mut parts, &()).await.err().unwrap();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let mut parts = parts_with(bearer(UserRole::Admin));
        let err = MemberUser::from_request_parts(&mut parts, &()).await.err().unwrap();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}
