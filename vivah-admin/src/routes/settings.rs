use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use vivah_shared::clients::db;
use vivah_shared::errors::{AppError, AppResult};
use vivah_shared::middleware::AdminUser;
use vivah_shared::settings::{self, defaults, SettingKey};
use vivah_shared::types::api::ApiResponse;
use vivah_shared::types::auth::{AuthUser, UserRole};

use crate::AppState;

/// Theme is editable by any admin; layout and module toggles only by a superadmin.
fn may_write(role: UserRole, key: SettingKey) -> bool {
    match key {
        SettingKey::Theme => role.is_admin(),
        SettingKey::Sidebar | SettingKey::Columns | SettingKey::Modules => role == UserRole::SuperAdmin,
    }
}

pub async fn get_setting(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(key): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let key: SettingKey = key.parse()?;
    let mut conn = db::conn(&state.db)?;
    Ok(Json(ApiResponse::ok(settings::load_document(&mut conn, key)?)))
}

pub async fn get_defaults(
    _admin: AdminUser,
    Path(key): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let key: SettingKey = key.parse()?;
    Ok(Json(ApiResponse::ok(defaults::for_key(key))))
}

pub async fn put_setting(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(key): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let key: SettingKey = key.parse()?;
    if !may_write(user.role, key) {
        return Err(AppError::forbidden(format!(
            "{} settings require superadmin access",
            key.as_str()
        )));
    }

    let mut conn = db::conn(&state.db)?;
    let stored = settings::store_document(&mut conn, key, body)?;

    tracing::info!(key = key.as_str(), admin_id = user.id, role = %user.role, "settings saved");
    Ok(Json(ApiResponse::ok_with_message(stored, "settings saved")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(UserRole::Admin, SettingKey::Theme, true)]
    #[case(UserRole::SuperAdmin, SettingKey::Theme, true)]
    #[case(UserRole::User, SettingKey::Theme, false)]
    #[case(UserRole::Admin, SettingKey::Sidebar, false)]
    #[case(UserRole::Admin, SettingKey::Columns, false)]
    #[case(UserRole::Admin, SettingKey::Modules, false)]
    #[case(UserRole::SuperAdmin, SettingKey::Modules, true)]
    fn write_access_by_role(#[case] role: UserRole, #[case] key: SettingKey, #[case] allowed: bool) {
        assert_eq!(may_write(role, key), allowed);
    }
}
