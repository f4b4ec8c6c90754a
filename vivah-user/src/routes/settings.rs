use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use vivah_shared::clients::db;
use vivah_shared::errors::AppResult;
use vivah_shared::settings::{self, defaults, ModuleSettings, SettingKey, ThemeSettings};
use vivah_shared::types::api::ApiResponse;

use crate::AppState;

pub async fn modules(State(state): State<Arc<AppState>>) -> AppResult<Json<ApiResponse<ModuleSettings>>> {
    let mut conn = db::conn(&state.db)?;
    Ok(Json(ApiResponse::ok(settings::load(&mut conn, SettingKey::Modules, defaults::modules)?)))
}

pub async fn theme(State(state): State<Arc<AppState>>) -> AppResult<Json<ApiResponse<ThemeSettings>>> {
    let mut conn = db::conn(&state.db)?;
    Ok(Json(ApiResponse::ok(settings::load(&mut conn, SettingKey::Theme, defaults::theme)?)))
}
