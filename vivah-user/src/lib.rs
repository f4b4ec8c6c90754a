//! Member-facing API: registration and login, own profile, browsing
//! compatible profiles, interests and membership.

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use vivah_shared::clients::db::DbPool;

pub mod config;
pub mod routes;
pub mod services;

use config::AppConfig;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
}

pub fn router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/me", get(routes::me::get_me).put(routes::me::update_me))
        .route("/profiles", get(routes::profiles::browse))
        .route("/profiles/:id", get(routes::profiles::view))
        .route(
            "/interests",
            get(routes::interests::list_interests).post(routes::interests::send_interest),
        )
        .route("/interests/:id/respond", put(routes::interests::respond))
        .route("/matches", get(routes::matches::my_matches))
        .route("/membership-plans", get(routes::membership::list_plans))
        .route("/membership/interest", post(routes::membership::register_interest))
        .route("/settings/modules", get(routes::settings::modules))
        .route("/settings/theme", get(routes::settings::theme));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
