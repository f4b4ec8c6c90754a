//! Admin panel backend: user management, manual and assisted matchmaking,
//! membership plans and the superadmin UI settings.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
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
    pub metrics_handle: Option<PrometheusHandle>,
}

pub fn router(state: Arc<AppState>) -> Router {
    let user_routes = Router::new()
        .route("/", get(routes::users::list_users).post(routes::users::create_user))
        .route("/approved", get(routes::users::list_approved))
        .route("/with-passwords", get(routes::users::list_with_passwords))
        .route("/paid-no-password", get(routes::users::list_paid_without_password))
        .route("/bulk-delete", post(routes::users::bulk_delete))
        .route(
            "/:id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        .route("/:id/payment", patch(routes::users::set_payment_status))
        .route("/:id/approval", patch(routes::users::set_approval))
        .route("/:id/password", put(routes::users::set_password))
        .route(
            "/:id/membership",
            post(routes::users::assign_membership).delete(routes::users::revoke_membership),
        );

    let match_routes = Router::new()
        .route("/", get(routes::matches::list_matches).post(routes::matches::create_match))
        .route("/score", get(routes::matches::score_pair))
        .route("/candidates/:user_id", get(routes::matches::list_candidates))
        .route("/:id", delete(routes::matches::delete_match))
        .route("/:id/status", patch(routes::matches::update_status));

    let plan_routes = Router::new()
        .route(
            "/",
            get(routes::membership_plans::list_plans).post(routes::membership_plans::create_plan),
        )
        .route(
            "/:id",
            get(routes::membership_plans::get_plan)
                .put(routes::membership_plans::update_plan)
                .delete(routes::membership_plans::delete_plan),
        )
        .route("/:id/toggle", patch(routes::membership_plans::toggle_plan));

    let admin_routes = Router::new()
        .route("/login", post(routes::auth::admin_login))
        .nest("/users", user_routes)
        .nest("/matches", match_routes)
        .route("/interests", get(routes::interests::list_interests))
        .route("/interests/user/:id", get(routes::interests::user_interests))
        .nest("/membership-plans", plan_routes)
        .route(
            "/settings/:key",
            get(routes::settings::get_setting).put(routes::settings::put_setting),
        )
        .route("/settings/:key/defaults", get(routes::settings::get_defaults))
        .route("/stats", get(routes::stats::dashboard))
        .route("/stats/registrations", get(routes::stats::registrations));

    let api_routes = Router::new()
        .route("/superadmin/login", post(routes::auth::superadmin_login))
        .nest("/admin", admin_routes);

    let cors = if state.config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::permissive().allow_origin(origins)
    };

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .nest("/api", api_routes)
        .layer(axum::middleware::from_fn(vivah_shared::middleware::metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
