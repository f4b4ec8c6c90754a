use std::sync::Arc;

use vivah_admin::config::AppConfig;
use vivah_admin::{router, AppState};
use vivah_shared::clients::db::create_pool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vivah_shared::middleware::init_tracing("vivah-admin");

    let config = AppConfig::load()?;
    let port = config.port;

    // The auth extractors read the signing secret from the environment.
    std::env::set_var("JWT_SECRET", &config.jwt_secret);

    let db = create_pool(&config.database_url, config.db_pool_size)?;

    let metrics_handle = match vivah_shared::middleware::init_metrics() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "prometheus recorder not installed");
            None
        }
    };

    let state = Arc::new(AppState { db, config, metrics_handle });
    let app = router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "vivah-admin starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
