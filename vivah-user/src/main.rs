use std::sync::Arc;

use vivah_shared::clients::db::create_pool;
use vivah_user::config::AppConfig;
use vivah_user::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vivah_shared::middleware::init_tracing("vivah-user");

    let config = AppConfig::load()?;
    let port = config.port;

    std::env::set_var("JWT_SECRET", &config.jwt_secret);

    let db = create_pool(&config.database_url, config.db_pool_size)?;
    let state = Arc::new(AppState { db, config });
    let app = router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "vivah-user starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
