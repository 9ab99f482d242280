mod app;
mod auth;
mod categories;
mod config;
mod db;
mod error;
mod extract;
mod products;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "inventory_api=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let db = db::connect(&config).await?;
    db::migrate(&db).await?;
    tracing::info!(
        issuer = %config.jwt.issuer,
        ttl_minutes = config.jwt.ttl_minutes,
        public_paths = ?config.public_paths,
        "configuration loaded"
    );

    let state = AppState::from_pool(&config, db)?;
    app::serve(app::build_app(state)).await
}
