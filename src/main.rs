mod app;
mod auth;
mod config;
mod db;
mod error;
mod extract;
mod notifications;
mod state;
#[cfg(test)]
mod testing;
mod users;

use crate::{app::build_app, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "finance_tracker=debug,axum=info,tower_http=info".to_string());
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

    let (app_state, db) = AppState::init().await?;

    sqlx::migrate!("./migrations").run(&db).await?;
    tracing::info!("database migrations applied");

    app::serve(build_app(app_state)).await
}
