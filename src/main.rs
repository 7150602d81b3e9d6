mod app;
mod auth;
mod chat;
mod config;
mod error;
mod state;

use crate::config::RuntimeEnv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let default_filter = if RuntimeEnv::detect().is_production() {
        "chatmind=info,axum=info,tower_http=warn"
    } else {
        "chatmind=debug,axum=info,tower_http=info"
    };
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
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

    let app_state = state::AppState::init().await?;

    if let Err(e) = sqlx::migrate!("./migrations").run(&app_state.db).await {
        tracing::warn!(error = %e, "migration failed; continuing with the existing schema");
    }

    let app = app::build_app(app_state);
    app::serve(app).await
}
