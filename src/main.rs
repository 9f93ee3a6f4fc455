use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use crate::api::AppState;
use crate::auth::TokenAuth;
use crate::clients::gemini::GeminiClient;
use crate::config::Config;
use crate::services::dashboard::{self, DashboardCache};
use crate::services::suggestion::SuggestionService;
use crate::store::WorkoutStore;

mod api;
mod auth;
mod clients;
mod config;
mod error;
mod models;
mod scheduler;
mod services;
mod store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let gemini_client = GeminiClient::new(&config)?;
    let store = WorkoutStore::new();
    let dashboard = DashboardCache::new(config.stats_utc_offset);

    let state = AppState {
        auth: TokenAuth::from_pairs(&config.auth_tokens)?,
        store: store.clone(),
        dashboard: dashboard.clone(),
        suggestion_service: SuggestionService::new(gemini_client),
    };

    tokio::spawn(dashboard::listen_for_snapshots(
        dashboard,
        store.clone(),
        store.subscribe(),
    ));
    let _scheduler = scheduler::start_scheduler(state.clone()).await?;

    let app = api::router(state).layer(cors_layer(&config)?);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = %config.port, model = %config.gemini_model, "server.listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    Ok(match &config.cors_allow_origin {
        Some(origin) => layer.allow_origin(origin.parse::<HeaderValue>()?),
        None => layer.allow_origin(Any),
    })
}
