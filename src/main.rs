use std::sync::Arc;

use sage::api::{self, app_state::AppState};
use sage::config::loader::ConfigLoader;
use sage::context::ContextStore;
use sage::model::create_generative_model;
use sage::observability::{AppMetrics, ObservabilityState, create_observability_router, init_tracing};
use sage::services::generation::create_response_generator;
use sage::services::keepalive::KeepaliveService;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load()?;
    let _log_guard = init_tracing(&config.logging, &config.app_name);

    info!("Starting Sage...");
    if !sage::config::loader::config_exists() {
        info!("No config.toml found, using defaults and environment");
    }
    info!("Configuration loaded successfully");

    // 缺失 API 密钥是致命错误，进程不启动
    ConfigLoader::validate(&config)?;
    info!("Configuration validated");

    let model = create_generative_model(&config.model)?;
    info!(
        "Generative model client initialized: {} ({})",
        config.model.model_name, config.model.endpoint
    );

    let context_store = Arc::new(ContextStore::new(config.context.max_history));
    info!(
        "Context store initialized (max_history={})",
        config.context.max_history
    );

    let response_generator = create_response_generator(model.clone());
    info!("Response generator initialized");

    let metrics = Arc::new(AppMetrics::default());

    if config.keepalive.enabled {
        let keepalive = KeepaliveService::new(config.keepalive.clone())?;
        keepalive.spawn();
        info!("Keepalive loop spawned");
    }

    let app_state = AppState::new(context_store, response_generator, model, metrics.clone());
    info!("Application state created");

    let observability_state = Arc::new(ObservabilityState::new(
        env!("CARGO_PKG_VERSION").to_string(),
        metrics,
    ));
    let api_router = api::create_router(app_state);
    let router = create_observability_router(observability_state).merge(api_router);
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
