mod config;
mod error;
mod routes;

use std::sync::Arc;

use config::AppConfig;
use routes::{app_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(debug_assertions)]
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("circuledge_api=info".parse().expect("valid directive"))
                .add_directive("circuledge_core=info".parse().expect("valid directive")),
        )
        .init();

    let config = Arc::new(AppConfig::from_env()?);
    tracing::info!("Starting circuledge-api with config: {:?}", config);
    if config.conflict_test_channels {
        tracing::warn!(
            channel = %config.conflict_test_path,
            "Conflict test channel enabled; every update there will conflict"
        );
    }

    let state = AppState::from_config(config);
    let bind_addr = state.config.bind_addr.clone();
    let router = app_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("circuledge-api listening on {}", bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}
