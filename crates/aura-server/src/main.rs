mod api;
mod composer;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = aura_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = aura_db::PoolConfig::from_app_config(&config);
    let pool = aura_db::connect_pool(&config.database_url, pool_config).await?;
    aura_db::run_migrations(&pool).await?;

    if matches!(config.env, aura_core::Environment::Development) {
        let seeded = aura_db::seed_demo_catalog(&pool).await?;
        if seeded > 0 {
            tracing::info!(products = seeded, "seeded demo catalog");
        }
    }

    let genai = match aura_genai::GenAiSettings::from_app_config(&config) {
        Some(settings) => {
            let client = aura_genai::GenAiClient::new(&settings)?;
            tracing::info!(model = client.model(), "generative chat fallback enabled");
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set; chat falls back to the fixed apology");
            None
        }
    };

    let app = build_app(AppState { pool, genai });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
