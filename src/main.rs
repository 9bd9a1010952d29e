use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use kubeagent_core::app_state::build_app_state;
use kubeagent_core::core::client::kube_client::ClusterConnector;
use kubeagent_core::core::config::app_config::AppConfig;
use kubeagent_core::core::logging::init_tracing;
use kubeagent_core::domain::llm::service::backend_selector::{build_model, configure};
use kubeagent_core::routes::app_router;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let _guard = init_tracing(config.server.log_dir.as_deref());

    // The backend must be unambiguous before any tool is registered.
    let backend = configure(&config.llm).map_err(|e| {
        error!("Invalid reasoning backend configuration: {}", e);
        e
    })?;
    info!("LLM_TYPE={}", backend.llm_type().as_code());
    let model = build_model(backend)?;

    let connector = Arc::new(ClusterConnector::from_settings(&config.cluster));
    if config.cluster.eager_connect {
        connector
            .client()
            .await
            .context("Cluster connection failed at startup")?;
    } else {
        info!("Cluster connection will be resolved on first tool call");
    }

    let state = build_app_state(connector, model, config.server.max_agent_steps);
    let app = app_router().with_state(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
