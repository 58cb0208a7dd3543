//! vehicle-advisor HTTP Server
//!
//! Axum-based server exposing the dealership chat, the catalog tools and the
//! static chat page.

mod config;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{LlmProvider, ToolRegistry};
use agent_runtime::OllamaProvider;
use vehicle_advisor::{CatalogConfig, CatalogStore, ChatEngine, GenerativeFallback, MemoryCatalogStore, PgCatalogStore};

use crate::config::{CatalogBackend, ServerConfig};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Catalog
    let catalog: Arc<dyn CatalogStore> = match config.catalog_backend {
        CatalogBackend::Memory => {
            tracing::warn!("⚠ Using the built-in demo catalog (CATALOG_BACKEND=memory)");
            Arc::new(MemoryCatalogStore::demo())
        }
        CatalogBackend::Postgres => {
            let catalog_config = CatalogConfig::from_env()?;
            let store = PgCatalogStore::connect(&catalog_config)
                .await
                .context("catalog database is unreachable")?;
            Arc::new(store)
        }
    };
    tracing::info!("✓ Catalog ready ({})", catalog.name());

    // Tools
    let mut tools = ToolRegistry::new();
    vehicle_advisor::register_tools(&mut tools, &catalog);

    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    // Engine, optionally backed by a generative model
    let mut engine = ChatEngine::new(Arc::clone(&catalog));
    let mut provider: Option<Arc<dyn LlmProvider>> = None;

    if config.llm_fallback {
        let ollama = Arc::new(OllamaProvider::from_env());
        let options = ollama.default_options();

        match ollama.health_check().await {
            Ok(true) => {
                tracing::info!("✓ Connected to Ollama ({})", options.model);
                if let Ok(models) = ollama.list_models().await {
                    for model in models {
                        tracing::info!("  Model: {}", model.id);
                    }
                }
            }
            Ok(false) | Err(_) => {
                tracing::warn!("⚠ Ollama not available - unrecognized messages get the help text");
                tracing::warn!("  Make sure Ollama is running: ollama serve");
            }
        }

        let shared: Arc<dyn LlmProvider> = ollama;
        engine = engine.with_fallback(GenerativeFallback::new(Arc::clone(&shared), options, &tools));
        provider = Some(shared);
    }

    let state = AppState {
        engine: Arc::new(engine),
        tools: Arc::new(tools),
        catalog,
        provider,
        request_timeout: config.request_timeout,
    };

    let app = routes::router(state, &config.static_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚗 vehicle-advisor running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health          - Health check");
    tracing::info!("  POST /chat            - Send message");
    tracing::info!("  POST /api/chat        - Send message");
    tracing::info!("  GET  /api/tools       - Tool schemas");
    tracing::info!("  POST /api/tools/call  - Execute a tool");
    tracing::info!("  GET  /                - Chat page ({})", config.static_dir.display());

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
