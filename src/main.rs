use incident_intel::{
    api::{build_router, AppState},
    config::{Config, ObservabilityConfig},
    enrichment::{EngineOptions, EnrichmentEngine},
    llm::{GroqClient, LanguageModel},
    store::{IncidentStore, TableApiStore},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config.observability);

    tracing::info!(
        "Starting {} v{}",
        config.observability.service_name,
        env!("CARGO_PKG_VERSION")
    );

    // Connect the incident table API
    let store: Arc<dyn IncidentStore> = Arc::new(TableApiStore::from_config(&config.table_api)?);
    tracing::info!(instance = %config.table_api.base_url, "✅ Incident table client initialized");

    // Connect the language model
    let model: Arc<dyn LanguageModel> = Arc::new(GroqClient::from_config(&config.model)?);
    tracing::info!(model = %config.model.model, "✅ Language model client initialized");

    // Build the enrichment engine
    let engine = Arc::new(EnrichmentEngine::new(
        store,
        model,
        EngineOptions::from_config(&config),
    ));
    tracing::info!("✅ Enrichment engine initialized");

    // Build HTTP router
    let app = build_router(AppState::new(engine));

    // Start HTTP server
    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;

    tracing::info!("🚀 HTTP API server listening on http://{}", http_addr);
    tracing::info!("   Health check: http://{}/health", http_addr);
    tracing::info!("   Enrichment: POST http://{}/v1/enrich", http_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                tracing::error!("HTTP server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Shutting down gracefully...");
    Ok(())
}

fn init_tracing(observability: &ObservabilityConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("incident_intel={},tower_http=info", observability.log_level).into()
    });

    if observability.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
