use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

use mindhaven_classifiers::BertStateClassifier;
use mindhaven_llm::HfRouterClient;
use mindhaven_server::cli::Cli;
use mindhaven_server::config::{self, ServerConfig};
use mindhaven_server::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    info!("Starting MindHaven server");

    // Load configuration
    let config = ServerConfig::load(&cli.config, &cli)?;
    info!("Configuration loaded successfully");
    info!("Router: {}", config.router_url);
    info!("Classifier model: {}", config.classifier_model);
    info!("Chat model: {}", config.chat_model);

    // The provider token is a startup precondition; refuse to serve
    // without it.
    let token = config::load_hf_token()?;

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    // Load the classification model; a failure here is fatal and the
    // service never binds its listener.
    info!("Loading state classifier...");
    let classifier = {
        let repo = config.classifier_model.clone();
        let device = config.device.clone();
        let token = token.clone();
        tokio::task::spawn_blocking(move || BertStateClassifier::load(&repo, &token, &device))
            .await??
    };

    let chat_client = HfRouterClient::new(
        config.router_url.clone(),
        token,
        config.chat_model.clone(),
        config.temperature,
        config.max_reply_tokens,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    // Initialize application state
    let state = AppState::new(
        config,
        Arc::new(classifier),
        Arc::new(chat_client),
        metrics_handle,
    )?;
    info!("Application state initialized successfully");

    // Build and run the server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", cli.listen, cli.port).parse()?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("mindhaven=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mindhaven=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "mindhaven_requests_total",
        "Total number of chat requests received"
    );
    metrics::describe_counter!(
        "mindhaven_crisis_total",
        "Total number of requests answered by the crisis override"
    );
    metrics::describe_counter!(
        "mindhaven_fallback_total",
        "Total number of replies served from the fixed fallback text"
    );
    metrics::describe_counter!("mindhaven_errors_total", "Total number of errors by kind");
    metrics::describe_histogram!(
        "mindhaven_stage_latency_us",
        metrics::Unit::Microseconds,
        "Pipeline stage latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
