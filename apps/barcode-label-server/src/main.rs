//! Barcode Label Server
//!
//! Renders batches of codes into printable Code-128 label PDFs and returns
//! a download URL for the merged document.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use barcode_label_server::config::{Config, PublishMode};
use barcode_label_server::routes;
use barcode_label_server::state::AppState;
use barcode_label_server::storage::{LocalPublisher, Publisher, S3Publisher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "barcode_label_server=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting Barcode Label Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Publish mode: {}", config.publish.mode.as_str());

    // The storage client is built once here and shared by every request
    let app_state = match config.publish.mode {
        PublishMode::S3 => {
            tracing::info!("S3 endpoint: {}", config.storage.endpoint);
            tracing::info!("S3 bucket: {}", config.storage.bucket);
            let publisher: Arc<dyn Publisher> = Arc::new(S3Publisher::new(&config.storage).await);
            AppState::new(config.clone(), publisher, None)
        }
        PublishMode::Local => {
            let local = LocalPublisher::new(
                &config.publish.local_dir,
                config.publish.public_base_url.clone(),
            )
            .await
            .context("Failed to prepare local artifact directory")?;
            AppState::with_local_publisher(config.clone(), local)
        }
    };

    let app = routes::app(app_state);

    // Start server with graceful shutdown
    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid SERVER_HOST: {}", config.server.host))?;
    let addr = SocketAddr::new(host, config.server.port);
    tracing::info!("Barcode Label Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
