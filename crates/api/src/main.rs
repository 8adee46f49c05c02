use std::future::IntoFuture;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use dataurl_api::config::{Cli, ServerConfig};
use dataurl_api::router::build_app_router;
use dataurl_api::state::AppState;
use dataurl_api::telemetry;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from(Cli::parse());

    // --- Tracing ---
    if let Err(e) = telemetry::init_tracing(config.log_format) {
        eprintln!("Failed to install log subscriber: {e}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => {
            tracing::info!("Graceful shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = ?e, "Server exited with error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    tracing::info!(
        %addr,
        max_upload_bytes = config.max_upload_bytes,
        request_timeout_secs = config.request_timeout_secs,
        "Loaded server configuration"
    );

    // --- Router ---
    let state = AppState {
        config: Arc::new(config),
    };
    let app = build_app_router(state);

    // --- Start server ---
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    tracing::info!(%addr, "Starting server");

    let shutdown = CancellationToken::new();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .into_future();

    // Drain in-flight requests, but not for longer than the grace period.
    let grace_elapsed = async {
        shutdown.cancelled().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => result.context("Server error")?,
        () = grace_elapsed => {
            tracing::warn!(
                grace_secs = grace.as_secs(),
                "Shutdown grace period elapsed with requests still in flight"
            );
        }
    }

    Ok(())
}

/// Wait for a termination signal, then cancel `token`.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }

    token.cancel();
}
