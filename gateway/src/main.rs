//! Gateway main entry point
//!
//! Serves every known gRPC service on one cleartext HTTP/2 listener.

use std::process::ExitCode;

use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway_lib::{GatewayConfig, GatewayServer};

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "gateway=info,gateway_lib=info";

async fn run_server(config: GatewayConfig) -> error::Result<()> {
    let server = GatewayServer::new(config)?;
    server.serve(shutdown_signal()).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    if std::env::args().skip(1).any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return ExitCode::SUCCESS;
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = GatewayConfig::from_env();
    tracing::info!("Starting Gateway v{}", config.version);

    match run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Gateway failed");
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
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
        () = ctrl_c => tracing::info!("Received Ctrl+C"),
        () = terminate => tracing::info!("Received SIGTERM"),
    }
}

fn print_help() {
    println!("Gateway - serves gRPC services over cleartext HTTP/2");
    println!();
    println!("Usage:");
    println!("  gateway                  Run the gateway");
    println!("  gateway --help           Show this help");
    println!();
    println!("Environment Variables:");
    println!("  GATEWAY_ADDR             Listen address (default: localhost:8090)");
    println!("  GATEWAY_API_PREFIX       Shared API prefix, empty to disable");
    println!("                           (default: /api/infrastructure/v1)");
    println!("  GATEWAY_REFLECTION       Serve gRPC reflection (default: true)");
    println!("  RUST_LOG                 Log filter (default: {})", DEFAULT_LOG_FILTER);
}
