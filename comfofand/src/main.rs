//! comfofan Server
//!
//! REST API server exposing a ComfoConnect ventilation unit as a fan.
//!
//! The daemon drives an in-process simulated bridge; the fan entity, its
//! validation rules and the push-update loop are the same ones a hardware
//! bridge would use.

mod api;
mod config;

use anyhow::Result;
use api::AppState;
use clap::Parser;
use comfofan_bridge::{SimulatedBridge, VentilationBridge, VentilationFan};
use comfofan_core::default_config_path;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// comfofan API Server
#[derive(Parser, Debug)]
#[command(name = "comfofand")]
#[command(version, about = "ComfoConnect ventilation fan API server", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server bind address
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.verbose);

    info!("comfofan server starting...");

    // Config path: CLI flag > env var > default
    let config_path = args.config.unwrap_or_else(|| {
        std::env::var("COMFOFAN_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_path())
    });
    info!("Configuration file: {}", config_path.display());

    let static_config = config::load(&config_path).await?;
    let port = args.port.unwrap_or(static_config.server.port);
    let bind_addr = format!("{}:{}", args.bind, port);

    // Bridge and fan entity
    let bridge_config = &static_config.bridge;
    let bridge = Arc::new(SimulatedBridge::with_initial_state(
        bridge_config.uuid.clone(),
        bridge_config.initial_speed,
        bridge_config.initial_mode,
    ));
    let shared_bridge: Arc<dyn VentilationBridge> = bridge.clone();
    let fan = Arc::new(VentilationFan::new(shared_bridge, bridge_config.name.clone()));
    info!(
        "Fan '{}' ready (unique id {})",
        fan.name(),
        fan.unique_id()
    );

    let update_fan = fan.clone();
    let update_task = tokio::spawn(async move {
        if let Err(e) = update_fan.run_updates().await {
            error!("Bridge update loop stopped: {}", e);
        }
    });

    // Seed the entity with the unit's current state
    bridge.publish_state();

    let app = api::create_router(AppState::new(fan));

    info!("Starting server on {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("comfofan API server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    update_task.abort();
    if let Err(e) = update_task.await {
        if !e.is_cancelled() {
            warn!("Update task ended abnormally: {}", e);
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

/// Initialize tracing subscriber for logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
