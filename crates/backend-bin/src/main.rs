use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use backend_lib::{config::Settings, router, AppState};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// EventHub API server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = backend_lib::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the bind address from the configuration
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Emit logs as JSON lines
    #[arg(long, env = "EVENTHUB_LOG_JSON")]
    log_json: bool,
}

fn init_tracing(default_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut settings = Settings::load_from(&args.config)
        .with_context(|| format!("loading settings from {}", args.config.display()))?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }

    init_tracing(&settings.log_level, args.log_json);
    info!(?settings, "configuration loaded");

    let addr = settings.bind_addr;
    let state = Arc::new(AppState::from_settings(settings)?);
    let app = router::create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
