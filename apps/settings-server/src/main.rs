use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use axum::Router;
use clap::Parser;
use settings_store::{Config, SettingsStoreModule};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Serve the settings store over HTTP
#[derive(Debug, Parser)]
#[command(name = "settings-server", version, about)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "SETTINGS_STORE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8087")]
    bind: SocketAddr,

    /// Emit JSON structured logs
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    let builder = fmt().with_env_filter(env_filter).with_target(false);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.json_logs);

    let cfg = Config::load(args.config.as_deref())?;
    info!(storage = cfg.storage.kind(), blob = %cfg.blob_name, "loaded configuration");

    let module = SettingsStoreModule::new();
    module.init(cfg).await.context("initializing settings store")?;

    let router = module
        .register_rest(Router::new())?
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    info!(addr = %args.bind, "settings server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("settings server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
