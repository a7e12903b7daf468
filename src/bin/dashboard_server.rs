//! Веб-дашборд: мок-цены, прогнозы, настройки и симуляция сделок
//! Доступен по IP адресу для просмотра в браузере

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use crypto_dashboard::api::{AppState, create_router};
use crypto_dashboard::utils::config::ServerConfig;
use crypto_dashboard::utils::logging::init_logging;
use crypto_dashboard::{Catalog, SettingsStore};

#[derive(Parser, Debug)]
#[command(name = "dashboard_server", about = "Mock crypto dashboard backend")]
struct Args {
    /// YAML config file (see config/dashboard.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override bind host
    #[arg(long)]
    host: Option<String>,

    /// Override bind port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    init_logging(&config.log_level);

    let settings = config
        .initial_settings()
        .context("invalid settings seed in configuration")?;
    log::info!(
        "⚙️ Стартовые настройки: risk={}%, max_trades={}, leverage={}x, market={}, keys={:?}",
        settings.risk_percentage,
        settings.max_trades_per_day,
        settings.default_leverage,
        settings.preferred_market.as_str(),
        settings.api_keys
    );

    let catalog = Catalog::mock();
    log::info!("💰 Каталог: {} валют", catalog.len());

    let state = AppState::new(catalog, SettingsStore::new(settings));
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    log::info!("🚀 Dashboard server starting on http://{}", addr);
    log::info!("📊 Access from browser: http://localhost:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("received Ctrl-C, shutting down");
}
