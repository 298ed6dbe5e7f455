use anyhow::Result;
use axum::Router;
use grid_forecast_service::{api, config, service, telemetry};
use config::Config;
use service::AppState;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;
    init_tracing(&cfg.logging);

    let app_state = AppState::new(cfg.clone());

    #[allow(unused_mut)]
    let mut app: Router = api::router(app_state);

    #[cfg(feature = "metrics")]
    {
        app = api::with_metrics(app);
    }

    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("Server binding to 0.0.0.0 - service will be accessible from the network");
    }

    if cfg.generator.random_seed.is_some() {
        warn!("generator.random_seed is set - synthetic history repeats on every request");
    }

    info!(%addr, "starting Grid Forecast Service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
