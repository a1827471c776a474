//! Demand dashboard API server
//!
//! Serves raw demand rows, merged chart data and streamed outlier
//! explanations over HTTP. Data is read from the CSV directory at startup
//! and on `POST /api/reload`.

use demandlens::config::{self, DashboardConfig};
use demandlens::core::http::start_server;
use demandlens::logging;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let port = config::get_port();
    let dashboard = DashboardConfig::from_env()?;

    info!("Starting demand dashboard API server");
    info!(environment = %config::get_environment(), "Environment");
    info!(
        data_dir = %dashboard.data_dir.display(),
        real_today = %dashboard.real_today,
        "Data source"
    );
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, dashboard).await {
            error!(error = %e, "HTTP server error");
        }
    });

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
