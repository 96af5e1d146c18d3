//! Stock advisor web server
//!
//! # Usage
//!
//! ```bash
//! # Put the API keys, SECRET_KEY and STOCK_ADVISOR_USERS in .env, then
//! cargo run --bin stock-advisor -p stock-advisor
//! ```

use agent_utils::init_tracing;
use stock_advisor::{AdvisorConfig, AppState, create_router};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AdvisorConfig::from_env()?;
    init_tracing(config.log_format, "info,stock_advisor=info");
    info!(?config, "starting stock advisor");

    if !config.require_login {
        warn!("login is not required for /home");
    }

    let app = create_router(AppState::from_config(&config)?);
    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("received ctrl-c, shutting down");
}
