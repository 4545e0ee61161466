use std::sync::Arc;

use log::{error, info};

use crate::{
    app::AppState,
    config::ServerConfig,
    email::{ArcMailRelay, LettreMailRelay},
};

mod app;
mod config;
mod email;
mod http;
mod logs;
mod util;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env().expect("Invalid server configuration");
    logs::init_logger(config.log.as_ref()).expect("Failed to initialize logger");

    let mail_relay: ArcMailRelay = Arc::new(Box::new(LettreMailRelay));
    let app_state = AppState::new(mail_relay);

    info!("Starting mail relay");

    if let Err(e) = http::run(app_state, &config, shutdown_signal()).await {
        error!("HTTP API failed: {}", e);
        std::process::exit(1);
    }
}
