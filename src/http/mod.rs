use axum::{
    Router,
    routing::{get, post},
};
use log::info;

use crate::{app::AppState, config::ServerConfig};

mod send;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(send::root))
        .route("/send-email/", post(send::send_email))
        .route("/send-email", post(send::send_email))
        .with_state(app_state)
}

pub async fn run(
    app_state: AppState,
    config: &ServerConfig,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;

    info!("HTTP API listening on {}", listener.local_addr()?);
    axum::serve(listener, router(app_state))
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("HTTP API shut down gracefully");
    Ok(())
}
