use axum::{routing::get, Router};
use log::{error, info};
use std::net::SocketAddr;

pub const LIVENESS_TEXT: &str = "I'm alive!";

pub fn build_router() -> Router {
    Router::new().route("/", get(home))
}

async fn home() -> &'static str {
    LIVENESS_TEXT
}

pub async fn serve(port: u16) -> Result<(), std::io::Error> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Liveness endpoint listening on {}", addr);
    axum::serve(listener, build_router()).await
}

/// runs the keep-alive endpoint in the background; the bot keeps going if it fails
pub fn spawn(port: u16) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = serve(port).await {
            error!("Liveness endpoint on port {} stopped: {}", port, e);
        }
    })
}
