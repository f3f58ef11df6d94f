use crate::authn::AuthenticationChain;
use anyhow::{Context, Result};
use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod handlers;

/// Build the router for a configured authentication chain.
#[must_use]
pub fn router(chain: Arc<AuthenticationChain>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/login", post(handlers::login))
        .layer(Extension(chain))
        .layer(TraceLayer::new_for_http())
}

/// Start the server
/// # Errors
/// Return error if failed to bind or serve
pub async fn new(port: u16, chain: Arc<AuthenticationChain>) -> Result<()> {
    let listener = TcpListener::bind(format!("::0:{port}"))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, router(chain).into_make_service()).await?;

    Ok(())
}
