use crate::{GIT_COMMIT_HASH, authn::AuthenticationChain};
use axum::{
    extract::Extension,
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Json},
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    handlers: usize,
}

// axum handler for health
pub async fn health(chain: Extension<Arc<AuthenticationChain>>) -> impl IntoResponse {
    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        handlers: chain.0.len(),
    };

    let short_hash = GIT_COMMIT_HASH.get(0..7).unwrap_or("");

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!(
        "{}:{}:{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_hash
    )) {
        headers.insert("X-App", value);
    }

    (headers, Json(health))
}
