use crate::authn::{AuthenticationChain, ChainError, Credential, FailureKind};
use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Deserialize)]
pub struct LoginRequest {
    organization: String,
    username: String,
    password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("organization", &self.organization)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

// axum handler for login
#[instrument(skip(chain))]
pub async fn login(
    chain: Extension<Arc<AuthenticationChain>>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let credential = Credential::new(request.organization, request.username, request.password);

    match chain.0.authenticate(&credential).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(error) => {
            debug!("login failed: {}", error);
            let (status, kind) = failure_status(&error);
            (status, Json(json!({ "error": kind }))).into_response()
        }
    }
}

// Unknown user and wrong password share one response to avoid user enumeration.
fn failure_status(error: &ChainError) -> (StatusCode, &'static str) {
    match error.kind() {
        None => (StatusCode::BAD_REQUEST, "unsupported_credential"),
        Some(FailureKind::ConfigurationEmpty) => (
            StatusCode::SERVICE_UNAVAILABLE,
            FailureKind::ConfigurationEmpty.as_str(),
        ),
        Some(FailureKind::IdentityNotFound | FailureKind::BadCredentials) => {
            (StatusCode::UNAUTHORIZED, "invalid_credentials")
        }
    }
}
