//! Organization-scoped token exchange.
//!
//! Posts the username/password pair to `<base>/auth/<organization>/token` and
//! returns the response body verbatim as an opaque token.

use super::{error::TokenExchangeError, is_blank};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, header::ACCEPT};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{Instrument, debug, info_span};
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Largest token service response body that is read.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Exchange a username/password pair for a token issued by `organization`.
    ///
    /// # Errors
    /// Returns `TokenExchangeError` for any transport, status or body failure.
    async fn exchange(
        &self,
        organization: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<String, TokenExchangeError>;
}

#[derive(Debug, Clone, Copy)]
pub struct TokenExchangeOptions {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for TokenExchangeOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpTokenExchange {
    client: Client,
    base_url: Url,
}

impl HttpTokenExchange {
    /// Build a client for the token service at `base_url`.
    ///
    /// # Errors
    /// Returns an error if `base_url` is not an absolute http(s) URL or the
    /// HTTP client cannot be built.
    pub fn new(user_agent: &str, base_url: &str, options: TokenExchangeOptions) -> Result<Self> {
        let base_url = Url::parse(base_url)?;

        match base_url.scheme() {
            "http" | "https" => {}
            scheme => anyhow::bail!("Error parsing URL: unsupported scheme {scheme}"),
        }

        if base_url.cannot_be_a_base() || base_url.host().is_none() {
            anyhow::bail!("Error parsing URL: no host specified");
        }

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Token endpoint for `organization`; the organization is always a single
    /// path segment.
    ///
    /// # Errors
    /// Returns `Endpoint` if the organization is blank.
    pub fn endpoint_url(&self, organization: &str) -> Result<Url, TokenExchangeError> {
        if is_blank(organization) {
            return Err(TokenExchangeError::Endpoint(
                "organization is blank".to_string(),
            ));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TokenExchangeError::Endpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["auth", organization, "token"]);

        debug!("endpoint URL: {}", url);

        Ok(url)
    }
}

#[async_trait]
impl TokenExchange for HttpTokenExchange {
    async fn exchange(
        &self,
        organization: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<String, TokenExchangeError> {
        let token_url = self.endpoint_url(organization)?;

        let payload = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let span = info_span!(
            "token.exchange",
            http.method = "POST",
            url = %token_url,
            organization = %organization
        );

        let response = self
            .client
            .post(token_url.as_str())
            .header(ACCEPT, "application/json")
            .json(&payload)
            .send()
            .instrument(span)
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = read_body(response).await.unwrap_or_default();

            return Err(TokenExchangeError::Rejected {
                status,
                message: error_message(&body),
            });
        }

        let token = read_body(response).await?;

        if is_blank(&token) {
            return Err(TokenExchangeError::EmptyBody);
        }

        Ok(token)
    }
}

async fn read_body(mut response: reqwest::Response) -> Result<String, TokenExchangeError> {
    if response
        .content_length()
        .is_some_and(|len| len > MAX_BODY_BYTES as u64)
    {
        return Err(TokenExchangeError::BodyTooLarge(MAX_BODY_BYTES));
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(TokenExchangeError::BodyTooLarge(MAX_BODY_BYTES));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}

// Prefer a JSON `message`/`error` field, fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("message")
                .or_else(|| json.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
