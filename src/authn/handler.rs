//! Authentication strategies.
//!
//! Flow Overview for [`AcceptOrgUsersHandler`]: normalize the credential,
//! match it against the allow-list, then exchange the original username and
//! password for an organization token. Only a local match reaches the network.

use super::{
    TOKEN_ATTRIBUTE,
    allow_list::{AllowList, AllowListVerifier},
    credential::Credential,
    error::AuthenticationError,
    is_blank,
    normalize::CredentialNormalizer,
    principal::{Attributes, DefaultPrincipalFactory, HandlerResult, PrincipalFactory},
    token::TokenExchange,
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

#[async_trait]
pub trait AuthenticationHandler: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this handler can judge `credential` at all.
    fn supports(&self, credential: &Credential) -> bool;

    /// Verify `credential`, normalizing it in place.
    ///
    /// # Errors
    /// Returns the classified `AuthenticationError` for the first failing step.
    async fn authenticate(
        &self,
        credential: &mut Credential,
    ) -> Result<HandlerResult, AuthenticationError>;
}

/// Accepts a fixed set of users, then asks the organization's token service
/// for a token to attach to the principal.
pub struct AcceptOrgUsersHandler {
    name: String,
    normalizer: CredentialNormalizer,
    verifier: AllowListVerifier,
    token_exchange: Arc<dyn TokenExchange>,
    principal_factory: Arc<dyn PrincipalFactory>,
}

impl AcceptOrgUsersHandler {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        users: AllowList,
        token_exchange: Arc<dyn TokenExchange>,
    ) -> Self {
        Self {
            name: name.into(),
            normalizer: CredentialNormalizer::default(),
            verifier: AllowListVerifier::new(users),
            token_exchange,
            principal_factory: Arc::new(DefaultPrincipalFactory),
        }
    }

    #[must_use]
    pub fn with_normalizer(mut self, normalizer: CredentialNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    #[must_use]
    pub fn with_principal_factory(mut self, principal_factory: Arc<dyn PrincipalFactory>) -> Self {
        self.principal_factory = principal_factory;
        self
    }

    /// Replace the accepted users atomically.
    pub fn set_users(&self, users: AllowList) {
        self.verifier.replace(users);
    }
}

#[async_trait]
impl AuthenticationHandler for AcceptOrgUsersHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, credential: &Credential) -> bool {
        !is_blank(credential.organization())
    }

    async fn authenticate(
        &self,
        credential: &mut Credential,
    ) -> Result<HandlerResult, AuthenticationError> {
        // The token service expects what the user typed, not the normalized form.
        let original = credential.clone();

        self.normalizer.normalize(credential)?;

        let username = self.verifier.verify(credential).inspect_err(|error| {
            debug!(
                "{} rejected {} in org {}: {}",
                self.name,
                credential.username(),
                credential.organization(),
                error
            );
        })?;

        let token = self
            .token_exchange
            .exchange(
                original.organization(),
                original.username(),
                original.password(),
            )
            .await
            .map_err(|source| {
                debug!(
                    "{} was not found in org {}: {}",
                    username,
                    original.organization(),
                    source
                );
                AuthenticationError::TokenExchange {
                    organization: original.organization().to_string(),
                    source,
                }
            })?;

        let mut attributes = Attributes::new();
        attributes.insert(TOKEN_ATTRIBUTE.to_string(), Value::String(token));

        let principal = self.principal_factory.create_principal(&username, attributes);

        info!("{} authenticated {} in org {}", self.name, username, original.organization());

        Ok(HandlerResult {
            handler: self.name.clone(),
            organization: original.organization().to_string(),
            principal,
        })
    }
}

impl std::fmt::Debug for AcceptOrgUsersHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcceptOrgUsersHandler")
            .field("name", &self.name)
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}
