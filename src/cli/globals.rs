use crate::{
    APP_USER_AGENT,
    authn::{
        AcceptOrgUsersHandler, AllowList, AuthenticationChain, ConvertCasePrincipalNameTransformer,
        CredentialNormalizer, DigestPasswordEncoder, HttpTokenExchange, NoOpPasswordEncoder,
        NoOpPrincipalNameTransformer, PasswordEncoder, PrincipalNameTransformer,
        TokenExchangeOptions,
    },
    cli::commands::authn::Options,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, warn};

pub const HANDLER_NAME: &str = "accept-org-users";

/// Settings shared by every action.
#[derive(Clone)]
pub struct GlobalArgs {
    pub auth_url: String,
    pub users: AllowList,
    pub token_options: TokenExchangeOptions,
    pub principal_name_transformer: Arc<dyn PrincipalNameTransformer>,
    pub password_encoder: Arc<dyn PasswordEncoder>,
}

impl GlobalArgs {
    /// # Errors
    /// Returns an error if a `--user` entry is malformed.
    pub fn from_options(options: &Options) -> Result<Self> {
        let users = AllowList::parse(&options.users).context("invalid --user value")?;

        let principal_name_transformer: Arc<dyn PrincipalNameTransformer> =
            match options.username_case {
                Some(conversion) => Arc::new(ConvertCasePrincipalNameTransformer::new(conversion)),
                None => Arc::new(NoOpPrincipalNameTransformer),
            };

        let password_encoder: Arc<dyn PasswordEncoder> = match options.password_encoding {
            Some(algorithm) => Arc::new(DigestPasswordEncoder::new(algorithm)),
            None => Arc::new(NoOpPasswordEncoder),
        };

        Ok(Self {
            auth_url: options.auth_url.clone(),
            users,
            token_options: TokenExchangeOptions {
                timeout: options.timeout,
                connect_timeout: options.connect_timeout,
            },
            principal_name_transformer,
            password_encoder,
        })
    }

    /// Build the allow-list handler and wrap it in a chain.
    ///
    /// # Errors
    /// Returns an error if the token service URL is invalid.
    pub fn chain(&self) -> Result<AuthenticationChain> {
        if self.users.is_empty() {
            warn!("no users configured, every login will fail");
        }

        let exchange = HttpTokenExchange::new(APP_USER_AGENT, &self.auth_url, self.token_options)
            .context("invalid --auth-url")?;

        debug!("token service: {}", exchange.base_url());

        let handler = AcceptOrgUsersHandler::new(HANDLER_NAME, self.users.clone(), Arc::new(exchange))
            .with_normalizer(CredentialNormalizer::new(
                self.principal_name_transformer.clone(),
                self.password_encoder.clone(),
            ));

        Ok(AuthenticationChain::new().with_handler(Arc::new(handler)))
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("auth_url", &self.auth_url)
            .field("users", &self.users)
            .field("token_options", &self.token_options)
            .finish_non_exhaustive()
    }
}
