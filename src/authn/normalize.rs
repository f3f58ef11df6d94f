use super::{
    credential::Credential,
    error::AuthenticationError,
    is_blank,
    transform::{
        NoOpPasswordEncoder, NoOpPrincipalNameTransformer, PasswordEncoder,
        PrincipalNameTransformer,
    },
};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::debug;

/// Applies the username transform and password encoding, rejecting blank
/// values before and after each step.
#[derive(Clone)]
pub struct CredentialNormalizer {
    principal_name_transformer: Arc<dyn PrincipalNameTransformer>,
    password_encoder: Arc<dyn PasswordEncoder>,
}

impl Default for CredentialNormalizer {
    fn default() -> Self {
        Self {
            principal_name_transformer: Arc::new(NoOpPrincipalNameTransformer),
            password_encoder: Arc::new(NoOpPasswordEncoder),
        }
    }
}

impl CredentialNormalizer {
    #[must_use]
    pub fn new(
        principal_name_transformer: Arc<dyn PrincipalNameTransformer>,
        password_encoder: Arc<dyn PasswordEncoder>,
    ) -> Self {
        Self {
            principal_name_transformer,
            password_encoder,
        }
    }

    /// Normalize `credential` in place.
    ///
    /// # Errors
    /// Returns `BlankUsername`, `BlankTransformedUsername`, `BlankPassword` or
    /// `BlankEncodedPassword`; the credential is left untouched on error.
    pub fn normalize(&self, credential: &mut Credential) -> Result<(), AuthenticationError> {
        if is_blank(credential.username()) {
            return Err(AuthenticationError::BlankUsername);
        }

        let username = self
            .principal_name_transformer
            .transform(credential.username())
            .filter(|username| !is_blank(username))
            .ok_or(AuthenticationError::BlankTransformedUsername)?;

        if is_blank(credential.password().expose_secret()) {
            return Err(AuthenticationError::BlankPassword);
        }

        let password = self
            .password_encoder
            .encode(credential.password().expose_secret())
            .filter(|password| !is_blank(password))
            .ok_or_else(|| {
                debug!("encoded password for {} is blank", username);
                AuthenticationError::BlankEncodedPassword
            })?;

        credential.set_username(username);
        credential.set_password(password);

        Ok(())
    }
}

impl std::fmt::Debug for CredentialNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialNormalizer").finish_non_exhaustive()
    }
}
