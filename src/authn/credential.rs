use secrecy::SecretString;

/// Organization-scoped username/password pair submitted for one login attempt.
///
/// The username and password are replaced in place during normalization, so a
/// credential is only good for a single verification.
#[derive(Clone)]
pub struct Credential {
    organization: String,
    username: String,
    password: SecretString,
}

impl Credential {
    #[must_use]
    pub fn new(
        organization: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    #[must_use]
    pub fn organization(&self) -> &str {
        &self.organization
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub const fn password(&self) -> &SecretString {
        &self.password
    }

    pub(crate) fn set_username(&mut self, username: String) {
        self.username = username;
    }

    pub(crate) fn set_password(&mut self, password: String) {
        self.password = SecretString::from(password);
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("organization", &self.organization)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
