use reqwest::StatusCode;
use thiserror::Error;

/// Classified outcome of a failed attempt; what a host branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    IdentityNotFound,
    BadCredentials,
    ConfigurationEmpty,
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IdentityNotFound => "identity_not_found",
            Self::BadCredentials => "bad_credentials",
            Self::ConfigurationEmpty => "configuration_empty",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure talking to an organization's token service.
#[derive(Debug, Error)]
pub enum TokenExchangeError {
    #[error("invalid token endpoint: {0}")]
    Endpoint(String),
    #[error("token service timed out")]
    Timeout,
    #[error("token service unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("token service rejected credentials: {status}, {message}")]
    Rejected { status: StatusCode, message: String },
    #[error("token service returned an empty body")]
    EmptyBody,
    #[error("token service response exceeds {0} bytes")]
    BodyTooLarge(usize),
}

impl TokenExchangeError {
    /// `true` when the service answered and refused, as opposed to being unreachable.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

impl From<reqwest::Error> for TokenExchangeError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(error)
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("username is blank")]
    BlankUsername,
    #[error("transformed username is blank")]
    BlankTransformedUsername,
    #[error("password is blank")]
    BlankPassword,
    #[error("encoded password is blank")]
    BlankEncodedPassword,
    #[error("no user can be accepted because none is defined")]
    NoUsersDefined,
    #[error("{0} not found in backing map")]
    UnknownUser(String),
    #[error("password does not match")]
    PasswordMismatch,
    #[error("token exchange failed for organization {organization}")]
    TokenExchange {
        organization: String,
        #[source]
        source: TokenExchangeError,
    },
}

impl AuthenticationError {
    /// Collapse the concrete cause into its classified kind.
    ///
    /// An encoding failure and every token exchange failure count as a missing
    /// identity.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::BlankUsername
            | Self::BlankTransformedUsername
            | Self::BlankEncodedPassword
            | Self::UnknownUser(_)
            | Self::TokenExchange { .. } => FailureKind::IdentityNotFound,
            Self::BlankPassword | Self::PasswordMismatch => FailureKind::BadCredentials,
            Self::NoUsersDefined => FailureKind::ConfigurationEmpty,
        }
    }
}

/// One handler's rejection inside a chain run.
#[derive(Debug)]
pub struct HandlerFailure {
    pub handler: String,
    pub error: AuthenticationError,
}

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("no authentication handler supports the credential")]
    NoSupportingHandler,
    #[error("authentication failed in {} handler(s)", .0.len())]
    Failed(Vec<HandlerFailure>),
}

impl ChainError {
    /// Kind reported by the last handler tried, if any handler ran.
    #[must_use]
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::NoSupportingHandler => None,
            Self::Failed(failures) => failures.last().map(|failure| failure.error.kind()),
        }
    }

    #[must_use]
    pub fn failures(&self) -> &[HandlerFailure] {
        match self {
            Self::NoSupportingHandler => &[],
            Self::Failed(failures) => failures,
        }
    }
}
