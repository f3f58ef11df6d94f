//! Credential verification core.
//!
//! Flow Overview: a raw [`Credential`] is normalized, checked against the
//! allow-list, and on a local match exchanged for a remote token that is
//! attached to the resulting [`Principal`]. Handlers are composed in an
//! [`AuthenticationChain`].

pub mod allow_list;
pub mod chain;
pub mod credential;
pub mod error;
pub mod handler;
pub mod normalize;
pub mod principal;
pub mod token;
pub mod transform;

pub use allow_list::{AllowList, AllowListVerifier};
pub use chain::AuthenticationChain;
pub use credential::Credential;
pub use error::{AuthenticationError, ChainError, FailureKind, HandlerFailure, TokenExchangeError};
pub use handler::{AcceptOrgUsersHandler, AuthenticationHandler};
pub use normalize::CredentialNormalizer;
pub use principal::{DefaultPrincipalFactory, HandlerResult, Principal, PrincipalFactory};
pub use token::{HttpTokenExchange, TokenExchange, TokenExchangeOptions};
pub use transform::{
    CaseConversion, ConvertCasePrincipalNameTransformer, DigestAlgorithm, DigestPasswordEncoder,
    NoOpPasswordEncoder, NoOpPrincipalNameTransformer, PasswordEncoder, PrefixSuffixPrincipalNameTransformer,
    PrincipalNameTransformer,
};

/// Principal attribute holding the token returned by the organization's token service.
pub const TOKEN_ATTRIBUTE: &str = "comproDLS_attributes";

/// Empty or whitespace-only. Non-breaking spaces and NEL are not whitespace here.
pub(crate) fn is_blank(value: &str) -> bool {
    value.chars().all(is_whitespace)
}

fn is_whitespace(c: char) -> bool {
    match c {
        '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\u{0085}' => false,
        '\u{001C}'..='\u{001F}' => true,
        _ => c.is_whitespace(),
    }
}
