//! # Orgauth (organization-scoped password authentication)
//!
//! `orgauth` verifies a username/password pair inside an organization (tenant)
//! scope. A credential passes through three stages:
//!
//! 1. **Normalization:** the username is transformed and the password encoded,
//!    rejecting blank values at every step.
//! 2. **Allow-list verification:** the normalized pair must match an entry of a
//!    statically configured username -> password map.
//! 3. **Token exchange:** on a local match, the original pair is posted to the
//!    organization's remote token service; the returned token becomes an
//!    attribute of the resulting principal.
//!
//! Every failure maps to one classified kind (`IdentityNotFound`,
//! `BadCredentials`, `ConfigurationEmpty`) so a host can decide whether to try
//! another strategy. Strategies are composed with [`authn::AuthenticationChain`].
//!
//! The `api` and `cli` modules wrap the core in a small HTTP service.

pub mod api;
pub mod authn;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
