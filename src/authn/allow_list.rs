//! Static username -> password allow-list.
//!
//! The verifier never mutates a published list. A reload builds a new
//! [`AllowList`] and swaps it in whole, so a lookup always sees one snapshot.

use super::{credential::Credential, error::AuthenticationError};
use anyhow::{Result, anyhow};
use arc_swap::ArcSwap;
use secrecy::{ExposeSecret, SecretString};
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

#[derive(Clone, Default)]
pub struct AllowList {
    users: HashMap<String, SecretString>,
}

impl AllowList {
    #[must_use]
    pub fn new<I, U, P>(users: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            users: users
                .into_iter()
                .map(|(user, password)| (user.into(), SecretString::from(password.into())))
                .collect(),
        }
    }

    /// Parse `user:password` entries. The password may itself contain `:`.
    ///
    /// # Errors
    /// Returns an error if an entry has no `:` or an empty username.
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        let mut users = HashMap::with_capacity(entries.len());

        for entry in entries {
            let entry = entry.as_ref();
            let (user, password) = entry
                .split_once(':')
                .ok_or_else(|| anyhow!("invalid user entry, expected user:password"))?;

            let user = user.trim();
            if user.is_empty() {
                return Err(anyhow!("invalid user entry, empty username"));
            }

            users.insert(user.to_string(), SecretString::from(password.to_string()));
        }

        Ok(Self { users })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    #[must_use]
    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    fn password(&self, username: &str) -> Option<&SecretString> {
        self.users.get(username)
    }
}

impl std::fmt::Debug for AllowList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut users: Vec<&str> = self.users.keys().map(String::as_str).collect();
        users.sort_unstable();
        f.debug_struct("AllowList").field("users", &users).finish()
    }
}

#[derive(Debug)]
pub struct AllowListVerifier {
    users: ArcSwap<AllowList>,
}

impl AllowListVerifier {
    #[must_use]
    pub fn new(users: AllowList) -> Self {
        Self {
            users: ArcSwap::from_pointee(users),
        }
    }

    /// Publish a new allow-list; in-flight verifications keep the old one.
    pub fn replace(&self, users: AllowList) {
        debug!("replacing allow-list, {} user(s)", users.len());
        self.users.store(Arc::new(users));
    }

    /// Current allow-list; stays valid across later `replace` calls.
    #[must_use]
    pub fn snapshot(&self) -> Arc<AllowList> {
        self.users.load_full()
    }

    /// Match a normalized credential against the current allow-list.
    ///
    /// Returns the verified username.
    ///
    /// # Errors
    /// `NoUsersDefined` for an empty list, `UnknownUser` when the username is
    /// absent, `PasswordMismatch` when the stored password differs.
    pub fn verify(&self, credential: &Credential) -> Result<String, AuthenticationError> {
        let users = self.snapshot();

        if users.is_empty() {
            return Err(AuthenticationError::NoUsersDefined);
        }

        let username = credential.username();

        let Some(expected) = users.password(username) else {
            debug!("{} was not found in the map", username);
            return Err(AuthenticationError::UnknownUser(username.to_string()));
        };

        // TODO: switch to a constant-time comparison once a vetted crate is part of the stack
        if expected.expose_secret().as_bytes() != credential.password().expose_secret().as_bytes() {
            return Err(AuthenticationError::PasswordMismatch);
        }

        Ok(username.to_string())
    }
}
