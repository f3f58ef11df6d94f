use crate::authn::{CaseConversion, DigestAlgorithm};
use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, builder::PossibleValuesParser};
use std::time::Duration;

pub const ARG_AUTH_URL: &str = "auth-url";
pub const ARG_USER: &str = "user";
pub const ARG_TOKEN_TIMEOUT: &str = "token-timeout";
pub const ARG_CONNECT_TIMEOUT: &str = "connect-timeout";
pub const ARG_USERNAME_CASE: &str = "username-case";
pub const ARG_PASSWORD_ENCODING: &str = "password-encoding";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_AUTH_URL)
                .long(ARG_AUTH_URL)
                .help("Token service base URL, tokens are requested from <url>/auth/<organization>/token")
                .env("ORGAUTH_AUTH_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_USER)
                .short('u')
                .long(ARG_USER)
                .help("Accepted user as user:password, repeat or comma separate for more (passwords cannot contain a comma)")
                .env("ORGAUTH_USERS")
                .action(ArgAction::Append)
                .value_delimiter(','),
        )
        .arg(
            Arg::new(ARG_TOKEN_TIMEOUT)
                .long(ARG_TOKEN_TIMEOUT)
                .help("Token exchange timeout in seconds")
                .env("ORGAUTH_TOKEN_TIMEOUT")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_CONNECT_TIMEOUT)
                .long(ARG_CONNECT_TIMEOUT)
                .help("Token service connect timeout in seconds")
                .env("ORGAUTH_CONNECT_TIMEOUT")
                .default_value("5")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_USERNAME_CASE)
                .long(ARG_USERNAME_CASE)
                .help("Username case conversion applied before lookup")
                .env("ORGAUTH_USERNAME_CASE")
                .default_value("none")
                .value_parser(PossibleValuesParser::new(["none", "lower", "upper"])),
        )
        .arg(
            Arg::new(ARG_PASSWORD_ENCODING)
                .long(ARG_PASSWORD_ENCODING)
                .help("Password encoding applied before lookup, allow-listed passwords must use the same encoding")
                .env("ORGAUTH_PASSWORD_ENCODING")
                .default_value("none")
                .value_parser(PossibleValuesParser::new(["none", "sha256", "sha512"])),
        )
}

#[derive(Debug, Clone)]
pub struct Options {
    pub auth_url: String,
    pub users: Vec<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub username_case: Option<CaseConversion>,
    pub password_encoding: Option<DigestAlgorithm>,
}

impl Options {
    /// # Errors
    /// Returns an error if a required argument is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let auth_url = matches
            .get_one::<String>(ARG_AUTH_URL)
            .cloned()
            .context("missing required argument: --auth-url")?;

        let users = matches
            .get_many::<String>(ARG_USER)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        let timeout = matches
            .get_one::<u64>(ARG_TOKEN_TIMEOUT)
            .copied()
            .unwrap_or(10);
        let connect_timeout = matches
            .get_one::<u64>(ARG_CONNECT_TIMEOUT)
            .copied()
            .unwrap_or(5);

        let username_case = match matches.get_one::<String>(ARG_USERNAME_CASE).map(String::as_str) {
            Some("lower") => Some(CaseConversion::Lower),
            Some("upper") => Some(CaseConversion::Upper),
            _ => None,
        };

        let password_encoding = match matches
            .get_one::<String>(ARG_PASSWORD_ENCODING)
            .map(String::as_str)
        {
            Some("sha256") => Some(DigestAlgorithm::Sha256),
            Some("sha512") => Some(DigestAlgorithm::Sha512),
            _ => None,
        };

        Ok(Self {
            auth_url,
            users,
            timeout: Duration::from_secs(timeout),
            connect_timeout: Duration::from_secs(connect_timeout),
            username_case,
            password_encoding,
        })
    }
}
