//! Map parsed CLI arguments to an action.

use crate::cli::{
    actions::{Action, server, verify},
    commands::{CMD_SERVER, CMD_VERIFY, authn},
    globals::GlobalArgs,
};
use anyhow::{Context, Result, anyhow};
use secrecy::SecretString;

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let (name, sub) = matches
        .subcommand()
        .context("missing subcommand")?;

    let globals = GlobalArgs::from_options(&authn::Options::parse(sub)?)?;

    match name {
        CMD_SERVER => Ok(Action::Server(server::Args {
            port: sub.get_one::<u16>("port").copied().unwrap_or(8080),
            globals,
        })),
        CMD_VERIFY => {
            let value = |id: &str| -> Result<String> {
                sub.get_one::<String>(id)
                    .cloned()
                    .with_context(|| format!("missing required argument: --{id}"))
            };

            Ok(Action::Verify(verify::Args {
                organization: value("organization")?,
                username: value("username")?,
                password: SecretString::from(value("password")?),
                globals,
            }))
        }
        other => Err(anyhow!("unknown subcommand: {other}")),
    }
}
