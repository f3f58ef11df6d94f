use crate::{authn::Credential, cli::globals::GlobalArgs};
use anyhow::{Result, anyhow};
use secrecy::{ExposeSecret, SecretString};

pub struct Args {
    pub organization: String,
    pub username: String,
    pub password: SecretString,
    pub globals: GlobalArgs,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("organization", &self.organization)
            .field("username", &self.username)
            .field("password", &"***")
            .field("globals", &self.globals)
            .finish()
    }
}

/// Verify one credential and print the handler result as JSON.
/// # Errors
/// Returns an error carrying the failure kind if verification fails.
pub async fn execute(args: Args) -> Result<()> {
    let chain = args.globals.chain()?;

    let credential = Credential::new(
        args.organization,
        args.username,
        args.password.expose_secret(),
    );

    match chain.authenticate(&credential).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => match e.kind() {
            Some(kind) => Err(anyhow!("{kind}: {e}")),
            None => Err(anyhow!(e)),
        },
    }
}
