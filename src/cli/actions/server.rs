use crate::{api, cli::globals::GlobalArgs};
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub globals: GlobalArgs,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the chain cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let chain = Arc::new(args.globals.chain()?);

    info!(
        "starting {} with {} allow-listed user(s)",
        env!("CARGO_PKG_NAME"),
        args.globals.users.len()
    );

    api::new(args.port, chain)
        .await
        .inspect_err(|e| error!("server stopped: {:#}", e))
}
