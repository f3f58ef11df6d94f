pub mod server;
pub mod verify;

use anyhow::Result;

#[derive(Debug)]
pub enum Action {
    Server(server::Args),
    Verify(verify::Args),
}

impl Action {
    /// Execute the action.
    ///
    /// # Errors
    /// Returns an error if the selected action fails.
    pub async fn execute(self) -> Result<()> {
        match self {
            Self::Server(args) => server::execute(args).await,
            Self::Verify(args) => verify::execute(args).await,
        }
    }
}
