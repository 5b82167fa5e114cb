//! Command dispatch: bridges CLI args -> SDK calls -> output formatting.

pub mod cert;
pub mod config_cmd;
pub mod edge;
pub mod firewall;
pub mod tier0;
pub mod user;
pub mod util;

use cloudavenue_core::Client;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a console-bound command to its handler.
pub async fn dispatch(cmd: Command, client: &Client, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Edge(args) => edge::handle(client, args, global).await,
        Command::Tier0(args) => tier0::handle(client, args, global).await,
        Command::Firewall(args) => firewall::handle(client, args, global).await,
        Command::Cert(args) => cert::handle(client, args, global).await,
        Command::User(args) => user::handle(client, args, global).await,
        // Handled before a client is built
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
