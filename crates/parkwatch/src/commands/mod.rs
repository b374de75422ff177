//! Command dispatch: bridges CLI args -> poller -> output formatting.

pub mod config_cmd;
pub mod status;
pub mod watch;

use parkwatch_core::PollerConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    poller: PollerConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Status(args) => status::handle(&poller, args, global).await,
        Command::Watch(args) => watch::handle(poller, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
