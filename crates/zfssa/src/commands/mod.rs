//! Command handlers, one module per subcommand family.

pub mod explorer;
pub mod storage;
pub mod templates;
pub mod update;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a parsed command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Projects(args) => storage::handle(storage::Entity::Project, &args, global).await,
        Command::Filesystems(args) => {
            storage::handle(storage::Entity::Filesystem, &args, global).await
        }
        Command::Luns(args) => storage::handle(storage::Entity::Lun, &args, global).await,
        Command::Snapshots(args) => storage::handle(storage::Entity::Snapshot, &args, global).await,
        Command::Update(args) => update::handle(&args, global).await,
        Command::Explorer(args) => explorer::handle(&args, global).await,
        Command::Templates(args) => templates::handle(&args),
        // Answered in main before any dispatch.
        Command::Completions(_) => Ok(()),
    }
}
