//! Projects, filesystems, LUNs and snapshots: create, list or delete every
//! row of a CSV file.

use tracing::debug;
use zfssa_core::{Action, Operation};

use super::util;
use crate::cli::{ActionFlags, BatchArgs, GlobalOpts};
use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Project,
    Filesystem,
    Lun,
    Snapshot,
}

impl Entity {
    fn operation(self, action: Action) -> Operation {
        match self {
            Self::Project => Operation::Project(action),
            Self::Filesystem => Operation::Filesystem(action),
            Self::Lun => Operation::Lun(action),
            Self::Snapshot => Operation::Snapshot(action),
        }
    }
}

/// clap guarantees exactly one flag is set.
fn action(flags: ActionFlags) -> Action {
    if flags.create {
        Action::Create
    } else if flags.delete {
        Action::Delete
    } else {
        Action::List
    }
}

pub async fn handle(entity: Entity, args: &BatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let op = entity.operation(action(args.action));
    debug!(%op, file = %args.file.display(), "batch");
    util::run_batch(op, &args.conn, &args.file, args.noconfirm, global).await?;
    Ok(())
}
