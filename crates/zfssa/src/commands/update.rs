//! Property updates from a directive file.

use zfssa_core::Operation;

use super::util;
use crate::cli::{GlobalOpts, UpdateArgs};
use crate::error::CliError;

pub async fn handle(args: &UpdateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    util::run_batch(Operation::Update, &args.conn, &args.file, args.noconfirm, global).await?;
    Ok(())
}
