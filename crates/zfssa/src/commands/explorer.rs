//! Read-only collection of the appliance configuration.

use zfssa_api::ApplianceClient;
use zfssa_core::Explorer;
use zfssa_core::operation::EXPLORER_LOG;

use super::util;
use crate::cli::{ExplorerArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Explore one appliance, or every appliance of a `--server` directory.
pub async fn handle(args: &ExplorerArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if args.conn.server.is_dir() {
        return handle_directory(args, global).await;
    }
    let client = util::connect(&args.conn, global)?;
    collect(&client, args, global).await
}

/// One run per `*.yml`, each verified against its own `.crt` when there is
/// one, else against `--cert`. A failing appliance does not stop the rest.
async fn handle_directory(args: &ExplorerArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let servers = zfssa_config::discover_server_files(&args.conn.server)?;

    let mut failed = 0;
    for server in &servers {
        println!("Explorer for '{}' launched", server.config.display());
        let cert = server.cert.as_deref().or(args.conn.cert.as_deref());
        let result = match util::connect_to(&server.config, cert, args.conn.timeout, global) {
            Ok(client) => collect(&client, args, global).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            failed += 1;
            eprintln!("{:?}", miette::Report::new(e));
        }
    }

    if failed > 0 {
        return Err(CliError::ExplorersFailed {
            failed,
            total: servers.len(),
        });
    }
    Ok(())
}

async fn collect(
    client: &ApplianceClient,
    args: &ExplorerArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let mut reporter = util::reporter(args.conn.progress, EXPLORER_LOG, color)?;

    let report = Explorer::new(client, args.output_dir.clone())
        .run(reporter.as_mut())
        .await?;
    drop(reporter);

    if let Some(archive) = &report.archive {
        println!(
            "Explorer archive '{}' ({} collected, {} failed)",
            archive.display(),
            report.collected,
            report.failed.len()
        );
    }
    Ok(())
}
