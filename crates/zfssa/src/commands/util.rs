//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};
use zfssa_api::{ApplianceClient, TlsPolicy, TransportConfig};
use zfssa_core::{
    BatchRunner, ConsoleReporter, Operation, Outcome, ProgressReporter, Reporter, Row, read_rows,
};

use crate::cli::{ConnectionArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Fail early when a file argument points nowhere.
pub fn ensure_exists(kind: &'static str, path: &Path) -> Result<(), CliError> {
    if path.exists() {
        Ok(())
    } else {
        Err(CliError::FileNotFound {
            kind,
            path: path.to_path_buf(),
        })
    }
}

/// Load the server file and build the client it describes.
pub fn connect(conn: &ConnectionArgs, global: &GlobalOpts) -> Result<ApplianceClient, CliError> {
    connect_to(&conn.server, conn.cert.as_deref(), conn.timeout, global)
}

/// Same as [`connect`] for an explicit server file and certificate.
pub fn connect_to(
    server: &Path,
    cert: Option<&Path>,
    timeout: u64,
    global: &GlobalOpts,
) -> Result<ApplianceClient, CliError> {
    ensure_exists("server", server)?;
    if let Some(cert) = cert {
        ensure_exists("cert", cert)?;
    }

    let config = zfssa_config::load_server_config(server)?;
    let tls = TlsPolicy::from_cert(cert.map(Path::to_path_buf));
    if !tls.verifies() {
        eprintln!("{}", output::tls_warning(output::should_color(global.color)));
    }

    let transport = TransportConfig::new(tls, Duration::from_secs(timeout));
    let client = ApplianceClient::new(config.base_url()?, config.credentials(), &transport)?;
    debug!(host = client.host(), timeout, "client ready");
    Ok(client)
}

/// Rows of the input file.
pub fn read_input(file: &Path) -> Result<Vec<Row>, CliError> {
    ensure_exists("input", file)?;
    Ok(read_rows(file)?)
}

/// Console output, or a progress bar with the messages logged to `log`.
pub fn reporter(progress: bool, log: &str, color: bool) -> Result<Box<dyn Reporter>, CliError> {
    if progress {
        Ok(Box::new(ProgressReporter::new(log)?))
    } else {
        Ok(Box::new(ConsoleReporter::stdout(color)))
    }
}

/// Run `op` over the rows of `file`, asking first unless `noconfirm`.
pub async fn run_batch(
    op: Operation,
    conn: &ConnectionArgs,
    file: &Path,
    noconfirm: bool,
    global: &GlobalOpts,
) -> Result<Vec<Outcome>, CliError> {
    let client = connect(conn, global)?;
    let rows = read_input(file)?;
    let color = output::should_color(global.color);

    if op.is_destructive() && !noconfirm && !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: op.to_string(),
        });
    }

    let prompt = output::TerminalPrompt { color };
    let mut runner = BatchRunner::new(&client);
    if !noconfirm {
        runner = runner.with_prompt(&prompt);
    }

    let mut reporter = reporter(conn.progress, op.log_file(), color)?;
    let outcomes = runner.run(op, &rows, reporter.as_mut()).await?;
    if conn.progress {
        info!(log = op.log_file(), "messages written");
    }
    Ok(outcomes)
}
