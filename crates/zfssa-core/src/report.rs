// ── Reporters ──
//
// Where outcomes go while a batch runs: straight to the console, or to a
// progress bar with the messages written to a log file.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::{Dispatch, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use crate::error::CoreError;
use crate::outcome::{FAIL, Outcome, SUCCESS};

/// Width of banner and separator lines.
pub const RULE_WIDTH: usize = 79;

/// Sink for the outcomes of one run.
pub trait Reporter {
    fn start(&mut self, title: &str, total: usize) -> io::Result<()>;
    fn record(&mut self, outcome: &Outcome) -> io::Result<()>;
    fn finish(&mut self) -> io::Result<()>;
}

/// Record `outcome`; a sink that stopped accepting output (a closed pipe,
/// a full disk) is logged and the run goes on.
pub(crate) fn record_or_warn(reporter: &mut dyn Reporter, outcome: &Outcome) {
    if let Err(e) = reporter.record(outcome) {
        warn!(error = %e, message = %outcome.message, "outcome not reported");
    }
}

// ── Console ─────────────────────────────────────────────────────────

/// Prints a title banner, then every message followed by a separator.
#[derive(Debug)]
pub struct ConsoleReporter<W: Write> {
    out: W,
    color: bool,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, message: &str) -> String {
        if !self.color {
            return message.to_owned();
        }
        let ok = format!(" - {SUCCESS} - ");
        let bad = format!(" - {FAIL} - ");
        if message.contains(&ok) {
            message.replacen(&ok, &format!(" - {} - ", SUCCESS.green()), 1)
        } else {
            message.replacen(&bad, &format!(" - {} - ", FAIL.red()), 1)
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn start(&mut self, title: &str, _total: usize) -> io::Result<()> {
        let rule = "#".repeat(RULE_WIDTH);
        writeln!(self.out, "{rule}\n{title}\n{rule}")
    }

    fn record(&mut self, outcome: &Outcome) -> io::Result<()> {
        let line = self.paint(&outcome.message);
        writeln!(self.out, "{line}\n{}", "=".repeat(RULE_WIDTH))
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

// ── Progress bar + log file ─────────────────────────────────────────

/// Advances a progress bar once per outcome and logs each message to a
/// file: `info` for successes, `warn` for failures.
///
/// The file is written through its own tracing dispatch, so it never
/// receives the process-wide diagnostics.
pub struct ProgressReporter {
    bar: ProgressBar,
    dispatch: Dispatch,
    guard: Option<WorkerGuard>,
    path: PathBuf,
}

impl ProgressReporter {
    /// Log to `path` (created or appended) and draw the bar on stderr.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        Self::with_bar(path.into(), ProgressBar::new(0))
    }

    /// Same, without drawing anything.
    pub fn hidden(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        Self::with_bar(path.into(), ProgressBar::hidden())
    }

    fn with_bar(path: PathBuf, bar: ProgressBar) -> Result<Self, CoreError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| CoreError::LogFile {
                path: path.clone(),
                reason: "not a file path".into(),
            })?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name)
            .build(dir)
            .map_err(|e| CoreError::LogFile {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let subscriber = tracing_subscriber::fmt()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
            .finish();

        if let Ok(style) = ProgressStyle::with_template("{percent:>3}% [{bar:50}] ETA {eta}") {
            bar.set_style(style.progress_chars("=> "));
        }

        Ok(Self {
            bar,
            dispatch: Dispatch::new(subscriber),
            guard: Some(guard),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Reporter for ProgressReporter {
    fn start(&mut self, _title: &str, total: usize) -> io::Result<()> {
        self.bar.set_length(u64::try_from(total).unwrap_or(u64::MAX));
        self.bar.set_position(0);
        Ok(())
    }

    fn record(&mut self, outcome: &Outcome) -> io::Result<()> {
        tracing::dispatcher::with_default(&self.dispatch, || {
            if outcome.failed {
                warn!("{}", outcome.message);
            } else {
                info!("{}", outcome.message);
            }
        });
        self.bar.inc(1);
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        // Dropping the guard flushes the background writer.
        drop(self.guard.take());
        self.bar.finish();
        Ok(())
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        drop(self.guard.take());
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::outcome::Verb;

    #[test]
    fn console_layout() {
        let mut reporter = ConsoleReporter::new(Vec::new(), false);
        reporter.start("Creating projects", 1).unwrap();
        reporter
            .record(&Outcome::success(Verb::Create, "project 'p1' pool 'pool_0'"))
            .unwrap();
        reporter.finish().unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let rule = "#".repeat(79);
        let sep = "=".repeat(79);
        assert_eq!(
            text,
            format!(
                "{rule}\nCreating projects\n{rule}\nCREATE - SUCCESS - project 'p1' pool 'pool_0'\n{sep}\n"
            )
        );
    }

    #[test]
    fn console_colours_status_word() {
        let reporter = ConsoleReporter::new(Vec::new(), true);
        let painted = reporter.paint("DELETE - FAIL - lun 'l1'");
        assert!(painted.contains("\u{1b}[31mFAIL\u{1b}[39m"), "got: {painted:?}");
        assert!(painted.starts_with("DELETE - "));
    }

    #[test]
    fn progress_writes_log_with_levels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects_output.log");

        let mut reporter = ProgressReporter::hidden(&path).unwrap();
        reporter.start("Creating projects", 2).unwrap();
        reporter
            .record(&Outcome::success(Verb::Create, "project 'p1' pool 'pool_0'"))
            .unwrap();
        reporter
            .record(&Outcome::failure(Verb::Create, "project 'p2' pool 'pool_0'"))
            .unwrap();
        reporter.finish().unwrap();

        let log = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 2, "log was: {log}");
        assert!(lines[0].contains("INFO") && lines[0].contains("CREATE - SUCCESS - project 'p1'"));
        assert!(lines[1].contains("WARN") && lines[1].contains("CREATE - FAIL - project 'p2'"));
    }
}
