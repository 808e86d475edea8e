// ── Batch operations ──
//
// The closed set of things a batch can do with its rows. Dispatch is an
// exhaustive match onto the per-entity modules.

use std::fmt;

use zfssa_api::ApplianceClient;

use crate::ops::{filesystem, lun, project, snapshot, update};
use crate::outcome::{Action, Outcome};

pub const PROJECTS_LOG: &str = "projects_output.log";
pub const FILESYSTEMS_LOG: &str = "filesystems_output.log";
pub const LUNS_LOG: &str = "luns_output.log";
pub const SNAPSHOTS_LOG: &str = "snaps_output.log";
pub const UPDATES_LOG: &str = "updates_output.log";
pub const EXPLORER_LOG: &str = "explorer_output.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Project(Action),
    Filesystem(Action),
    Lun(Action),
    Snapshot(Action),
    Update,
}

impl Operation {
    /// Handle one row. Never fails; problems become a failed `Outcome`.
    pub async fn run(self, client: &ApplianceClient, row: &[String]) -> Outcome {
        match self {
            Self::Project(action) => project::run(action, client, row).await,
            Self::Filesystem(action) => filesystem::run(action, client, row).await,
            Self::Lun(action) => lun::run(action, client, row).await,
            Self::Snapshot(action) => snapshot::run(action, client, row).await,
            Self::Update => update::run(client, row).await,
        }
    }

    /// Deletes and updates need confirmation before the first request.
    pub fn is_destructive(self) -> bool {
        match self {
            Self::Project(action)
            | Self::Filesystem(action)
            | Self::Lun(action)
            | Self::Snapshot(action) => action == Action::Delete,
            Self::Update => true,
        }
    }

    /// Default progress-log file name.
    pub fn log_file(self) -> &'static str {
        match self {
            Self::Project(_) => PROJECTS_LOG,
            Self::Filesystem(_) => FILESYSTEMS_LOG,
            Self::Lun(_) => LUNS_LOG,
            Self::Snapshot(_) => SNAPSHOTS_LOG,
            Self::Update => UPDATES_LOG,
        }
    }

    /// Plural entity name, e.g. `filesystems`.
    pub fn entity(self) -> &'static str {
        match self {
            Self::Project(_) => "projects",
            Self::Filesystem(_) => "filesystems",
            Self::Lun(_) => "luns",
            Self::Snapshot(_) => "snapshots",
            Self::Update => "components",
        }
    }

    /// Banner shown above console output.
    pub fn title(self) -> String {
        let verb = match self {
            Self::Project(action)
            | Self::Filesystem(action)
            | Self::Lun(action)
            | Self::Snapshot(action) => match action {
                Action::Create => "Creating",
                Action::List => "Listing",
                Action::Delete => "Deleting",
            },
            Self::Update => "Updating",
        };
        format!("{verb} {}", self.entity())
    }

    /// Column headers for the confirmation preview.
    pub fn preview_header(self) -> &'static [&'static str] {
        match self {
            Self::Project(_) => &["Pool", "Project"],
            Self::Filesystem(_) => &["Pool", "Project", "Filesystem"],
            Self::Lun(_) => &["Pool", "Project", "Lun"],
            Self::Snapshot(_) => &["Pool", "Project", "fs|lun", "SnapType", "Snapshot"],
            Self::Update => &["Type", "Name:Project:Pool", "Changes"],
        }
    }

    /// One preview line per row, taken from the raw cells so malformed
    /// rows are still shown.
    pub fn preview_row(self, row: &[String]) -> Vec<String> {
        let cell = |i: usize| row.get(i).cloned().unwrap_or_default();
        match self {
            Self::Update => vec![
                cell(0),
                cell(1).replace(';', ":"),
                row.get(2..)
                    .unwrap_or_default()
                    .iter()
                    .map(|change| change.replacen(';', ": ", 1))
                    .collect::<Vec<_>>()
                    .join(", "),
            ],
            _ => (0..self.preview_header().len()).map(cell).collect(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destructive_operations() {
        assert!(Operation::Project(Action::Delete).is_destructive());
        assert!(Operation::Update.is_destructive());
        assert!(!Operation::Lun(Action::Create).is_destructive());
        assert!(!Operation::Snapshot(Action::List).is_destructive());
    }

    #[test]
    fn log_files_and_titles() {
        assert_eq!(Operation::Snapshot(Action::Create).log_file(), "snaps_output.log");
        assert_eq!(Operation::Update.log_file(), "updates_output.log");
        assert_eq!(Operation::Filesystem(Action::List).title(), "Listing filesystems");
        assert_eq!(Operation::Project(Action::Delete).title(), "Deleting projects");
    }

    #[test]
    fn preview_rows() {
        let row: Vec<String> = ["lun", "l1;p1;pool_0", "compression;gzip", "logbias;latency"]
            .iter()
            .map(|s| (*s).to_owned())
            .collect();
        assert_eq!(
            Operation::Update.preview_row(&row),
            vec!["lun", "l1:p1:pool_0", "compression: gzip, logbias: latency"]
        );

        let short: Vec<String> = vec!["pool_0".into()];
        assert_eq!(
            Operation::Lun(Action::Delete).preview_row(&short),
            vec!["pool_0", "", ""]
        );
    }
}
