// ── Explorer ──
//
// Read-only snapshot of an appliance: every category is fetched with at
// most four requests in flight, written to `<category>.csv` as results
// arrive, then the run directory is zipped and removed.

pub mod schema;

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use futures_util::{StreamExt, stream};
use serde_json::Value;
use strum::{Display, EnumString};
use tracing::{debug, info, warn};
use zfssa_api::ApplianceClient;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use self::schema::{Column, Schema, Shape};
use crate::error::CoreError;
use crate::outcome::{Outcome, Verb};
use crate::report::{Reporter, record_or_warn};

/// Requests in flight at once.
pub const CONCURRENCY: usize = 4;

/// Default parent directory for run output.
pub const DEFAULT_ROOT: &str = "data";

/// One read-only endpoint and the CSV file it becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Category {
    #[strum(serialize = "version")]
    Version,
    #[strum(serialize = "cluster")]
    Cluster,
    #[strum(serialize = "problems")]
    Problems,
    #[strum(serialize = "datalinks")]
    Datalinks,
    #[strum(serialize = "devices")]
    Devices,
    #[strum(serialize = "interfaces")]
    Interfaces,
    #[strum(serialize = "routes")]
    Routes,
    #[strum(serialize = "routing")]
    Routing,
    #[strum(serialize = "pools")]
    Pools,
    #[strum(serialize = "projects")]
    Projects,
    #[strum(serialize = "luns")]
    Luns,
    #[strum(serialize = "filesystems")]
    Filesystems,
    #[strum(serialize = "fc_initiators")]
    FcInitiators,
    #[strum(serialize = "fc_initiator-groups")]
    FcInitiatorGroups,
    #[strum(serialize = "fc_targets")]
    FcTargets,
    #[strum(serialize = "fc_target-groups")]
    FcTargetGroups,
    #[strum(serialize = "iscsi_initiators")]
    IscsiInitiators,
    #[strum(serialize = "iscsi_initiator-groups")]
    IscsiInitiatorGroups,
    #[strum(serialize = "iscsi_targets")]
    IscsiTargets,
    #[strum(serialize = "iscsi_target-groups")]
    IscsiTargetGroups,
    #[strum(serialize = "users")]
    Users,
}

impl Category {
    pub const ALL: [Self; 21] = [
        Self::Version,
        Self::Cluster,
        Self::Problems,
        Self::Datalinks,
        Self::Devices,
        Self::Interfaces,
        Self::Routes,
        Self::Routing,
        Self::Pools,
        Self::Projects,
        Self::Luns,
        Self::Filesystems,
        Self::FcInitiators,
        Self::FcInitiatorGroups,
        Self::FcTargets,
        Self::FcTargetGroups,
        Self::IscsiInitiators,
        Self::IscsiInitiatorGroups,
        Self::IscsiTargets,
        Self::IscsiTargetGroups,
        Self::Users,
    ];

    /// Endpoint below the API root.
    pub fn path(self) -> &'static str {
        match self {
            Self::Version => "system/v1/version",
            Self::Cluster => "hardware/v1/cluster",
            Self::Problems => "problem/v1/problems",
            Self::Datalinks => "network/v1/datalinks",
            Self::Devices => "network/v1/devices",
            Self::Interfaces => "network/v1/interfaces",
            Self::Routes => "network/v1/routes",
            Self::Routing => "network/v1/routing",
            Self::Pools => "storage/v1/pools",
            Self::Projects => "storage/v1/projects",
            Self::Luns => "storage/v1/luns",
            Self::Filesystems => "storage/v1/filesystems",
            Self::FcInitiators => "san/v1/fc/initiators",
            Self::FcInitiatorGroups => "san/v1/fc/initiator-groups",
            Self::FcTargets => "san/v1/fc/targets",
            Self::FcTargetGroups => "san/v1/fc/target-groups",
            Self::IscsiInitiators => "san/v1/iscsi/initiators",
            Self::IscsiInitiatorGroups => "san/v1/iscsi/initiator-groups",
            Self::IscsiTargets => "san/v1/iscsi/targets",
            Self::IscsiTargetGroups => "san/v1/iscsi/target-groups",
            Self::Users => "user/v1/users",
        }
    }

    pub fn schema(self) -> Schema {
        let (root, shape, columns) = match self {
            Self::Version => ("version", Shape::Object, schema::VERSION),
            Self::Cluster => ("cluster", Shape::Object, schema::CLUSTER),
            Self::Problems => ("problems", Shape::List, schema::PROBLEMS),
            Self::Datalinks => ("datalinks", Shape::List, schema::DATALINKS),
            Self::Devices => ("devices", Shape::List, schema::DEVICES),
            Self::Interfaces => ("interfaces", Shape::List, schema::INTERFACES),
            Self::Routes => ("routes", Shape::List, schema::ROUTES),
            Self::Routing => ("routing", Shape::Object, schema::ROUTING),
            Self::Pools => ("pools", Shape::List, schema::POOLS),
            Self::Projects => ("projects", Shape::List, schema::PROJECTS),
            Self::Luns => ("luns", Shape::List, schema::LUNS),
            Self::Filesystems => ("filesystems", Shape::List, schema::FILESYSTEMS),
            Self::FcInitiators => ("initiators", Shape::List, schema::FC_INITIATORS),
            Self::FcInitiatorGroups | Self::IscsiInitiatorGroups => {
                ("groups", Shape::List, schema::INITIATOR_GROUPS)
            }
            Self::FcTargets => ("targets", Shape::List, schema::FC_TARGETS),
            Self::FcTargetGroups | Self::IscsiTargetGroups => {
                ("groups", Shape::List, schema::TARGET_GROUPS)
            }
            Self::IscsiInitiators => ("initiators", Shape::List, schema::ISCSI_INITIATORS),
            Self::IscsiTargets => ("targets", Shape::List, schema::ISCSI_TARGETS),
            Self::Users => ("users", Shape::List, schema::USERS),
        };
        Schema {
            root,
            shape,
            columns,
        }
    }

    pub fn file_name(self) -> String {
        format!("{self}.csv")
    }

    /// Cells of one data row. Exported pools carry no profile or usage.
    fn cells(self, item: &Value, columns: &[Column]) -> Vec<String> {
        let exported = self == Self::Pools
            && item.get("status").and_then(Value::as_str) == Some("exported");
        columns
            .iter()
            .map(|&col| {
                if exported && (col.is_usage() || col == Column::Field("profile")) {
                    "-".to_owned()
                } else {
                    col.value(item)
                }
            })
            .collect()
    }
}

/// Write `body` as `;`-separated CSV: a `sep=;` line, the header row, then
/// one row per item.
pub fn write_csv(path: &Path, category: Category, body: &Value) -> Result<(), CoreError> {
    let schema = category.schema();
    let mut file = File::create(path)?;
    file.write_all(b"sep=;\n")?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_writer(file);
    writer.write_record(schema.columns.iter().map(|c| c.header()))?;

    let payload = body.get(schema.root).unwrap_or(&Value::Null);
    match schema.shape {
        Shape::Object => {
            if payload.is_object() {
                writer.write_record(category.cells(payload, schema.columns))?;
            }
        }
        Shape::List => {
            for item in payload.as_array().into_iter().flatten() {
                writer.write_record(category.cells(item, schema.columns))?;
            }
        }
    }

    if category == Category::Cluster {
        let resources = schema::CLUSTER_RESOURCES;
        writer.write_record(resources.iter().map(|c| c.header()))?;
        let rows = payload.get("resources").and_then(Value::as_array);
        for resource in rows.into_iter().flatten() {
            writer.write_record(resources.iter().map(|c| c.value(resource)))?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// What a finished run produced.
#[derive(Debug, Default)]
pub struct ExplorerReport {
    /// `None` when nothing was collected.
    pub archive: Option<PathBuf>,
    pub collected: usize,
    pub failed: Vec<(Category, String)>,
}

pub struct Explorer<'a> {
    client: &'a ApplianceClient,
    root: PathBuf,
    categories: Vec<Category>,
}

impl<'a> Explorer<'a> {
    /// Collect every category into a run directory under `root`.
    pub fn new(client: &'a ApplianceClient, root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            root: root.into(),
            categories: Category::ALL.to_vec(),
        }
    }

    pub fn with_categories(mut self, categories: impl Into<Vec<Category>>) -> Self {
        self.categories = categories.into();
        self
    }

    /// `<root>/zfssa_explorer_<host>_<ddmmyy_HHMMSS>`
    pub fn run_dir(&self) -> PathBuf {
        let stamp = chrono::Local::now().format("%d%m%y_%H%M%S");
        self.root
            .join(format!("zfssa_explorer_{}_{stamp}", self.client.host()))
    }

    pub async fn run(&self, reporter: &mut dyn Reporter) -> Result<ExplorerReport, CoreError> {
        let dir = self.run_dir();
        let client = self.client;
        reporter.start("Collecting explorer data", self.categories.len())?;

        let fetches = stream::iter(self.categories.iter().copied())
            .map(move |category| async move { (category, fetch(client, category).await) })
            .buffer_unordered(CONCURRENCY);
        let mut fetches = std::pin::pin!(fetches);

        let mut report = ExplorerReport::default();
        while let Some((category, result)) = fetches.next().await {
            let written = result
                .map_err(CoreError::from)
                .and_then(|body| save(&dir, category, &body));
            let outcome = match written {
                Ok(()) => {
                    report.collected += 1;
                    Outcome::success(
                        Verb::Explorer,
                        format!("collecting '{category}' for '{}'", dir.display()),
                    )
                }
                Err(e) => {
                    report.failed.push((category, e.to_string()));
                    Outcome::error(Verb::Explorer, category.path(), e)
                }
            };
            record_or_warn(reporter, &outcome);
        }

        match archive(&dir) {
            Ok(path) => {
                info!(archive = %path.display(), collected = report.collected, "explorer archive written");
                report.archive = Some(path);
            }
            Err(CoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                let outcome = Outcome::failure(
                    Verb::Explorer,
                    format!("Nothing to compress: '{}' does not exist", dir.display()),
                );
                warn!("{outcome}");
                record_or_warn(reporter, &outcome);
            }
            Err(e) => return Err(e),
        }
        if let Err(e) = reporter.finish() {
            warn!(error = %e, "reporter did not finish cleanly");
        }
        Ok(report)
    }
}

async fn fetch(client: &ApplianceClient, category: Category) -> Result<Value, zfssa_api::Error> {
    let segments: Vec<&str> = category.path().split('/').collect();
    let url = client.endpoint(&segments)?;
    debug!(%category, %url, "explorer fetch");
    client.get_json(url).await
}

fn save(dir: &Path, category: Category, body: &Value) -> Result<(), CoreError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(category.file_name());
    let written = write_csv(&path, category, body);
    keep_if_written(&path, written)
}

/// Remove a partly written CSV so a failed category never reaches the
/// archive.
fn keep_if_written(path: &Path, written: Result<(), CoreError>) -> Result<(), CoreError> {
    if written.is_err() {
        if let Err(e) = fs::remove_file(path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "partial CSV not removed");
            }
        }
    }
    written
}

/// Zip every file in `dir` into `<dir>.zip` as `<dirname>/<file>`, then
/// remove the files and the directory.
fn archive(dir: &Path) -> Result<PathBuf, CoreError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let dirname = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    // The directory name holds an IP address, so `with_extension` would
    // cut it at the last octet.
    let mut zip_name = OsString::from(dir.as_os_str());
    zip_name.push(".zip");
    let zip_path = PathBuf::from(zip_name);

    let mut zip = ZipWriter::new(File::create(&zip_path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for path in &files {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        zip.start_file(format!("{dirname}/{name}"), options)?;
        io::copy(&mut File::open(path)?, &mut zip)?;
        fs::remove_file(path)?;
    }
    zip.finish()?;
    fs::remove_dir(dir)?;
    Ok(zip_path)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn written(category: Category, body: &Value) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(category.file_name());
        write_csv(&path, category, body).unwrap();
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn names_and_paths() {
        assert_eq!(Category::ALL.len(), 21);
        assert_eq!(Category::FcInitiatorGroups.to_string(), "fc_initiator-groups");
        assert_eq!(Category::IscsiTargets.file_name(), "iscsi_targets.csv");
        assert_eq!(Category::Routing.path(), "network/v1/routing");
        assert_eq!(Category::IscsiTargetGroups.schema().root, "groups");
        assert_eq!("users".parse::<Category>().unwrap(), Category::Users);
    }

    #[test]
    fn list_file_layout() {
        let body = json!({"routes": [
            {"status": "active", "family": "IPv4", "destination": "0.0.0.0", "mask": 0,
             "href": "/api/network/v1/routes/route-000", "interface": "ixgbe0",
             "type": "static", "gateway": "192.168.56.1"}
        ]});
        assert_eq!(
            written(Category::Routes, &body),
            "sep=;\n\
             status;family;destination;mask;href;interface;type;gateway\n\
             active;IPv4;0.0.0.0;0;/api/network/v1/routes/route-000;ixgbe0;static;192.168.56.1\n"
        );
    }

    #[test]
    fn exported_pool_has_no_usage() {
        let body = json!({"pools": [
            {"status": "exported", "profile": "mirror", "name": "pool_1",
             "usage": {"free": 1024}, "peer": "p", "href": "/h", "owner": "o", "asn": "a"},
            {"status": "online", "profile": "mirror", "name": "pool_0",
             "usage": {"free": 1024}, "peer": "p", "href": "/h", "owner": "o", "asn": "a"}
        ]});
        let text = written(Category::Pools, &body);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        let exported: Vec<&str> = lines[2].split(';').collect();
        assert_eq!(exported[..3], ["exported", "-", "pool_1"]);
        assert!(exported[3..19].iter().all(|c| *c == "-"));
        assert_eq!(exported[19..], ["p", "/h", "o", "a"]);
        assert!(lines[3].contains(";1024;1 KB;"));
    }

    #[test]
    fn cluster_has_resource_table() {
        let body = json!({"cluster": {
            "state": "AKCS_OWNER", "description": "Active",
            "resources": [
                {"owner": "zfssa1", "type": "singleton", "user_label": "",
                 "details": ["ixgbe0"], "href": "/api/hardware/v1/cluster/resources/net/ixgbe0"}
            ]
        }});
        let text = written(Category::Cluster, &body);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2], "AKCS_OWNER;Active;-;-;-;-");
        assert_eq!(lines[3], "owner;type;user_label;details;href");
        assert!(lines[4].starts_with("zfssa1;singleton;;"));
    }

    #[test]
    fn archive_names_entries_under_run_dir() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("zfssa_explorer_192.168.56.150_191026_101010");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("users.csv"), "sep=;\n").unwrap();

        let zip_path = archive(&dir).unwrap();
        assert_eq!(
            zip_path.file_name().unwrap(),
            "zfssa_explorer_192.168.56.150_191026_101010.zip"
        );
        assert!(!dir.exists());

        let zip = zip::ZipArchive::new(File::open(zip_path).unwrap()).unwrap();
        let names: Vec<&str> = zip.file_names().collect();
        assert_eq!(names, ["zfssa_explorer_192.168.56.150_191026_101010/users.csv"]);
    }

    #[test]
    fn failed_category_is_left_out_of_archive() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("zfssa_explorer_10.0.0.1_010120_000000");
        fs::create_dir(&dir).unwrap();
        let users = dir.join(Category::Users.file_name());
        fs::write(&users, "sep=;\n").unwrap();
        let pools = dir.join(Category::Pools.file_name());
        fs::write(&pools, "sep=;\nstatus;pool").unwrap();

        let failed = keep_if_written(&pools, Err(io::Error::other("disk full").into()));
        assert!(failed.is_err());
        assert!(!pools.exists());
        keep_if_written(&users, Ok(())).unwrap();
        assert!(users.exists());

        let zip = zip::ZipArchive::new(File::open(archive(&dir).unwrap()).unwrap()).unwrap();
        let names: Vec<&str> = zip.file_names().collect();
        assert_eq!(names, ["zfssa_explorer_10.0.0.1_010120_000000/users.csv"]);
    }
}
