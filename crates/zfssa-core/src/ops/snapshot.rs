// Snapshots of a project, filesystem or LUN:
// `.../projects/{project}[/filesystems/{fs} | /luns/{lun}]/snapshots[/{name}]`

use std::fmt;

use serde_json::{Value, json};
use strum::{Display, EnumString};
use url::Url;
use zfssa_api::ApplianceClient;

use super::{Field, Render, describe, project_segments};
use crate::outcome::{Action, Outcome, Verb};
use crate::row::{Columns, RowError, Widths};

/// What a snapshot is taken of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SnapshotKind {
    Filesystem,
    Lun,
    Project,
}

/// `pool,project,target,kind,name`; `target` is `-` for project snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSpec {
    pub pool: String,
    pub project: String,
    pub target: String,
    pub kind: SnapshotKind,
    pub name: String,
}

impl SnapshotSpec {
    pub const WIDTH: usize = 5;

    pub fn from_row(row: &[String]) -> Result<Self, RowError> {
        let mut cols = Columns::bind(row, Widths::Exactly(Self::WIDTH))?;
        let pool = cols.ident("pool")?.to_owned();
        let project = cols.ident("project")?.to_owned();
        let target = cols.text("target").to_owned();

        let column = cols.position();
        let raw_kind = cols.text("kind");
        let kind: SnapshotKind = raw_kind.parse().map_err(|_| {
            cols.reject(column, "kind", raw_kind, "expected filesystem, lun or project")
        })?;
        if kind != SnapshotKind::Project && target.is_empty() {
            return Err(cols.reject(3, "target", &target, "must not be empty"));
        }

        let name = cols.ident("name")?.to_owned();
        Ok(Self {
            pool,
            project,
            target,
            kind,
            name,
        })
    }

    /// The snapshot collection of the target.
    pub fn collection_url(&self, client: &ApplianceClient) -> Result<Url, zfssa_api::Error> {
        client.endpoint(&self.segments(None))
    }

    /// This snapshot inside the collection.
    pub fn url(&self, client: &ApplianceClient) -> Result<Url, zfssa_api::Error> {
        client.endpoint(&self.segments(Some(&self.name)))
    }

    fn segments<'a>(&'a self, name: Option<&'a str>) -> Vec<&'a str> {
        let mut segments = project_segments(&self.pool, Some(&self.project));
        match self.kind {
            SnapshotKind::Filesystem => segments.extend(["filesystems", self.target.as_str()]),
            SnapshotKind::Lun => segments.extend(["luns", self.target.as_str()]),
            SnapshotKind::Project => {}
        }
        segments.push("snapshots");
        segments.extend(name);
        segments
    }
}

impl fmt::Display for SnapshotSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "snapshot '{}' {} '{}' project '{}' pool '{}'",
            self.name, self.kind, self.target, self.project, self.pool
        )
    }
}

const PRESENT_FIELDS: &[Field] = &[
    ("created_at", "creation", Render::Plain),
    ("space_data", "space_data", Render::Size),
    ("space_unique", "space_unique", Render::Size),
];

pub async fn run(action: Action, client: &ApplianceClient, row: &[String]) -> Outcome {
    let verb = Verb::from(action);
    let spec = match SnapshotSpec::from_row(row) {
        Ok(spec) => spec,
        Err(e) => return Outcome::failure(verb, e),
    };
    match action {
        Action::Create => create(client, &spec).await,
        Action::List => list(client, &spec).await,
        Action::Delete => super::delete(client, spec.url(client), &spec).await,
    }
}

async fn create(client: &ApplianceClient, spec: &SnapshotSpec) -> Outcome {
    let body = json!({ "name": spec.name });
    super::create(client, spec.collection_url(client), &body, spec).await
}

async fn list(client: &ApplianceClient, spec: &SnapshotSpec) -> Outcome {
    let body = match spec.collection_url(client) {
        Ok(url) => client.get_json(url).await,
        Err(e) => Err(e),
    };
    match body {
        Ok(body) => Outcome::success(Verb::List, presence(spec, &body)),
        Err(e) => Outcome::error(Verb::List, spec, e),
    }
}

/// `PRESENT - ...` when the collection holds the snapshot, else `NOTPRESENT - ...`.
fn presence(spec: &SnapshotSpec, body: &Value) -> String {
    let found = body
        .get("snapshots")
        .and_then(Value::as_array)
        .and_then(|snaps| {
            snaps
                .iter()
                .find(|snap| snap.get("name").and_then(Value::as_str) == Some(spec.name.as_str()))
        });
    match found {
        Some(snap) => format!("PRESENT - {spec} {}", describe(snap, PRESENT_FIELDS)),
        None => format!("NOTPRESENT - {spec} - Message Snapshot not present"),
    }
}
