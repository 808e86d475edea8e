// Filesystems: `.../projects/{project}/filesystems[/{filesystem}]`

use std::fmt;

use serde::Serialize;
use url::Url;
use zfssa_api::ApplianceClient;

use super::{Field, Render, describe, fetch, project_segments};
use crate::outcome::{Action, Outcome, Verb};
use crate::row::{Columns, RowError, Widths};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilesystemSpec {
    #[serde(skip)]
    pub pool: String,
    #[serde(skip)]
    pub project: String,
    pub name: String,
    pub mountpoint: String,
    pub quota: u64,
    pub reservation: u64,
    pub compression: String,
    pub logbias: String,
    pub nodestroy: bool,
    pub recordsize: u64,
    pub readonly: bool,
    pub atime: bool,
    pub root_user: String,
    pub root_group: String,
    pub root_permissions: String,
    pub sharenfs: String,
    pub sharesmb: String,
}

impl FilesystemSpec {
    pub const WIDTH: usize = 17;

    pub fn from_row(row: &[String]) -> Result<Self, RowError> {
        let mut cols = Columns::bind(row, Widths::Exactly(Self::WIDTH))?;
        Ok(Self {
            pool: cols.ident("pool")?.to_owned(),
            project: cols.ident("project")?.to_owned(),
            name: cols.ident("filesystem")?.to_owned(),
            mountpoint: cols.text("mountpoint").to_owned(),
            quota: cols.size("quota")?,
            reservation: cols.size("reservation")?,
            compression: cols.text("compression").to_owned(),
            logbias: cols.text("logbias").to_owned(),
            nodestroy: cols.flag("nodestroy")?,
            recordsize: cols.blocksize("recordsize")?,
            readonly: cols.flag("readonly")?,
            atime: cols.flag("atime")?,
            root_user: cols.text("root_user").to_owned(),
            root_group: cols.text("root_group").to_owned(),
            root_permissions: cols.text("root_permissions").to_owned(),
            sharenfs: cols.text("sharenfs").to_owned(),
            sharesmb: cols.text("sharesmb").to_owned(),
        })
    }

    pub fn key(&self) -> FilesystemKey {
        FilesystemKey {
            pool: self.pool.clone(),
            project: self.project.clone(),
            filesystem: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemKey {
    pub pool: String,
    pub project: String,
    pub filesystem: String,
}

impl FilesystemKey {
    pub const WIDTH: usize = 3;

    pub fn from_row(row: &[String], widths: Widths) -> Result<Self, RowError> {
        let mut cols = Columns::bind(row, widths)?;
        Ok(Self {
            pool: cols.ident("pool")?.to_owned(),
            project: cols.ident("project")?.to_owned(),
            filesystem: cols.ident("filesystem")?.to_owned(),
        })
    }

    pub fn url(&self, client: &ApplianceClient) -> Result<Url, zfssa_api::Error> {
        let mut segments = project_segments(&self.pool, Some(&self.project));
        segments.extend(["filesystems", self.filesystem.as_str()]);
        client.endpoint(&segments)
    }
}

impl fmt::Display for FilesystemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "filesystem '{}' project '{}' pool '{}'",
            self.filesystem, self.project, self.pool
        )
    }
}

const LIST_FIELDS: &[Field] = &[
    ("filesystem", "name", Render::Plain),
    ("project", "project", Render::Plain),
    ("pool", "pool", Render::Plain),
    ("mountpoint", "mountpoint", Render::Plain),
    ("quota", "quota", Render::Size),
    ("reservation", "reservation", Render::Size),
    ("compression", "compression", Render::Plain),
    ("dedup", "dedup", Render::Plain),
    ("logbias", "logbias", Render::Plain),
    ("nodestroy", "nodestroy", Render::Plain),
    ("recordsize", "recordsize", Render::Size),
    ("readonly", "readonly", Render::Plain),
    ("atime", "atime", Render::Plain),
    ("root_user", "root_user", Render::Plain),
    ("root_group", "root_group", Render::Plain),
    ("root_permissions", "root_permissions", Render::Plain),
    ("sharenfs", "sharenfs", Render::Plain),
    ("sharesmb", "sharesmb", Render::Plain),
];

pub async fn run(action: Action, client: &ApplianceClient, row: &[String]) -> Outcome {
    match action {
        Action::Create => create(client, row).await,
        Action::List => list(client, row).await,
        Action::Delete => delete(client, row).await,
    }
}

pub async fn create(client: &ApplianceClient, row: &[String]) -> Outcome {
    let spec = match FilesystemSpec::from_row(row) {
        Ok(spec) => spec,
        Err(e) => return Outcome::failure(Verb::Create, e),
    };
    let mut segments = project_segments(&spec.pool, Some(&spec.project));
    segments.push("filesystems");
    let url = client.endpoint(&segments);
    super::create(client, url, &spec, spec.key()).await
}

pub async fn list(client: &ApplianceClient, row: &[String]) -> Outcome {
    let widths = Widths::Either(FilesystemKey::WIDTH, FilesystemSpec::WIDTH);
    let key = match FilesystemKey::from_row(row, widths) {
        Ok(key) => key,
        Err(e) => return Outcome::failure(Verb::List, e),
    };
    match fetch(client, key.url(client), "filesystem").await {
        Ok(fs) => Outcome::success(
            Verb::List,
            format!("PRESENT - {}", describe(&fs, LIST_FIELDS)),
        ),
        Err(e) => Outcome::error(Verb::List, key, e),
    }
}

pub async fn delete(client: &ApplianceClient, row: &[String]) -> Outcome {
    let key = match FilesystemKey::from_row(row, Widths::Exactly(FilesystemKey::WIDTH)) {
        Ok(key) => key,
        Err(e) => return Outcome::failure(Verb::Delete, e),
    };
    super::delete(client, key.url(client), key).await
}
