// Projects: `storage/v1/pools/{pool}/projects[/{project}]`

use std::fmt;

use serde::Serialize;
use url::Url;
use zfssa_api::ApplianceClient;

use super::{Field, Render, describe, fetch, project_segments};
use crate::outcome::{Action, Outcome, Verb};
use crate::row::{Columns, RowError, Widths};

/// Full create row, sent as the POST body (minus `pool`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSpec {
    #[serde(skip)]
    pub pool: String,
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
    pub default_sparse: bool,
    pub default_user: String,
    pub default_group: String,
    pub default_permissions: String,
    pub default_volblocksize: u64,
    pub default_volsize: u64,
    pub sharenfs: String,
    pub sharesmb: String,
}

impl ProjectSpec {
    pub const WIDTH: usize = 19;

    pub fn from_row(row: &[String]) -> Result<Self, RowError> {
        let mut cols = Columns::bind(row, Widths::Exactly(Self::WIDTH))?;
        Ok(Self {
            pool: cols.ident("pool")?.to_owned(),
            name: cols.ident("project")?.to_owned(),
            mountpoint: cols.text("mountpoint").to_owned(),
            quota: cols.size("quota")?,
            reservation: cols.size("reservation")?,
            compression: cols.text("compression").to_owned(),
            logbias: cols.text("logbias").to_owned(),
            nodestroy: cols.flag("nodestroy")?,
            recordsize: cols.blocksize("recordsize")?,
            readonly: cols.flag("readonly")?,
            atime: cols.flag("atime")?,
            default_sparse: cols.flag("default_sparse")?,
            default_user: cols.text("default_user").to_owned(),
            default_group: cols.text("default_group").to_owned(),
            default_permissions: cols.text("default_permissions").to_owned(),
            default_volblocksize: cols.blocksize("default_volblocksize")?,
            default_volsize: cols.size("default_volsize")?,
            sharenfs: cols.text("sharenfs").to_owned(),
            sharesmb: cols.text("sharesmb").to_owned(),
        })
    }

    pub fn key(&self) -> ProjectKey {
        ProjectKey {
            pool: self.pool.clone(),
            project: self.name.clone(),
        }
    }
}

/// Identifies one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectKey {
    pub pool: String,
    pub project: String,
}

impl ProjectKey {
    pub const WIDTH: usize = 2;

    /// Leading `pool,project` of a row of any accepted width.
    pub fn from_row(row: &[String], widths: Widths) -> Result<Self, RowError> {
        let mut cols = Columns::bind(row, widths)?;
        Ok(Self {
            pool: cols.ident("pool")?.to_owned(),
            project: cols.ident("project")?.to_owned(),
        })
    }

    pub fn url(&self, client: &ApplianceClient) -> Result<Url, zfssa_api::Error> {
        client.endpoint(&project_segments(&self.pool, Some(&self.project)))
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "project '{}' pool '{}'", self.project, self.pool)
    }
}

const LIST_FIELDS: &[Field] = &[
    ("project", "name", Render::Plain),
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
    ("def_sparse", "default_sparse", Render::Plain),
    ("def_user", "default_user", Render::Plain),
    ("def_group", "default_group", Render::Plain),
    ("def_perms", "default_permissions", Render::Plain),
    ("def_volblocksize", "default_volblocksize", Render::Size),
    ("def_volsize", "default_volsize", Render::Size),
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
    let spec = match ProjectSpec::from_row(row) {
        Ok(spec) => spec,
        Err(e) => return Outcome::failure(Verb::Create, e),
    };
    let url = client.endpoint(&project_segments(&spec.pool, None));
    super::create(client, url, &spec, spec.key()).await
}

pub async fn list(client: &ApplianceClient, row: &[String]) -> Outcome {
    let widths = Widths::Either(ProjectKey::WIDTH, ProjectSpec::WIDTH);
    let key = match ProjectKey::from_row(row, widths) {
        Ok(key) => key,
        Err(e) => return Outcome::failure(Verb::List, e),
    };
    match fetch(client, key.url(client), "project").await {
        Ok(project) => Outcome::success(
            Verb::List,
            format!("PRESENT - {}", describe(&project, LIST_FIELDS)),
        ),
        Err(e) => Outcome::error(Verb::List, key, e),
    }
}

pub async fn delete(client: &ApplianceClient, row: &[String]) -> Outcome {
    let key = match ProjectKey::from_row(row, Widths::Exactly(ProjectKey::WIDTH)) {
        Ok(key) => key,
        Err(e) => return Outcome::failure(Verb::Delete, e),
    };
    super::delete(client, key.url(client), key).await
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn create_row() -> Vec<String> {
        "pool_0,unittest01,/export/unittest01,10g,10g,gzip,latency,False,128k,False,True,True,nobody,other,750,128k,1g,on,off"
            .split(',')
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn binds_create_row() {
        let spec = ProjectSpec::from_row(&create_row()).unwrap();
        assert_eq!(spec.pool, "pool_0");
        assert_eq!(spec.name, "unittest01");
        assert_eq!(spec.quota, 10_737_418_240);
        assert_eq!(spec.recordsize, 131_072);
        assert_eq!(spec.default_volsize, 1_073_741_824);
        assert!(spec.atime);
        assert_eq!(spec.key().to_string(), "project 'unittest01' pool 'pool_0'");
    }

    #[test]
    fn payload_has_no_pool_and_typed_values() {
        let spec = ProjectSpec::from_row(&create_row()).unwrap();
        let body = serde_json::to_value(&spec).unwrap();
        assert!(body.get("pool").is_none());
        assert_eq!(body["name"], "unittest01");
        assert_eq!(body["quota"], json!(10_737_418_240_u64));
        assert_eq!(body["nodestroy"], json!(false));
        assert_eq!(body["default_permissions"], "750");
    }

    #[test]
    fn create_width_error() {
        let row: Vec<String> = vec!["pool_0".into(), "p1".into()];
        let err = ProjectSpec::from_row(&row).unwrap_err();
        assert!(err.to_string().ends_with("It needs to be 19 columns long"));
    }

    #[test]
    fn list_accepts_key_or_create_width() {
        let widths = Widths::Either(ProjectKey::WIDTH, ProjectSpec::WIDTH);
        let key = ProjectKey::from_row(&create_row(), widths).unwrap();
        assert_eq!(key.project, "unittest01");

        let three: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
        let err = ProjectKey::from_row(&three, widths).unwrap_err();
        assert!(err.to_string().ends_with("It needs to be 2 or 19 columns long"));
    }

    #[test]
    fn list_message_shape() {
        let project = json!({
            "name": "p1", "pool": "pool_0", "mountpoint": "/export/p1",
            "quota": 10_240, "recordsize": 131_072, "atime": true
        });
        let text = describe(&project, LIST_FIELDS);
        assert!(text.starts_with("project 'p1' pool 'pool_0' mountpoint '/export/p1' quota '10 KB'"));
        assert!(text.contains("recordsize '128 KB'"));
        assert!(text.contains("reservation '-'"));
        assert!(text.ends_with("sharesmb '-'"));
    }
}
