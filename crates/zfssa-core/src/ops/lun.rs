// LUNs: `.../projects/{project}/luns[/{lun}]`

use std::fmt;

use serde::Serialize;
use url::Url;
use zfssa_api::ApplianceClient;

use super::{Field, Render, describe, fetch, project_segments};
use crate::outcome::{Action, Outcome, Verb};
use crate::row::{Columns, RowError, Widths};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LunSpec {
    #[serde(skip)]
    pub pool: String,
    #[serde(skip)]
    pub project: String,
    pub name: String,
    pub volsize: u64,
    pub volblocksize: u64,
    /// Thin provisioning; the appliance calls it `sparse`.
    #[serde(rename = "sparse")]
    pub thin: bool,
    pub targetgroup: String,
    pub initiatorgroup: String,
    pub compression: String,
    pub logbias: String,
    pub nodestroy: bool,
}

impl LunSpec {
    pub const WIDTH: usize = 11;

    pub fn from_row(row: &[String]) -> Result<Self, RowError> {
        let mut cols = Columns::bind(row, Widths::Exactly(Self::WIDTH))?;
        Ok(Self {
            pool: cols.ident("pool")?.to_owned(),
            project: cols.ident("project")?.to_owned(),
            name: cols.ident("lun")?.to_owned(),
            volsize: cols.size("volsize")?,
            volblocksize: cols.blocksize("volblocksize")?,
            thin: cols.flag("thin")?,
            targetgroup: cols.text("targetgroup").to_owned(),
            initiatorgroup: cols.text("initiatorgroup").to_owned(),
            compression: cols.text("compression").to_owned(),
            logbias: cols.text("logbias").to_owned(),
            nodestroy: cols.flag("nodestroy")?,
        })
    }

    pub fn key(&self) -> LunKey {
        LunKey {
            pool: self.pool.clone(),
            project: self.project.clone(),
            lun: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LunKey {
    pub pool: String,
    pub project: String,
    pub lun: String,
}

impl LunKey {
    pub const WIDTH: usize = 3;

    pub fn from_row(row: &[String], widths: Widths) -> Result<Self, RowError> {
        let mut cols = Columns::bind(row, widths)?;
        Ok(Self {
            pool: cols.ident("pool")?.to_owned(),
            project: cols.ident("project")?.to_owned(),
            lun: cols.ident("lun")?.to_owned(),
        })
    }

    pub fn url(&self, client: &ApplianceClient) -> Result<Url, zfssa_api::Error> {
        let mut segments = project_segments(&self.pool, Some(&self.project));
        segments.extend(["luns", self.lun.as_str()]);
        client.endpoint(&segments)
    }
}

impl fmt::Display for LunKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lun '{}' project '{}' pool '{}'",
            self.lun, self.project, self.pool
        )
    }
}

const LIST_FIELDS: &[Field] = &[
    ("lun", "name", Render::Plain),
    ("project", "project", Render::Plain),
    ("pool", "pool", Render::Plain),
    ("assigned number", "assignednumber", Render::Plain),
    ("initiatorgroup", "initiatorgroup", Render::Plain),
    ("volsize", "volsize", Render::Size),
    ("volblocksize", "volblocksize", Render::Size),
    ("status", "status", Render::Plain),
    ("space_total", "space_total", Render::Size),
    ("lunguid", "lunguid", Render::Plain),
    ("logbias", "logbias", Render::Plain),
    ("creation", "creation", Render::Plain),
    ("thin", "sparse", Render::Plain),
    ("nodestroy", "nodestroy", Render::Plain),
];

pub async fn run(action: Action, client: &ApplianceClient, row: &[String]) -> Outcome {
    match action {
        Action::Create => create(client, row).await,
        Action::List => list(client, row).await,
        Action::Delete => delete(client, row).await,
    }
}

pub async fn create(client: &ApplianceClient, row: &[String]) -> Outcome {
    let spec = match LunSpec::from_row(row) {
        Ok(spec) => spec,
        Err(e) => return Outcome::failure(Verb::Create, e),
    };
    let mut segments = project_segments(&spec.pool, Some(&spec.project));
    segments.push("luns");
    let url = client.endpoint(&segments);
    super::create(client, url, &spec, spec.key()).await
}

pub async fn list(client: &ApplianceClient, row: &[String]) -> Outcome {
    let widths = Widths::Either(LunKey::WIDTH, LunSpec::WIDTH);
    let key = match LunKey::from_row(row, widths) {
        Ok(key) => key,
        Err(e) => return Outcome::failure(Verb::List, e),
    };
    match fetch(client, key.url(client), "lun").await {
        Ok(lun) => Outcome::success(
            Verb::List,
            format!("PRESENT - {}", describe(&lun, LIST_FIELDS)),
        ),
        Err(e) => Outcome::error(Verb::List, key, e),
    }
}

pub async fn delete(client: &ApplianceClient, row: &[String]) -> Outcome {
    let key = match LunKey::from_row(row, Widths::Exactly(LunKey::WIDTH)) {
        Ok(key) => key,
        Err(e) => return Outcome::failure(Verb::Delete, e),
    };
    super::delete(client, key.url(client), key).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn create_row() -> Vec<String> {
        "pool_0,unittest,lun01,1g,128k,False,default,cluster-test,gzip,latency,False"
            .split(',')
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn thin_is_sent_as_sparse() {
        let spec = LunSpec::from_row(&create_row()).unwrap();
        let body = serde_json::to_value(&spec).unwrap();
        assert_eq!(body["sparse"], json!(false));
        assert!(body.get("thin").is_none());
        assert_eq!(body["volsize"], json!(1_073_741_824));
        assert_eq!(body["volblocksize"], json!(131_072));
    }

    #[test]
    fn bad_volsize_is_reported() {
        let mut row = create_row();
        row[3] = "lots".into();
        let err = LunSpec::from_row(&row).unwrap_err();
        assert!(matches!(err, RowError::Field { column: 4, name: "volsize", .. }));
    }

    #[test]
    fn list_width_error() {
        let row: Vec<String> = vec!["pool_0".into(), "p".into()];
        let err = LunKey::from_row(&row, Widths::Either(LunKey::WIDTH, LunSpec::WIDTH)).unwrap_err();
        assert!(err.to_string().ends_with("It needs to be 3 or 11 columns long"));
    }
}
