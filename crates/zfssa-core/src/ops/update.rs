// Generic property updates:
//
//   project,-;projname;pool,key1;val1,key2;val2
//   filesystem,fsname;projname;pool,key1;val1
//   lun,lunname;projname;pool,key1;val1
//
// The values are PUT as strings to the resource URL.

use std::fmt;

use serde_json::{Map, Value};
use strum::{Display, EnumString};
use url::Url;
use zfssa_api::ApplianceClient;

use super::project_segments;
use crate::outcome::{Outcome, Verb};
use crate::row::{Columns, RowError, Widths};

/// Resource type an update row targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Component {
    Project,
    #[strum(to_string = "filesystem", serialize = "fs")]
    Filesystem,
    Lun,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDirective {
    pub component: Component,
    /// Filesystem or LUN name; `-` for projects.
    pub name: String,
    pub project: String,
    pub pool: String,
    pub changes: Vec<(String, String)>,
}

impl UpdateDirective {
    pub const MIN_WIDTH: usize = 2;

    pub fn from_row(row: &[String]) -> Result<Self, RowError> {
        let mut cols = Columns::bind(row, Widths::AtLeast(Self::MIN_WIDTH))?;

        let raw = cols.ident("component")?;
        let component: Component = raw
            .parse()
            .map_err(|_| cols.reject(1, "component", raw, "expected project, filesystem or lun"))?;

        let target = cols.ident("target")?;
        let parts: Vec<&str> = target.split(';').map(str::trim).collect();
        let [name, project, pool] = parts.as_slice() else {
            return Err(cols.reject(2, "target", target, "expected name;project;pool"));
        };
        if project.is_empty() || pool.is_empty() {
            return Err(cols.reject(2, "target", target, "project and pool must not be empty"));
        }
        if component != Component::Project && (name.is_empty() || *name == "-") {
            return Err(cols.reject(2, "target", target, format!("{component} name is missing")));
        }

        let mut changes = Vec::new();
        let offset = cols.position();
        for (i, pair) in cols.rest().iter().enumerate() {
            let Some((key, value)) = pair.split_once(';') else {
                return Err(cols.reject(offset + i, "change", pair, "expected key;value"));
            };
            if key.trim().is_empty() {
                return Err(cols.reject(offset + i, "change", pair, "key must not be empty"));
            }
            changes.push((key.trim().to_owned(), value.trim().to_owned()));
        }

        Ok(Self {
            component,
            name: (*name).to_owned(),
            project: (*project).to_owned(),
            pool: (*pool).to_owned(),
            changes,
        })
    }

    pub fn url(&self, client: &ApplianceClient) -> Result<Url, zfssa_api::Error> {
        let mut segments = project_segments(&self.pool, Some(&self.project));
        match self.component {
            Component::Project => {}
            Component::Filesystem => segments.extend(["filesystems", self.name.as_str()]),
            Component::Lun => segments.extend(["luns", self.name.as_str()]),
        }
        client.endpoint(&segments)
    }

    /// The PUT body: every change as a string property.
    pub fn payload(&self) -> Value {
        let map: Map<String, Value> = self
            .changes
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Value::Object(map)
    }

    /// `key 'value' key 'value'`
    pub fn describe_changes(&self) -> String {
        self.changes
            .iter()
            .map(|(k, v)| format!("{k} '{v}'"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for UpdateDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.component {
            Component::Project => {
                write!(f, "project '{}' pool '{}'", self.project, self.pool)
            }
            Component::Filesystem | Component::Lun => write!(
                f,
                "{} '{}' project '{}' pool '{}'",
                self.component, self.name, self.project, self.pool
            ),
        }
    }
}

pub async fn run(client: &ApplianceClient, row: &[String]) -> Outcome {
    let directive = match UpdateDirective::from_row(row) {
        Ok(directive) => directive,
        Err(e) => return Outcome::failure(Verb::Update, e),
    };
    let updates = directive.describe_changes();
    let result = match directive.url(client) {
        Ok(url) => client.put_json(url, &directive.payload()).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(_) => Outcome::success(Verb::Update, format!("{directive} - updates: {updates}")),
        Err(e) => Outcome::failure(
            Verb::Update,
            format!("{directive} - Error \"{e}\" - updates: {updates}"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn row(line: &str) -> Vec<String> {
        line.split(',').map(str::to_owned).collect()
    }

    #[test]
    fn parses_project_directive() {
        let d = UpdateDirective::from_row(&row("project,-;projname;pool_0,quota;10G,atime;false"))
            .unwrap();
        assert_eq!(d.component, Component::Project);
        assert_eq!(d.to_string(), "project 'projname' pool 'pool_0'");
        assert_eq!(d.payload(), json!({"quota": "10G", "atime": "false"}));
        assert_eq!(d.describe_changes(), "quota '10G' atime 'false'");
    }

    #[test]
    fn fs_alias_and_case() {
        let d = UpdateDirective::from_row(&row("FS,fs01;unittest;pool_0,readonly;true")).unwrap();
        assert_eq!(d.component, Component::Filesystem);
        assert_eq!(d.to_string(), "filesystem 'fs01' project 'unittest' pool 'pool_0'");
    }

    #[test]
    fn value_may_contain_separator() {
        let d = UpdateDirective::from_row(&row("lun,l1;p;pool_0,description;a;b")).unwrap();
        assert_eq!(d.changes, vec![("description".to_owned(), "a;b".to_owned())]);
    }

    #[test]
    fn unknown_component_is_local_failure() {
        let err = UpdateDirective::from_row(&row("pool,x;p;pool_0,a;b")).unwrap_err();
        assert!(matches!(err, RowError::Field { column: 1, name: "component", .. }));
    }

    #[test]
    fn malformed_target_and_change() {
        let err = UpdateDirective::from_row(&row("lun,l1;p,a;b")).unwrap_err();
        assert!(matches!(err, RowError::Field { column: 2, name: "target", .. }));

        let err = UpdateDirective::from_row(&row("lun,l1;p;pool_0,a;b,oops")).unwrap_err();
        assert!(matches!(err, RowError::Field { column: 4, name: "change", .. }));

        let err = UpdateDirective::from_row(&row("lun")).unwrap_err();
        assert!(err.to_string().ends_with("It needs to be at least 2 columns long"));
    }
}
