// ── Per-entity operations ──
//
// Each operation binds one row to its typed record, issues a single REST
// call and folds the result into an `Outcome`. Errors never escape.

pub mod filesystem;
pub mod lun;
pub mod project;
pub mod snapshot;
pub mod update;

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use url::Url;
use zfssa_api::ApplianceClient;

use crate::outcome::{Outcome, Verb};
use crate::size;

pub use filesystem::{FilesystemKey, FilesystemSpec};
pub use lun::{LunKey, LunSpec};
pub use project::{ProjectKey, ProjectSpec};
pub use snapshot::{SnapshotKind, SnapshotSpec};
pub use update::{Component, UpdateDirective};

/// Render a response field for a message or CSV cell.
///
/// Strings are shown as-is, missing or `null` fields as `-`, everything
/// else (numbers, booleans, arrays) as compact JSON.
pub fn show(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_owned(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// How a response field is rendered in a `PRESENT` message.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Render {
    Plain,
    Size,
}

/// `(label, response key, rendering)`
pub(crate) type Field = (&'static str, &'static str, Render);

/// `label 'value' label 'value' ...` for the given fields of `obj`.
pub(crate) fn describe(obj: &Value, fields: &[Field]) -> String {
    fields
        .iter()
        .map(|&(label, key, render)| {
            let value = match render {
                Render::Plain => show(obj.get(key)),
                Render::Size => size::format_size_value(obj.get(key)),
            };
            format!("{label} '{value}'")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `storage/v1/pools/{pool}/projects[/{project}]` as path segments.
pub(crate) fn project_segments<'a>(pool: &'a str, project: Option<&'a str>) -> Vec<&'a str> {
    let mut segments = vec!["storage", "v1", "pools", pool, "projects"];
    segments.extend(project);
    segments
}

pub(crate) async fn create(
    client: &ApplianceClient,
    url: Result<Url, zfssa_api::Error>,
    body: &(impl Serialize + Sync),
    subject: impl fmt::Display,
) -> Outcome {
    let result = match url {
        Ok(url) => client.post_json(url, body).await.map(|_| ()),
        Err(e) => Err(e),
    };
    settle(Verb::Create, result, subject)
}

pub(crate) async fn delete(
    client: &ApplianceClient,
    url: Result<Url, zfssa_api::Error>,
    subject: impl fmt::Display,
) -> Outcome {
    let result = match url {
        Ok(url) => client.delete(url).await,
        Err(e) => Err(e),
    };
    settle(Verb::Delete, result, subject)
}

/// GET a single resource and pull out the object under `root`.
///
/// A body without that object cannot name the resource, so it is an error
/// rather than an empty listing.
pub(crate) async fn fetch(
    client: &ApplianceClient,
    url: Result<Url, zfssa_api::Error>,
    root: &str,
) -> Result<Value, zfssa_api::Error> {
    let mut body = client.get_json(url?).await?;
    if !body.get(root).is_some_and(Value::is_object) {
        return Err(zfssa_api::Error::Deserialization {
            message: format!("response has no '{root}' object"),
            body: body.to_string(),
        });
    }
    Ok(body[root].take())
}

fn settle(
    verb: Verb,
    result: Result<(), zfssa_api::Error>,
    subject: impl fmt::Display,
) -> Outcome {
    match result {
        Ok(()) => Outcome::success(verb, subject),
        Err(e) => Outcome::error(verb, subject, e),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn show_renders_missing_as_dash() {
        let obj = json!({"name": "fs01", "quota": 0, "readonly": false, "links": ["ixgbe0"], "none": null});
        assert_eq!(show(obj.get("name")), "fs01");
        assert_eq!(show(obj.get("quota")), "0");
        assert_eq!(show(obj.get("readonly")), "false");
        assert_eq!(show(obj.get("links")), r#"["ixgbe0"]"#);
        assert_eq!(show(obj.get("none")), "-");
        assert_eq!(show(obj.get("absent")), "-");
    }

    #[test]
    fn describe_formats_sizes() {
        let obj = json!({"name": "p1", "quota": 10_240});
        let fields = [
            ("project", "name", Render::Plain),
            ("quota", "quota", Render::Size),
            ("logbias", "logbias", Render::Plain),
        ];
        assert_eq!(describe(&obj, &fields), "project 'p1' quota '10 KB' logbias '-'");
    }

    #[test]
    fn project_segments_with_and_without_name() {
        assert_eq!(
            project_segments("pool_0", None),
            ["storage", "v1", "pools", "pool_0", "projects"]
        );
        assert_eq!(project_segments("pool_0", Some("p1")).last(), Some(&"p1"));
    }
}
