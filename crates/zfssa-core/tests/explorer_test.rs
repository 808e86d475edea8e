#![allow(clippy::unwrap_used)]
// Explorer runs against a mock appliance.

use std::fs::File;
use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zfssa_api::{ApplianceClient, Credentials, TlsPolicy, TransportConfig};
use zfssa_core::{Category, ConsoleReporter, Explorer};

async fn setup(timeout: Duration) -> (MockServer, ApplianceClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let transport = TransportConfig::new(TlsPolicy::Skip, timeout);
    let client = ApplianceClient::new(
        base_url,
        Credentials::new("root", SecretString::from("letmein".to_owned())),
        &transport,
    )
    .unwrap();
    (server, client)
}

#[tokio::test]
async fn test_one_slow_endpoint_out_of_twenty() {
    let (server, client) = setup(Duration::from_secs(1)).await;

    Mock::given(method("GET"))
        .and(path("/api/network/v1/routes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"routes": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let categories: Vec<Category> = Category::ALL[..20].to_vec();
    assert!(categories.contains(&Category::Routes));

    let mut reporter = ConsoleReporter::new(Vec::new(), false);
    let report = Explorer::new(&client, root.path())
        .with_categories(categories)
        .run(&mut reporter)
        .await
        .unwrap();

    assert_eq!(report.collected, 19);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, Category::Routes);
    assert!(report.failed[0].1.contains("timed out"), "{:?}", report.failed);

    let archive = report.archive.unwrap();
    assert_eq!(archive.extension().unwrap(), "zip");
    let zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
    assert_eq!(zip.len(), 19);
    assert!(zip.file_names().all(|name| name.ends_with(".csv")));
    assert!(!zip.file_names().any(|name| name.ends_with("/routes.csv")));

    // Only the archive is left behind.
    let left: Vec<_> = std::fs::read_dir(root.path()).unwrap().collect();
    assert_eq!(left.len(), 1);

    let printed = String::from_utf8(reporter.into_inner()).unwrap();
    assert_eq!(printed.matches("EXPLORER - SUCCESS - ").count(), 19);
    assert!(printed.contains("EXPLORER - FAIL - network/v1/routes - Error \"Request timed out after 1s\""));
}

#[tokio::test]
async fn test_nothing_collected_is_reported_not_fatal() {
    let (server, client) = setup(Duration::from_secs(2)).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let mut reporter = ConsoleReporter::new(Vec::new(), false);
    let report = Explorer::new(&client, root.path())
        .with_categories([Category::Version, Category::Users])
        .run(&mut reporter)
        .await
        .unwrap();

    assert_eq!(report.collected, 0);
    assert_eq!(report.failed.len(), 2);
    assert!(report.archive.is_none());

    let printed = String::from_utf8(reporter.into_inner()).unwrap();
    assert!(printed.contains("Nothing to compress"));
}

#[tokio::test]
async fn test_csv_content_inside_archive() {
    let (server, client) = setup(Duration::from_secs(2)).await;

    Mock::given(method("GET"))
        .and(path("/api/user/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": [
            {"logname": "root", "type": "local", "uid": 0, "fullname": "Super-User",
             "initial_password": "DEFAULT", "require_annotation": false,
             "href": "/api/user/v1/users/root"}
        ]})))
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let mut reporter = ConsoleReporter::new(Vec::new(), false);
    let report = Explorer::new(&client, root.path())
        .with_categories([Category::Users])
        .run(&mut reporter)
        .await
        .unwrap();

    let mut zip = zip::ZipArchive::new(File::open(report.archive.unwrap()).unwrap()).unwrap();
    let mut entry = zip.by_index(0).unwrap();
    assert!(entry.name().starts_with("zfssa_explorer_127.0.0.1_"));
    let mut text = String::new();
    std::io::Read::read_to_string(&mut entry, &mut text).unwrap();
    assert_eq!(
        text,
        "sep=;\n\
         logname;type;uid;fullname;initial_password;require_annotation;roles;kiosk_mode;kiosk_screen;href\n\
         root;local;0;Super-User;DEFAULT;false;-;-;-;/api/user/v1/users/root\n"
    );
}
