use std::fs;

use tempfile::TempDir;
use vaultree_backend::{
    Directory, ExportRequest, Fixture, FixtureError, ResourceData, ResourceEncoding, StoreBackend,
    StoreFilter,
};
use vaultree_core::{BackendError, StoreAddress};

const FIXTURE: &str = r#"{
    "current": "dweb://me",
    "profiles": [
        { "address": "dweb://me", "name": "Me", "follows": ["dweb://bob"] },
        { "address": "dweb://bob", "name": "Bob" }
    ],
    "stores": [
        {
            "info": {
                "address": "dweb://mine",
                "title": "Mine",
                "is_owner": true,
                "is_saved": true
            },
            "directories": ["/empty"],
            "files": { "/notes/a.md": "alpha", "/top.txt": "top" },
            "unreplicated": { "/notes/far.md": "remote" }
        },
        {
            "info": { "address": "dweb://bobs", "is_saved": true, "author": "dweb://bob" }
        }
    ]
}"#;

fn write_fixture(dir: &TempDir, text: &str) -> std::path::PathBuf {
    let path = dir.path().join("fixture.json");
    fs::write(&path, text).unwrap();
    path
}

fn mine() -> StoreAddress {
    StoreAddress::new("dweb://mine")
}

#[tokio::test]
async fn test_fixture_load_and_build() {
    let temp = TempDir::new().unwrap();
    let path = write_fixture(&temp, FIXTURE);
    let (backend, directory) = Fixture::load(&path).unwrap().build().unwrap();

    let me = directory.current_profile().await.unwrap();
    assert!(me.is_current);
    assert_eq!(me.followed().count(), 1);

    let owned = directory.list_stores(StoreFilter::owned()).await.unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].title.as_deref(), Some("Mine"));

    let network = directory.list_stores(StoreFilter::network()).await.unwrap();
    assert_eq!(network[0].address.as_str(), "dweb://bobs");

    let bob = StoreAddress::new("dweb://bob");
    let published = directory.list_published_stores(&bob).await.unwrap();
    assert_eq!(published.len(), 1);

    let root = backend.list(&mine(), "").await.unwrap();
    let names: Vec<_> = root.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["empty", "notes", "top.txt"]);
}

#[test]
fn test_fixture_missing_file() {
    let temp = TempDir::new().unwrap();
    let err = Fixture::load(temp.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, FixtureError::Io { .. }));
}

#[test]
fn test_fixture_invalid_json() {
    let temp = TempDir::new().unwrap();
    let path = write_fixture(&temp, "{ not json");
    assert!(matches!(
        Fixture::load(&path).unwrap_err(),
        FixtureError::Parse { .. }
    ));
}

#[test]
fn test_fixture_requires_current_profile() {
    let fixture = Fixture::from_json(r#"{ "current": "dweb://ghost", "profiles": [] }"#).unwrap();
    assert!(matches!(
        fixture.build().unwrap_err(),
        FixtureError::MissingCurrentProfile(_)
    ));
}

#[tokio::test]
async fn test_unreplicated_read_is_unavailable() {
    let (backend, _) = Fixture::from_json(FIXTURE).unwrap().build().unwrap();

    let text = backend
        .read_resource(&mine(), "/notes/a.md", ResourceEncoding::Utf8)
        .await
        .unwrap();
    assert_eq!(text, ResourceData::Text("alpha".into()));

    let err = backend
        .read_resource(&mine(), "/notes/far.md", ResourceEncoding::Utf8)
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Unavailable { .. }));
}

#[tokio::test]
async fn test_export_skips_unreplicated() {
    let (backend, _) = Fixture::from_json(FIXTURE).unwrap().build().unwrap();
    let bobs = StoreAddress::new("dweb://bobs");

    let report = backend
        .export_across_stores(ExportRequest {
            source_store: mine(),
            source_path: "/notes".into(),
            destination_store: bobs.clone(),
            destination_path: "/copied".into(),
            skip_unreplicated: true,
        })
        .await
        .unwrap();

    assert_eq!(report.copied, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0], "/notes/far.md");
    assert_eq!(backend.file_content(&bobs, "/copied/a.md").as_deref(), Some("alpha"));
    assert!(!backend.contains(&bobs, "/copied/far.md"));
}

#[tokio::test]
async fn test_export_strict_fails_on_unreplicated() {
    let (backend, _) = Fixture::from_json(FIXTURE).unwrap().build().unwrap();
    let result = backend
        .export_across_stores(ExportRequest {
            source_store: mine(),
            source_path: "/notes".into(),
            destination_store: StoreAddress::new("dweb://bobs"),
            destination_path: "/copied".into(),
            skip_unreplicated: false,
        })
        .await;
    assert!(matches!(result, Err(BackendError::Unavailable { .. })));
}

#[tokio::test]
async fn test_offline_directory() {
    let (_, directory) = Fixture::from_json(FIXTURE).unwrap().build().unwrap();
    directory.set_offline(true);
    assert!(directory.current_profile().await.is_err());
    directory.set_offline(false);
    assert!(directory.current_profile().await.is_ok());
}

#[tokio::test]
async fn test_create_and_remove_container() {
    let (backend, _) = Fixture::from_json(FIXTURE).unwrap().build().unwrap();

    backend.create_container(&mine(), "/new").await.unwrap();
    let err = backend.create_container(&mine(), "/new").await.unwrap_err();
    assert!(matches!(err, BackendError::AlreadyExists { .. }));

    let err = backend
        .remove_container(&mine(), "/notes", false)
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Unavailable { .. }));
    backend.remove_container(&mine(), "/notes", true).await.unwrap();
    assert!(!backend.contains(&mine(), "/notes/a.md"));
}
