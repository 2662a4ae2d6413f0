use std::str::FromStr;

use vaultree_core::{
    CrossStoreMovePolicy, Identity, NodeKind, SortColumn, SortDirection, StoreAddress, StoreInfo,
    TextualExtensions, TreeConfig, validate_name,
};

#[test]
fn test_tree_config_builder() {
    let config = TreeConfig::builder()
        .max_preview_length(Some(120usize))
        .sort_column(SortColumn::Modified)
        .sort_direction(SortDirection::Desc)
        .cross_store_move(CrossStoreMovePolicy::BestEffort)
        .extra_textual_extensions(vec!["nfo".to_string()])
        .build()
        .unwrap();

    assert_eq!(config.max_preview_length, Some(120));
    assert_eq!(config.sort_column, SortColumn::Modified);
    assert_eq!(config.sort_direction, SortDirection::Desc);
    assert_eq!(config.cross_store_move, CrossStoreMovePolicy::BestEffort);

    // Test default config
    let default_config = TreeConfig::default();
    assert_eq!(default_config.max_preview_length, Some(500));
    assert_eq!(default_config.cross_store_move, CrossStoreMovePolicy::KeepSourceOnSkip);
}

#[test]
fn test_tree_config_rejects_tiny_preview() {
    assert!(TreeConfig::builder().max_preview_length(Some(3usize)).build().is_err());
    assert!(TreeConfig::builder().max_preview_length(None::<usize>).build().is_ok());

    let config: TreeConfig = serde_json::from_str(r#"{"max_preview_length": 2}"#).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_sort_column_parsing() {
    assert_eq!(SortColumn::from_str("name").unwrap(), SortColumn::Name);
    assert_eq!(SortColumn::from_str("SIZE").unwrap(), SortColumn::Size);
    assert_eq!(SortColumn::from_str("mtime").unwrap(), SortColumn::Modified);
    assert!(SortColumn::from_str("colour").is_err());
    assert_eq!(SortColumn::Modified.to_string(), "modified");
}

#[test]
fn test_store_type_label() {
    let mut info = StoreInfo::new("dweb://site");
    assert_eq!(info.type_label(), "vault");

    info.types = vec!["unknown".into(), "website".into()];
    assert_eq!(info.type_label(), "website");
}

#[test]
fn test_textual_extensions_with_config_extras() {
    let config = TreeConfig::builder()
        .extra_textual_extensions(vec![".NFO".to_string()])
        .build()
        .unwrap();
    let textual = TextualExtensions::with_extra(&config.extra_textual_extensions);

    assert!(textual.should_preview("release.nfo"));
    assert!(textual.should_preview("README"));
    assert!(textual.should_preview(".vaultignore"));
    assert!(!textual.should_preview("photo.jpg"));
}

#[test]
fn test_identity_distinguishes_kinds() {
    let store = StoreAddress::new("dweb://s");
    let root = Identity::store_root(store.clone());
    let pending = Identity::pending(store.clone(), "");

    assert_ne!(root, pending);
    assert_eq!(root.store(), Some(&store));
    assert!(!Identity::virtual_folder("trash").is_backed());
    assert!(pending.is_backed());
}

#[test]
fn test_node_kind_properties() {
    assert!(NodeKind::PendingFolder.is_container());
    assert!(!NodeKind::StoreFile.is_container());
    assert!(NodeKind::StoreFile.has_preview());
    assert!(!NodeKind::VirtualFolder.is_backed());
}

#[test]
fn test_validate_name_rules() {
    assert!(validate_name("report.txt").is_ok());
    assert!(validate_name("nested/name").is_err());
    assert!(validate_name("..").is_err());
    assert!(validate_name("trailing.").is_err());
    assert!(validate_name(" padded").is_err());
    assert!(validate_name(&"x".repeat(256)).is_err());
}
