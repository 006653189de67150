use packhub::domain::config::AssetsConfig;
use packhub::kernel::settings::FlatSettings;
use packhub::manifest::{ManifestError, RequestScope};
use serde_json::json;
use std::fs;
use std::sync::Arc;

#[test]
fn init_wires_package_roots_into_states() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("webpack-stats.json"),
        json!({"status": "done", "chunks": {"main": [{"name": "main.js"}]}}).to_string(),
    )
    .unwrap();

    let mut assets = AssetsConfig::default();
    assets.root_package = "shop".to_owned();
    assets.packages.insert("shop".to_owned(), dir.path().to_path_buf());

    let settings = FlatSettings::new().with("webpack.configs", "admin");
    let registry = packhub::init(&settings, &assets).unwrap();
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["DEFAULT", "admin"]);

    let urls = |path: &str| Ok::<_, ManifestError>(format!("/{path}"));
    let scope = RequestScope::new(registry, Arc::new(urls));
    let assets = scope.default_webpack().unwrap().get_bundle("main", None).unwrap();

    assert_eq!(assets[0].url(), "/webpack-DEFAULT/main.js");
}

#[test]
fn init_reports_bad_rules() {
    let settings = FlatSettings::new().with("webpack.ignore_re", "(");
    let err = packhub::init(&settings, &AssetsConfig::default()).expect_err("bad regex");
    assert!(matches!(err, ManifestError::InvalidRule { .. }));
}
