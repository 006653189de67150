mod common;

use common::{StatsFile, static_urls};
use packhub_kernel::settings::FlatSettings;
use packhub_manifest::render::html_tag;
use packhub_manifest::{
    ASSET, BundleRef, Extensions, ManifestError, PackageRoots, Registry, RequestScope, render_bundle,
};
use serde_json::json;
use std::sync::Arc;

fn two_config_registry(default: &StatsFile, other: &StatsFile, debug: bool) -> Registry {
    let settings = FlatSettings::new()
        .with("webpack.debug", debug)
        .with("webpack.configs", "other")
        .with("webpack.stats_file", default.location())
        .with("webpack.other.stats_file", other.location());
    Registry::from_settings(&settings, "app", &PackageRoots::new()).unwrap()
}

#[test]
fn registry_holds_default_and_configured_names() {
    let default = StatsFile::empty();
    let other = StatsFile::empty();
    let registry = two_config_registry(&default, &other, true);

    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["DEFAULT", "other"]);
    assert_eq!(registry.len(), 2);
    assert!(registry.default_state().is_some());

    let err = registry.get("missing").expect_err("never registered");
    assert!(matches!(err, ManifestError::UnknownConfiguration { ref name, .. } if name == "missing"));
}

#[test]
fn named_configuration_inherits_debug() {
    let default = StatsFile::empty();
    let other = StatsFile::empty();
    let registry = two_config_registry(&default, &other, true);

    let default_state = registry.get("DEFAULT").unwrap();
    let other_state = registry.get("other").unwrap();

    assert_eq!(other_state.configuration().debug, default_state.configuration().debug);
    assert_eq!(other_state.configuration().stats_file, other.location());
    assert_eq!(other_state.configuration().static_view_name, "webpack-other");
}

#[test]
fn scope_memoizes_facades_per_name() {
    let default = StatsFile::empty();
    let other = StatsFile::empty();
    let scope = RequestScope::new(two_config_registry(&default, &other, false), static_urls());

    let first = scope.webpack("DEFAULT").unwrap();
    let second = scope.default_webpack().unwrap();
    let other_facade = scope.webpack("other").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(!Arc::ptr_eq(&first, &other_facade));
    assert_eq!(other_facade.name(), "other");
    assert!(matches!(scope.webpack("nope"), Err(ManifestError::UnknownConfiguration { .. })));
}

#[test]
fn facade_keeps_one_snapshot_per_request() {
    let default = StatsFile::new(&json!({"status": "done", "chunks": {"main": [{"name": "v1.js"}]}}));
    let other = StatsFile::empty();
    let registry = two_config_registry(&default, &other, true);

    let request = RequestScope::new(registry.clone(), static_urls());
    let webpack = request.webpack("DEFAULT").unwrap();
    assert_eq!(webpack.get_bundle("main", None).unwrap()[0].name(), Some("v1.js"));

    default.write(&json!({"status": "done", "chunks": {"main": [{"name": "v2.js"}]}}));
    assert_eq!(webpack.get_bundle("main", None).unwrap()[0].name(), Some("v1.js"));

    let next_request = RequestScope::new(registry, static_urls());
    let assets = next_request.webpack("DEFAULT").unwrap().get_bundle("main", None).unwrap();
    assert_eq!(assets[0].name(), Some("v2.js"));
}

#[test]
fn render_bundle_concatenates_in_order() {
    let default = StatsFile::new(&json!({"status": "done", "chunks": {"main": [
        {"name": "vendor.js"},
        {"name": "main.js"},
        {"name": "main.css"}
    ]}}));
    let other = StatsFile::new(&json!({"status": "done", "chunks": {"admin": [
        {"name": "admin.js", "publicPath": "https://cdn.example.com/admin.js"}
    ]}}));
    let scope = RequestScope::new(two_config_registry(&default, &other, false), static_urls());

    let js_only = Extensions::parse(".js");
    let html = render_bundle(&scope, &BundleRef::parse("main"), Some(&js_only), |asset| {
        format!("[{}]", asset.url())
    })
    .unwrap();
    assert_eq!(html, "[/static/webpack-DEFAULT/vendor.js][/static/webpack-DEFAULT/main.js]");

    let tags = render_bundle(&scope, &BundleRef::parse("other:admin"), None, html_tag).unwrap();
    assert_eq!(
        tags,
        "<script type=\"text/javascript\" src=\"https://cdn.example.com/admin.js\"></script>\n"
    );
    assert_eq!(ASSET, "ASSET");
}

#[test]
fn render_bundle_propagates_errors() {
    let default = StatsFile::new(&json!({"status": "done", "chunks": {}}));
    let other = StatsFile::empty();
    let scope = RequestScope::new(two_config_registry(&default, &other, false), static_urls());

    let err = render_bundle(&scope, &BundleRef::parse("main"), None, |_| String::new())
        .expect_err("missing bundle");
    assert!(matches!(err, ManifestError::UnknownBundle { .. }));

    let err = render_bundle(&scope, &BundleRef::parse("ghost:main"), None, |_| String::new())
        .expect_err("missing config");
    assert!(matches!(err, ManifestError::UnknownConfiguration { .. }));
}
