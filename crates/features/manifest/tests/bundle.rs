mod common;

use common::{StatsFile, static_urls};
use packhub_manifest::{BundleResolver, Extensions, Manifest, ManifestError, ManifestState};
use serde_json::{Value, json};

fn resolve(
    state: &ManifestState,
    manifest: &Value,
    bundle: &str,
    extensions: Option<&Extensions>,
) -> Result<Vec<Value>, ManifestError> {
    let urls = static_urls();
    let manifest = Manifest::new(manifest.clone());
    BundleResolver::new(state, urls.as_ref())
        .resolve(&manifest, bundle, extensions)
        .map(|assets| assets.into_iter().map(|asset| Value::Object(asset.into_map())).collect())
}

fn plain_state() -> (StatsFile, ManifestState) {
    let stats = StatsFile::empty();
    let state = stats.state(|_| {});
    (stats, state)
}

#[test]
fn descriptor_is_chunk_plus_url() {
    let (_stats, state) = plain_state();
    let manifest =
        json!({"status": "done", "chunks": {"main": [{"name": "main.js", "path": "/static/main.js"}]}});

    let assets = resolve(&state, &manifest, "main", None).unwrap();

    assert_eq!(
        assets,
        vec![json!({
            "name": "main.js",
            "path": "/static/main.js",
            "url": "/static/webpack-DEFAULT/main.js"
        })]
    );
}

#[test]
fn public_path_takes_precedence() {
    let (_stats, state) = plain_state();
    let manifest = json!({"status": "done", "chunks": {"main": [
        {"name": "main.js", "publicPath": "https://cdn.example.com/main.js"}
    ]}});

    let assets = resolve(&state, &manifest, "main", None).unwrap();
    assert_eq!(assets[0]["url"], "https://cdn.example.com/main.js");
}

#[test]
fn existing_url_is_kept_and_empty_public_path_ignored() {
    let (_stats, state) = plain_state();
    let manifest = json!({"status": "done", "chunks": {"main": [
        {"name": "a.js", "url": "/already/a.js"},
        {"name": "b.js", "publicPath": ""}
    ]}});

    let assets = resolve(&state, &manifest, "main", None).unwrap();
    assert_eq!(assets[0]["url"], "/already/a.js");
    assert_eq!(assets[1]["url"], "/static/webpack-DEFAULT/b.js");
}

#[test]
fn bundle_dir_prefixes_static_paths() {
    let stats = StatsFile::empty();
    let state = stats.state(|cfg| cfg.static_view_path = "app:bundles".to_owned());
    let manifest = json!({"status": "done", "chunks": {"main": [{"name": "main.js"}]}});

    let assets = resolve(&state, &manifest, "main", None).unwrap();
    assert_eq!(assets[0]["url"], "/static/app:bundles/main.js");
}

#[test]
fn ignore_glob_drops_matching_chunks() {
    let stats = StatsFile::empty();
    let state = stats.state(|cfg| cfg.ignore = vec!["*.css".to_owned()]);
    let manifest = json!({"status": "done", "chunks": {"main": [
        {"name": "main.js"},
        {"name": "main.css"}
    ]}});

    let assets = resolve(&state, &manifest, "main", None).unwrap();
    let names: Vec<_> = assets.iter().map(|asset| asset["name"].clone()).collect();
    assert_eq!(names, vec![json!("main.js")]);
}

#[test]
fn default_ignores_drop_maps_and_hot_updates() {
    let (_stats, state) = plain_state();
    let manifest = json!({"status": "done", "chunks": {"main": [
        {"name": "main.js"},
        {"name": "main.js.map"},
        {"name": "0.1f2e.hot-update.js"}
    ]}});

    let assets = resolve(&state, &manifest, "main", None).unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0]["name"], "main.js");
}

#[test]
fn ignore_regex_drops_matching_chunks() {
    let stats = StatsFile::empty();
    let state = stats.state(|cfg| cfg.ignore_re = vec![r"vendor\.".to_owned()]);
    let manifest = json!({"status": "done", "chunks": {"main": [
        {"name": "vendor.js"},
        {"name": "main.vendor.js"}
    ]}});

    let assets = resolve(&state, &manifest, "main", None).unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0]["name"], "main.vendor.js");
}

#[test]
fn extension_filter_from_string_and_list() {
    let (_stats, state) = plain_state();
    let manifest = json!({"status": "done", "chunks": {"main": [
        {"name": "main.js"},
        {"name": "main.css"},
        {"name": "logo.png"}
    ]}});

    let from_string = resolve(&state, &manifest, "main", Some(&Extensions::parse(".js .css"))).unwrap();
    let from_list: Extensions = [".css"].into_iter().collect();
    let css_only = resolve(&state, &manifest, "main", Some(&from_list)).unwrap();

    assert_eq!(from_string.len(), 2);
    assert_eq!(from_string[0]["name"], "main.js");
    assert_eq!(from_string[1]["name"], "main.css");
    assert_eq!(css_only.len(), 1);
    assert_eq!(css_only[0]["name"], "main.css");
}

#[test]
fn unknown_bundle() {
    let (_stats, state) = plain_state();
    let manifest = json!({"status": "done", "chunks": {"other": []}});

    let err = resolve(&state, &manifest, "main", None).expect_err("no main bundle");
    assert!(matches!(err, ManifestError::UnknownBundle { ref bundle, .. } if bundle == "main"));
    assert!(err.is_not_found());
}

#[test]
fn compile_error_carries_manifest_fields() {
    let (_stats, state) = plain_state();
    let manifest = json!({"status": "error", "error": "ModuleNotFoundError", "message": "Cannot resolve './x'"});

    match resolve(&state, &manifest, "main", None).expect_err("build failed") {
        ManifestError::Compile { error, message, .. } => {
            assert_eq!(error, "ModuleNotFoundError");
            assert_eq!(message, "Cannot resolve './x'");
        },
        other => panic!("expected Compile, got {other:?}"),
    }
}

#[test]
fn unexpected_status() {
    let (stats, state) = plain_state();
    let manifest = json!({"status": "wat"});

    match resolve(&state, &manifest, "main", None).expect_err("unknown status") {
        ManifestError::UnexpectedStatus { status, resource, .. } => {
            assert_eq!(status, "wat");
            assert_eq!(resource, format!("Resource('{}')", stats.location()));
        },
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }

    let err = resolve(&state, &json!({"status": "compiling"}), "main", None).expect_err("not done");
    assert!(matches!(err, ManifestError::UnexpectedStatus { .. }));
}

#[test]
fn static_url_failure_fails_the_whole_bundle() {
    let (_stats, state) = plain_state();
    let manifest = json!({"status": "done", "chunks": {"main": [
        {"name": "a.js", "publicPath": "https://cdn.example.com/a.js"},
        {"name": "b.js"}
    ]}});
    let no_routes = |path: &str| {
        Err::<String, _>(ManifestError::StaticUrl { path: path.to_owned(), context: None })
    };

    let err = BundleResolver::new(&state, &no_routes)
        .resolve(&Manifest::new(manifest), "main", None)
        .expect_err("no static route");
    assert!(matches!(err, ManifestError::StaticUrl { ref path, .. } if path == "webpack-DEFAULT/b.js"));
}

#[test]
fn shared_manifest_is_never_mutated() {
    let stats = StatsFile::new(&json!({"status": "done", "chunks": {"main": [{"name": "main.js"}]}}));
    let state = stats.state(|_| {});
    let urls = static_urls();

    let manifest = state.load(Some(true), None).unwrap();
    let assets = BundleResolver::new(&state, urls.as_ref()).resolve(&manifest, "main", None).unwrap();

    assert_eq!(assets[0].url(), "/static/webpack-DEFAULT/main.js");
    let cached = state.load(Some(true), None).unwrap();
    assert!(cached.chunks("main").unwrap()[0].get("url").is_none());
}

#[test]
fn malformed_chunks_are_internal_errors() {
    let (_stats, state) = plain_state();
    let manifest = json!({"status": "done", "chunks": {"main": ["main.js"]}});

    let err = resolve(&state, &manifest, "main", None).expect_err("string chunk");
    assert!(matches!(err, ManifestError::Internal { .. }));
}
