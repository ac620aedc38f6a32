//! Integration tests for loading and resolving configuration trees.

use projconf::config::{
    ConfigLoader, ConfigSet, Defaults, LoadOptions, ProjectFilter, load,
};
use projconf::error::{ConfigError, ErrorCode};
use projconf::format::{Format, FormatReader};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write `contents` to `root/rel`, creating parent directories.
fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn pattern(root: &Path, rel: &str) -> String {
    format!("{}/{}", root.display(), rel)
}

fn options(root: &Path) -> LoadOptions {
    LoadOptions::new()
        .with_public(pattern(root, "public/*/config"))
        .with_defaults(json!({}))
}

#[test]
fn test_default_and_env_files_merge_over_scaffold() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "public/web/config/default.yaml",
        "db:\n  host: localhost\n  port: 5432\nhosts: [a, b]\n",
    );
    write(
        temp.path(),
        "public/web/config/production.json",
        r#"{"db": {"host": "db.prod"}, "hosts": ["c"]}"#,
    );

    let opts = LoadOptions::new()
        .with_public(pattern(temp.path(), "public/*/config"))
        .with_env("production");
    let set = load(&opts).unwrap();

    assert_eq!(
        set.get("web"),
        Some(&json!({
            "env": "production",
            "project": "web",
            "db": {"host": "db.prod", "port": 5432},
            "hosts": ["c"]
        }))
    );
}

#[test]
fn test_no_env_resolves_default_entry() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "public/web/config/default.json", r#"{"a": 1}"#);

    let set = load(&options(temp.path())).unwrap();
    assert_eq!(set.get("web"), Some(&json!({"a": 1})));
}

#[test]
fn test_arrays_replaced_at_depth() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "public/web/config/default.json",
        r#"{"x": {"y": {"list": [1, 2, 3]}}}"#,
    );
    write(
        temp.path(),
        "public/web/config/dev.json",
        r#"{"x": {"y": {"list": [9]}}}"#,
    );

    let set = load(&options(temp.path()).with_env("dev")).unwrap();
    assert_eq!(set.get("web"), Some(&json!({"x": {"y": {"list": [9]}}})));
}

#[test]
fn test_missing_environment_fails_load() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "public/web/config/default.json", r#"{"a": 1}"#);

    let err = load(&options(temp.path()).with_env("production")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::MissingEnvironmentConfig);
    let message = err.to_string();
    assert!(message.contains("web"));
    assert!(message.contains("production"));
}

#[test]
fn test_use_if_no_env_falls_back_to_default() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "public/web/config/default.json",
        r#"{"useIfNoEnv": true, "port": 80}"#,
    );

    let set = load(&options(temp.path()).with_env("production")).unwrap();
    assert_eq!(set.get("web").unwrap()["port"], 80);
}

#[test]
fn test_inherit_uses_parent_resolution_as_base() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "public/base/config/default.json",
        r#"{"db": {"host": "shared", "pool": 5}, "features": ["a", "b"]}"#,
    );
    write(
        temp.path(),
        "public/base/config/production.json",
        r#"{"db": {"pool": 20}}"#,
    );
    write(
        temp.path(),
        "public/web/config/default.json",
        r#"{"inherit": "base", "features": ["c"]}"#,
    );

    let set = load(&options(temp.path()).with_env("production")).unwrap();
    assert_eq!(
        set.get("web"),
        Some(&json!({
            "db": {"host": "shared", "pool": 20},
            "features": ["c"],
            "inherit": "base"
        }))
    );
}

#[test]
fn test_inherit_missing_parent_fails_load() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "public/web/config/default.json",
        r#"{"inherit": "nowhere"}"#,
    );

    let err = load(&options(temp.path())).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::MissingParentConfig { ref parent, ref project }
            if parent == "nowhere" && project == "web"
    ));
}

#[test]
fn test_local_overrides_win_over_public() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "public/web/config/default.json",
        r#"{"db": {"host": "localhost", "user": "app"}, "hosts": ["a", "b"]}"#,
    );
    write(
        temp.path(),
        "local/web/config/default.json",
        r#"{"db": {"host": "10.0.0.5"}, "hosts": ["z"]}"#,
    );

    let opts = options(temp.path()).with_local(pattern(temp.path(), "local/*/config"));
    let set = load(&opts).unwrap();
    assert_eq!(
        set.get("web"),
        Some(&json!({"db": {"host": "10.0.0.5", "user": "app"}, "hosts": ["z"]}))
    );
}

#[test]
fn test_local_errors_never_abort_load() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "public/x/config/default.json", r#"{"ok": true}"#);
    write(temp.path(), "public/x/config/production.json", r#"{"env": "prod"}"#);
    // Project y only exists locally, has no production entry and a broken file.
    write(temp.path(), "local/y/config/default.json", r#"{"partial": 1}"#);
    write(temp.path(), "local/y/config/broken.json", "{not json");
    write(temp.path(), "local/z/config/default.json", r#"{"inherit": "ghost"}"#);

    let opts = options(temp.path())
        .with_env("production")
        .with_local(pattern(temp.path(), "local/*/config"));
    let set = load(&opts).unwrap();

    assert_eq!(set.get("x"), Some(&json!({"ok": true, "env": "prod"})));
}

#[test]
fn test_local_pattern_matching_nothing_is_fine() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "public/web/config/default.json", r#"{"a": 1}"#);

    let opts = options(temp.path()).with_local(pattern(temp.path(), "missing/*/config"));
    assert_eq!(load(&opts).unwrap().len(), 1);
}

#[test]
fn test_public_parse_error_fails_load() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "public/web/config/default.json", "{oops");

    let err = load(&options(temp.path())).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ParseError);
}

#[test]
fn test_unsupported_files_are_ignored() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "public/web/config/default.json", r#"{"a": 1}"#);
    write(temp.path(), "public/web/config/notes.txt", "ignore me");
    write(temp.path(), "public/web/config/default.JSON", "{broken");

    let set = load(&options(temp.path())).unwrap();
    assert_eq!(set.get("web"), Some(&json!({"a": 1})));
}

#[test]
fn test_nested_directories_become_projects() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "public/suite/config/default.json", r#"{"root": 1}"#);
    write(
        temp.path(),
        "public/suite/config/admin/default.toml",
        "nested = true\n",
    );

    let set = load(&options(temp.path())).unwrap();
    assert_eq!(set.get("suite"), Some(&json!({"root": 1})));
    assert_eq!(set.get("admin"), Some(&json!({"nested": true})));
}

#[test]
fn test_project_filter_keeps_single_project() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "public/base/config/default.json", r#"{"shared": 1}"#);
    write(
        temp.path(),
        "public/web/config/default.json",
        r#"{"inherit": "base"}"#,
    );

    let opts = options(temp.path()).with_project(ProjectFilter::parse("web"));
    let set = load(&opts).unwrap();
    assert_eq!(set.names().collect::<Vec<_>>(), vec!["web"]);
    assert_eq!(set.get("web").unwrap()["shared"], 1);

    let opts = options(temp.path()).with_project(ProjectFilter::parse("*"));
    assert_eq!(load(&opts).unwrap().len(), 2);
}

#[test]
fn test_custom_default_file_name() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "public/web/config/base.json", r#"{"a": 1}"#);
    write(temp.path(), "public/web/config/qa.json", r#"{"b": 2}"#);

    let opts = options(temp.path())
        .with_default_file_name("base")
        .with_env("qa");
    assert_eq!(load(&opts).unwrap().get("web"), Some(&json!({"a": 1, "b": 2})));
}

#[test]
fn test_defaults_factory_per_project() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "public/web/config/default.json", r#"{"name": "site"}"#);
    write(temp.path(), "public/api/config/default.json", r#"{"port": 81}"#);

    let opts = options(temp.path()).with_defaults(Defaults::factory(|ctx| {
        json!({
            "output": format!("dist/{}", ctx.project),
            "named": ctx.merged.get("name").is_some(),
        })
    }));
    let set = load(&opts).unwrap();
    assert_eq!(
        set.get("web"),
        Some(&json!({"output": "dist/web", "named": true, "name": "site"}))
    );
    assert_eq!(
        set.get("api"),
        Some(&json!({"output": "dist/api", "named": false, "port": 81}))
    );
}

#[test]
fn test_repeated_loads_accumulate() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "first/web/config/default.json",
        r#"{"a": 1, "list": [1, 2]}"#,
    );
    write(temp.path(), "second/api/config/default.json", r#"{"b": 2}"#);
    write(temp.path(), "third/web/config/default.json", r#"{"list": [3]}"#);

    let mut set = ConfigSet::new();
    let load_from = |rel: &str, set: &mut ConfigSet| {
        let opts = LoadOptions::new()
            .with_public(pattern(temp.path(), rel))
            .with_defaults(json!({}));
        ConfigLoader::new(opts).load_into(set).unwrap();
    };

    load_from("first/*/config", &mut set);
    load_from("second/*/config", &mut set);
    assert_eq!(set.names().collect::<Vec<_>>(), vec!["web", "api"]);

    load_from("third/*/config", &mut set);
    assert_eq!(set.get("web"), Some(&json!({"a": 1, "list": [3]})));
}

#[test]
fn test_failed_load_leaves_set_untouched() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "public/web/config/default.json", r#"{"a": 1}"#);

    let mut set = ConfigSet::new();
    set.insert("existing", json!({"kept": true}));
    let opts = options(temp.path()).with_env("production");
    assert!(ConfigLoader::new(opts).load_into(&mut set).is_err());
    assert_eq!(set.len(), 1);
}

/// Reader that understands `cson` as `key: value` lines, for testing the
/// reader seam.
struct CsonLines;

impl FormatReader for CsonLines {
    fn parse(&self, text: &str, format: Format) -> anyhow::Result<Option<Value>> {
        if format != Format::Cson {
            return projconf::format::BuiltinReader.parse(text, format);
        }
        let map = text
            .lines()
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_string(), Value::String(v.trim().to_string())))
            .collect();
        Ok(Some(Value::Object(map)))
    }
}

#[test]
fn test_custom_reader_handles_extra_formats() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "public/web/config/default.cson", "name: web\n");

    let set = load(&options(temp.path())).unwrap();
    assert!(set.is_empty());

    let loader = ConfigLoader::with_reader(options(temp.path()), Box::new(CsonLines));
    let set = loader.load().unwrap();
    assert_eq!(set.get("web"), Some(&json!({"name": "web"})));
}
