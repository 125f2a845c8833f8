use std::path::Path;

use dropprune::common::config::{discover_targets, Config, Mode};

fn local_config(targets: &str) -> Config {
    let text = format!(
        "[settings]\nregex_pattern = '.*'\nlocal = true\ndry_run = true\ndefault_keep = 4\n{}",
        targets
    );
    Config::parse(Path::new("test.toml"), &text).unwrap()
}

#[test]
fn test_nested_targets_in_document_order() {
    let config = local_config(
        r#"
[paths.zeta]
path_local = "/z"

[paths.group.alpha]
path_local = "/a"
keep = 2

[paths.group.sub.deep]
path_local = "/d"

[servers.mail]
path_local = "/m"
"#,
    );

    let names: Vec<&str> = config.targets.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["paths.zeta", "paths.group.alpha", "paths.group.sub.deep", "servers.mail"]
    );
    assert_eq!(config.targets[1].keep(&config.settings), 2);
    assert_eq!(config.targets[0].keep(&config.settings), 4);
}

#[test]
fn test_target_tables_are_not_descended() {
    let config = local_config(
        r#"
[paths.outer]
path_local = "/outer"

[paths.outer.inner]
path_local = "/inner"
"#,
    );

    assert_eq!(config.targets.len(), 1);
    assert_eq!(config.targets[0].path, "/outer");
}

#[test]
fn test_only_current_mode_path_key_marks_targets() {
    let config = local_config(
        r#"
[paths.remote_only]
path_dropbox = "/remote"

[paths.both]
path_dropbox = "/remote"
path_local = "/local"
"#,
    );

    assert_eq!(config.targets.len(), 1);
    assert_eq!(config.targets[0].path, "/local");
}

#[test]
fn test_ignore_list_and_non_table_values() {
    let config = local_config(
        r#"
[paths]
note = "not a target"
count = 3

[paths.db]
path_local = "/db"
ignore = ["keep_me.sql", "and_me.sql"]
"#,
    );

    assert_eq!(config.targets.len(), 1);
    let db = &config.targets[0];
    assert!(db.ignore.contains("keep_me.sql"));
    assert!(db.ignore.contains("and_me.sql"));
    assert!(!db.ignore.contains("KEEP_ME.sql"));
}

#[test]
fn test_malformed_target_is_config_error() {
    let text = "[settings]\nregex_pattern = '.*'\nlocal = true\ndry_run = true\n\
                [paths.db]\npath_local = \"/db\"\nignore = \"keep_me.sql\"\n";
    let err = Config::parse(Path::new("bad.toml"), text).unwrap_err();
    assert!(err.to_string().contains("bad.toml"));
    assert!(err.to_string().contains("paths.db"));
}

#[test]
fn test_discover_targets_skips_settings() {
    let doc: toml::Table = toml::from_str(
        r#"
[settings]
path_dropbox = "/looks/like/a/target"

[a]
path_dropbox = "/a"
"#,
    )
    .unwrap();

    let targets = discover_targets(&doc, Mode::Dropbox).unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].name, "a");
}

#[test]
fn test_load_reads_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("prune.toml");
    std::fs::write(
        &path,
        "[settings]\nregex_pattern = 'x'\nlocal = true\ndry_run = false\n[t]\npath_local = \"/t\"\n",
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.path, path);
    assert!(!config.settings.dry_run);
    assert_eq!(config.targets.len(), 1);
}
