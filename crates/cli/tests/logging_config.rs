use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

/// A notebook with one readable note and one that isn't valid UTF-8, plus a
/// config logging to `log_file`.
fn setup(root: &Path, log_file: &Path, logging: &str) -> std::path::PathBuf {
    let notebook = root.join("notes");
    fs::create_dir_all(&notebook).unwrap();
    fs::write(notebook.join("index.md"), "# Index\n\nIndex of the Zettelkasten\n").unwrap();
    fs::write(notebook.join("broken.md"), [0xff, 0xfe, 0x00, 0x9f]).unwrap();

    let config_path = root.join("config.toml");
    let config_content = format!(
        r#"
version = 1
[profiles.default]
notebook_root = "{}"

[logging]
{logging}
file = "{}"
"#,
        notebook.display(),
        log_file.display()
    );
    fs::write(&config_path, config_content).unwrap();
    config_path
}

fn run_index(config_path: &Path) -> assert_cmd::assert::Assert {
    Command::new(assert_cmd::cargo::cargo_bin!("nidx"))
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config_path)
        .arg("index")
        .assert()
}

#[test]
fn index_logs_summary_and_failures_to_file() {
    let dir = tempdir().unwrap();
    let log_file = dir.path().join("logs/nidx.log");
    let config_path = setup(dir.path(), &log_file, r#"level = "info""#);

    run_index(&config_path)
        .success()
        .stdout(predicate::str::contains("Added:          1"))
        .stdout(predicate::str::contains("Failed:         1"))
        .stderr(predicate::str::contains("note not indexed"));

    let log = fs::read_to_string(&log_file).unwrap();
    assert!(log.contains("index updated"), "{log}");
    assert!(log.contains("added=1"), "{log}");
    assert!(log.contains("failed=1"), "{log}");

    let warning = log.lines().find(|l| l.contains("note not indexed")).unwrap();
    assert!(warning.contains("WARN"), "{warning}");
    assert!(warning.contains("path=broken.md"), "{warning}");
}

#[test]
fn index_runs_append_to_log_file() {
    let dir = tempdir().unwrap();
    let log_file = dir.path().join("nidx.log");
    let config_path = setup(dir.path(), &log_file, r#"level = "info""#);

    run_index(&config_path).success();
    run_index(&config_path).success().stdout(predicate::str::contains("Unchanged:      1"));

    let log = fs::read_to_string(&log_file).unwrap();
    assert_eq!(log.matches("index updated").count(), 2, "{log}");
}

#[test]
fn file_level_is_independent_of_stderr_level() {
    let dir = tempdir().unwrap();
    let log_file = dir.path().join("split.log");
    let config_path = setup(dir.path(), &log_file, "level = \"error\"\nfile_level = \"debug\"");

    run_index(&config_path).success().stderr(predicate::str::contains("note not indexed").not());

    let log = fs::read_to_string(&log_file).unwrap();
    let added = log.lines().find(|l| l.contains("note added to index")).unwrap();
    assert!(added.contains("DEBUG") && added.contains("path=index.md"), "{added}");
    assert!(log.contains("index updated"), "{log}");
    assert!(log.contains("note not indexed"), "{log}");
}
