use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/crates/index/tests/fixtures/search_index.js");

/// Runs in `dir` with no configuration leaking in from the environment.
fn docsift(dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_docsift"));
    command.current_dir(dir).env("HOME", dir).env("XDG_CONFIG_HOME", dir).env_remove("RUST_LOG");
    for (key, _) in std::env::vars() {
        if key.starts_with("DOCSIFT_") {
            command.env_remove(key);
        }
    }
    command
}

fn run_with_stdin(mut command: Command, input: &[u8]) -> Output {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn CLI");
    child.stdin.as_mut().expect("stdin open").write_all(input).expect("write stdin");
    child.wait_with_output().expect("read CLI output")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "cli exited with {}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn cli_check_fixture() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = docsift(dir.path()).args(["check", FIXTURE]).output().expect("run CLI");
    assert_success(&output);
    assert_eq!(stdout(&output), "69 records: 0 errors, 0 warnings\n");
}

#[test]
fn cli_check_rejects_null_location() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut command = docsift(dir.path());
    command.args(["check", "-"]);
    let input = br#"var documenterSearchIndex = {"docs":[{"location":null,"page":"Home","title":"Home","text":"","category":"page"}]}"#;
    let output = run_with_stdin(command, input);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing required field: location"));
}

#[test]
fn cli_check_reports_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut command = docsift(dir.path());
    command.args(["check", "-"]);
    let input = br#"var documenterSearchIndex = {"docs":[{"location":"about/","page":"About","title":"","text":"x","category":"page"}]}"#;
    let output = run_with_stdin(command, input);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "error at record 0: empty title\n1 records: 1 errors, 0 warnings\n");
}

#[test]
fn cli_search_ranks_docstring_first() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = docsift(dir.path()).args(["search", FIXTURE, "deepz", "-n", "1"]).output().expect("run CLI");
    assert_success(&output);
    let out = stdout(&output);
    let first = out.lines().next().expect("one hit");
    assert!(first.ends_with(
        "#11 [type] NeuralNetworkReachability.ForwardAlgorithms.DeepZ \
         (lib/ForwardAlgorithms/#NeuralNetworkReachability.ForwardAlgorithms.DeepZ)"
    ));
}

#[test]
fn cli_show_record_as_loaded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = docsift(dir.path()).args(["show", FIXTURE, "65", "--format", "json"]).output().expect("run CLI");
    assert_success(&output);
    let record: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON record");
    assert_eq!(record["location"], "lib/Util/#NeuralNetworkReachability.Util.ConvSet");
    assert_eq!(record["page"], "Util");
    assert_eq!(record["title"], "NeuralNetworkReachability.Util.ConvSet");
    assert_eq!(record["category"], "type");
}

#[test]
fn cli_show_out_of_range() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = docsift(dir.path()).args(["show", FIXTURE, "69"]).output().expect("run CLI");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn cli_export_from_stdin_is_identical() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut command = docsift(dir.path());
    command.args(["export", "-"]);
    let output = run_with_stdin(command, include_bytes!("../crates/index/tests/fixtures/search_index.js"));
    assert_success(&output);
    assert_eq!(stdout(&output), include_str!("../crates/index/tests/fixtures/search_index.js"));
}

#[test]
fn cli_uses_configured_index() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("docsift.toml"), format!("index = {FIXTURE:?}\n")).expect("write config");
    let output = docsift(dir.path()).args(["stats", "--format", "json"]).output().expect("run CLI");
    assert_success(&output);
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON stats");
    assert_eq!(stats["records"], 69);
    assert_eq!(stats["categories"]["type"], 19);
}

#[test]
fn cli_show_uses_configured_index() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = docsift(dir.path())
        .args(["show", "65"])
        .env("DOCSIFT_INDEX", FIXTURE)
        .output()
        .expect("run CLI");
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.starts_with("position: 65\nlocation: lib/Util/#NeuralNetworkReachability.Util.ConvSet\npage: Util\n"));
    assert!(out.contains("category: type\n"));
}

#[test]
fn cli_without_index_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = docsift(dir.path()).arg("pages").output().expect("run CLI");
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no index given"));
}

#[test]
fn cli_diff() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = docsift(dir.path()).args(["diff", FIXTURE, FIXTURE]).output().expect("run CLI");
    assert_success(&output);
    assert_eq!(stdout(&output), "0 added, 0 removed, 0 changed, 69 unchanged\n");

    let edited = std::fs::read_to_string(FIXTURE)
        .expect("read fixture")
        .replace("Forward algorithm based on zonotopes", "Forward algorithm using zonotopes");
    let new = dir.path().join("new.js");
    std::fs::write(&new, edited).expect("write edited index");
    let output = docsift(dir.path()).arg("diff").arg(FIXTURE).arg(&new).output().expect("run CLI");
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.starts_with("~ #11 -> #11 [type] NeuralNetworkReachability.ForwardAlgorithms.DeepZ"));
    assert!(out.ends_with("0 added, 0 removed, 1 changed, 68 unchanged\n"));
}
