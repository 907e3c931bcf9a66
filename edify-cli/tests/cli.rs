//! End to end tests of the `edify` binary

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("edify-parser")
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// An export with only the required sections: it compiles with two warnings.
const MINIMAL: &str = r##"<html><body>
<h2>Application Object Properties</h2>
<center><table><tr><th>Name</th><td>Demo</td></tr></table></center>
<h2>Entry Workspace: <a name="ws1">Main</a></h2>
<table><caption>Steps</caption>
<tr><td><strong><a name="s1">1</a></strong> End.<br></td><td>Return Mode = <em>Normal</em></td></tr>
</table>
</body></html>"##;

fn temp_file(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn summary_is_the_default_output() {
    let mut cmd = cargo_bin_cmd!("edify");
    cmd.arg(fixture_path("billing.html"));

    let output_pred = predicate::str::contains("application Billing")
        .and(predicate::str::contains("entry workspace Main: 9 steps, 2 subflows"))
        .and(predicate::str::contains("subroutine Lookup: 2 steps, 0 subflows"))
        .and(predicate::str::contains("exception handler OnError: 1 steps"))
        .and(predicate::str::contains("diagnostics: 0"));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn json_output_is_the_model() {
    let mut cmd = cargo_bin_cmd!("edify");
    cmd.arg(fixture_path("billing.html"))
        .arg("--format")
        .arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["subroutines"][0]["name"], "Main");
    assert_eq!(json["subroutines"][0]["steps"][3]["type"], "assign");
}

#[test]
fn debug_output() {
    let mut cmd = cargo_bin_cmd!("edify");
    cmd.arg(fixture_path("billing.html")).arg("-f").arg("debug");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("AppObject {"));
}

#[test]
fn unknown_format_is_rejected() {
    let mut cmd = cargo_bin_cmd!("edify");
    cmd.arg(fixture_path("billing.html"))
        .arg("--format")
        .arg("yaml");
    cmd.assert().failure();
}

#[test]
fn warnings_go_to_stderr() {
    let file = temp_file(MINIMAL, ".html");
    let mut cmd = cargo_bin_cmd!("edify");
    cmd.arg(file.path()).env_remove("EDIFY_LOG");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("diagnostics: 2"))
        .stderr(predicate::str::contains("could not find any \"Subroutine\" headings"));
}

#[test]
fn denied_warnings_exit_with_status_2() {
    let file = temp_file(MINIMAL, ".html");
    let mut cmd = cargo_bin_cmd!("edify");
    cmd.arg(file.path()).arg("--deny-warnings");
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("warnings are denied"));
}

#[test]
fn config_file_sets_the_format() {
    let config = temp_file("[output]\nformat = \"json\"\npretty = true\n", ".toml");
    let mut cmd = cargo_bin_cmd!("edify");
    cmd.arg(fixture_path("billing.html"))
        .arg("--config")
        .arg(config.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("{\n"));
}

#[test]
fn fatal_errors_exit_with_status_1() {
    let file = temp_file(&MINIMAL.replace("Return Mode", "Result"), ".html");
    let mut cmd = cargo_bin_cmd!("edify");
    cmd.arg(file.path());
    cmd.assert().code(1).stderr(predicate::str::contains(
        "error [Main]: end step Main::1 does not have a return mode",
    ));
}

#[test]
fn missing_file_exits_with_status_1() {
    let mut cmd = cargo_bin_cmd!("edify");
    cmd.arg(fixture_path("missing.html"));
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Error reading"));
}
