//! Tests for the `stretchtext` binary.

#![cfg(feature = "cli")]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const BIN: &str = env!("CARGO_BIN_EXE_stretchtext");

const GOOD: &str = r##"<html><body>
<p><a class="stretchsummary" href="#more">Tea</a></p>
<div id="more" style="display: none">Brewed at dawn.</div>
<p><span epub-type="stretchsummary">smiled</span><span> faintly</span></p>
</body></html>"##;

const BROKEN: &str = r##"<html><body>
<p><a class="stretchsummary" href="#gone">Tea</a></p>
</body></html>"##;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(BIN).args(args).output().expect("run stretchtext")
}

#[test]
fn test_check_lists_summaries() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "chapter.xhtml", GOOD);

    let output = run(&["check", input.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Summaries: 2"), "{stdout}");
    assert!(stdout.contains(r#"-> <div id="more">"#), "{stdout}");
}

#[test]
fn test_check_json_reports_errors() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "broken.xhtml", BROKEN);

    let output = run(&["check", "--json", input.to_str().unwrap()]);
    assert!(!output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let first = &reports[0];
    assert_eq!(first["kind"], "block");
    assert_eq!(first["marker"], "class");
    assert_eq!(
        first["error"],
        "No StretchText details element with ID: gone"
    );
}

#[test]
fn test_toggle_opens_then_closes() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "chapter.xhtml", GOOD);
    let input = input.to_str().unwrap();

    // Attribute-marked summaries come first, so the anchor is index 1.
    let once = run(&["toggle", input, "--summary", "1", "--json"]);
    assert!(once.status.success());
    let report: serde_json::Value = serde_json::from_slice(&once.stdout).unwrap();
    assert_eq!(report["state"], "open");
    assert_eq!(report["title"], "Collapse");
    assert_eq!(report["detail"]["display"], "block");

    let twice = run(&["toggle", input, "--summary", "1", "--times", "2", "--json"]);
    let report: serde_json::Value = serde_json::from_slice(&twice.stdout).unwrap();
    assert_eq!(report["state"], "closed");
    assert_eq!(report["title"], "Expand");
    assert_eq!(report["detail"]["display"], "none");
}

#[test]
fn test_toggle_with_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "chapter.xhtml", GOOD);
    let config = write(
        dir.path(),
        "stretchtext.json",
        r#"{ "titleWhenClosed": "Show", "titleWhenOpen": "Hide", "openClass": "shown" }"#,
    );

    let output = run(&[
        "--config",
        config.to_str().unwrap(),
        "toggle",
        input.to_str().unwrap(),
        "--json",
    ]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["title"], "Hide");
    assert_eq!(report["detail"]["display"], "inline");
    assert!(
        report["summary_class"]
            .as_str()
            .is_some_and(|c| c.contains("shown"))
    );
}

#[test]
fn test_toggle_index_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "chapter.xhtml", GOOD);

    let output = run(&["toggle", input.to_str().unwrap(), "--summary", "9"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("summary index 9 out of range"), "{stderr}");
}
