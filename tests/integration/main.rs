//! Integration tests for Tendril
//!
//! These tests run the CLI against a small fixture project.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// ```text
/// src/index.ts -> src/a.ts -> src/b.ts -> src/a.ts
///              -> src/util/log.ts
/// src/b.ts     -> src/util/log.ts
/// ```
fn create_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "package.json", r#"{ "name": "@acme/app" }"#);
    write(
        root,
        "src/index.ts",
        "import { a } from './a';\nimport { log } from './util/log';\n\nlog(a());\n",
    );
    write(root, "src/a.ts", "import { b } from './b';\n\nexport const a = () => b();\n");
    write(
        root,
        "src/b.ts",
        "import { a } from './a';\nimport { log } from './util/log';\n\nexport const b = () => a;\n",
    );
    write(root, "src/util/log.ts", "export const log = console.log;\n");
    dir
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn tendril(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tendril"))
        .arg("--root")
        .arg(root)
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute tendril")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_tendril"))
        .arg("--help")
        .output()
        .unwrap();

    let text = stdout(&output);
    assert!(output.status.success());
    assert!(text.contains("Dependency graph analysis"));
    for command in ["tree", "check", "explain", "render"] {
        assert!(text.contains(command), "missing {command}");
    }
}

#[test]
fn test_tree() {
    let project = create_project();
    let output = tendril(project.path(), &["tree", "src/index.ts", "--no-color"]);

    assert!(output.status.success(), "{}", stderr(&output));
    let board = stdout(&output);
    insta::assert_snapshot!(board.trim_end(), @r###"
    src/index.ts   ╶─┬─────┐
    src/a.ts       ◁─┴─┬─┐ │
    src/b.ts       ◁─┬─┴─┘ │
    src/util/log.ts◁─┴─────┘
    "###);
}

#[test]
fn test_tree_honors_exclude() {
    let project = create_project();
    write(project.path(), ".tendril.yml", "exclude: [\"src/util\"]\n");

    let output = tendril(project.path(), &["tree", "src/index.ts", "--no-color"]);

    assert!(output.status.success(), "{}", stderr(&output));
    let board = stdout(&output);
    assert_eq!(board.lines().count(), 3);
    assert!(!board.contains("log.ts"));
}

#[test]
fn test_tree_missing_entrypoint() {
    let project = create_project();
    let output = tendril(project.path(), &["tree", "src/nope.ts"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("does not exist"));
}

#[test]
fn test_check_reports_cycles() {
    let project = create_project();
    let output = tendril(project.path(), &["check", "src/index.ts"]);

    assert!(!output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Found 1 circular dependencies"));
    assert!(text.contains("src/b.ts -> src/a.ts"));
}

#[test]
fn test_check_with_configured_entrypoints() {
    let project = create_project();
    write(
        project.path(),
        ".tendril.yml",
        "check:\n  entrypoints: [\"src/index.ts\"]\n  allow_circular_dependencies: true\n",
    );

    let output = tendril(project.path(), &["check"]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("src/b.ts -> src/a.ts"));
}

#[test]
fn test_check_without_cycles() {
    let project = create_project();
    let output = tendril(project.path(), &["check", "src/util/log.ts"]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("No circular dependencies detected."));
}

#[test]
fn test_check_requires_entrypoints() {
    let project = create_project();
    let output = tendril(project.path(), &["check"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("No entrypoints given"));
}

#[test]
fn test_explain_single_edge() {
    let project = create_project();
    let output = tendril(project.path(), &["explain", "src/index.ts", "src/util/log.ts"]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "src/index.ts -> src/util/log.ts\n");
}

#[test]
fn test_explain_directory() {
    let project = create_project();
    let output = tendril(project.path(), &["explain", "src", "src/util/log.ts"]);

    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    insta::assert_snapshot!(text.trim_end(), @r###"
    src/a.ts -> src/b.ts
    src/b.ts -> src/a.ts
    src/b.ts -> src/util/log.ts
    src/index.ts -> src/a.ts
    src/index.ts -> src/util/log.ts
    "###);
}

#[test]
fn test_explain_disconnected_is_empty() {
    let project = create_project();
    let output = tendril(project.path(), &["explain", "src/util/log.ts", "src/index.ts"]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_render_json() {
    let project = create_project();
    let output = tendril(project.path(), &["render", "src/index.ts", "--json"]);

    assert!(output.status.success(), "{}", stderr(&output));
    let document: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let nodes = document["nodes"].as_array().unwrap();
    let links = document["links"].as_array().unwrap();

    assert_eq!(nodes.len(), 4);
    assert_eq!(nodes[0]["fileName"], "index.ts");
    assert_eq!(nodes[0]["dirName"], "src/");
    assert_eq!(links.len(), 5);
    let red: Vec<_> = links.iter().filter(|l| l["color"] == "red").collect();
    assert_eq!(red.len(), 1);
}

#[test]
fn test_render_html() {
    let project = create_project();
    let out = project.path().join("graph.html");
    let output = tendril(
        project.path(),
        &["render", "src/index.ts", "--output", out.to_str().unwrap(), "--no-browser"],
    );

    assert!(output.status.success(), "{}", stderr(&output));
    let html = fs::read_to_string(out).unwrap();
    assert!(html.contains(r#"const GRAPH = {"nodes":["#));
    assert!(!html.contains("const GRAPH = {}"));
}
