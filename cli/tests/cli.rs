use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn mlstr(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mlstr"))
        .arg("--no-color")
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run mlstr")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn fixture_suite_passes() {
    let cases = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/cases");
    let output = mlstr(&["test", cases]);
    assert!(output.status.success(), "fixtures failed:\n{}", stderr(&output));
    assert!(stderr(&output).contains("test result: ok."));
}

#[test]
fn fixture_categories_filter() {
    let cases = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/cases");
    let output = mlstr(&["test", cases, "-c", "join"]);
    assert!(output.status.success());
    let err = stderr(&output);
    assert!(err.contains("3 passed, 0 failed"), "{}", err);
    assert!(!err.contains("format"));
}

#[test]
fn failing_fixture_reports_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = write(
        dir.path(),
        "wrong.test.txt",
        "---\noperation = \"join\"\nitems = [\"a\", \"b\"]\nexpect_output = \"a+b\"\n---\n-\n",
    );
    let output = mlstr(&["test", &fixture]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("FAIL  wrong"), "{}", err);
    assert!(err.contains("output mismatch"), "{}", err);
}

#[test]
fn concat_files_side_by_side() {
    let dir = tempfile::tempdir().unwrap();
    let left = write(dir.path(), "left.txt", "a\nbbb\n");
    let right = write(dir.path(), "right.txt", "1\n2\n3\n");
    let output = mlstr(&["concat", "--sep", " ", &left, &right]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "a   1\nbbb 2\n    3\n");
}

#[test]
fn concat_missing_file() {
    let output = mlstr(&["concat", "/nonexistent/block.txt"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cannot read"));
}

#[test]
fn format_with_block_argument() {
    let dir = tempfile::tempdir().unwrap();
    let template = write(dir.path(), "tree.txt", "root %s (%d)\n");
    let leaf = write(dir.path(), "leaf.txt", "+-- x\n+-- y\n");
    let leaf_arg = format!("@{}", leaf);
    let output = mlstr(&["format", &template, "--", &leaf_arg, "2"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "root +-- x (2)\n     +-- y   \n");
}

#[test]
fn format_error_is_rendered_with_source() {
    let dir = tempfile::tempdir().unwrap();
    let template = write(dir.path(), "bad.txt", "value: %d\n");
    let output = mlstr(&["format", &template, "--", "text"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("malformed format directive `%d`"), "{}", err);
    assert!(err.contains("bad.txt"), "{}", err);
}

#[test]
fn format_arguments_only_parse_plain_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let template = write(dir.path(), "nums.txt", "%s %s %s %s %s\n");
    let output = mlstr(&["format", &template, "--", "1e5", "inf", "nan", "-1.5", "7"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "1e5 inf nan -1.5 7\n");
}

#[test]
fn exponent_text_is_rejected_by_number_directives() {
    let dir = tempfile::tempdir().unwrap();
    let template = write(dir.path(), "exp.txt", "%f\n");
    let output = mlstr(&["format", &template, "--", "1e5"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("requires a number, got String"));
}
