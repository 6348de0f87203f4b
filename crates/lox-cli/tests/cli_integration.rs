//! Integration tests for the `lox` binary's argv dispatch and exit codes,
//! run against the compiled executable rather than the library.

use std::path::PathBuf;
use std::process::Command;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn lox() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lox"))
}

#[test]
fn running_a_script_prints_its_output_and_exits_zero() {
    let output = lox().arg(fixture("hello.lox")).output().expect("spawn lox");
    assert!(output.status.success());
    assert_eq!(output.stdout, b"Hello, world!\n");
}

#[test]
fn a_compile_error_exits_65_and_reports_on_stderr() {
    let output = lox()
        .arg(fixture("compile_error.lox"))
        .env("NO_COLOR", "1")
        .output()
        .expect("spawn lox");
    assert_eq!(output.status.code(), Some(65));
    let stderr = String::from_utf8(output.stderr).expect("stderr is utf8");
    assert!(stderr.contains("Expect ';' after value."));
}

#[test]
fn a_runtime_error_exits_70_and_reports_the_call_trace() {
    let output = lox()
        .arg(fixture("runtime_error.lox"))
        .env("NO_COLOR", "1")
        .output()
        .expect("spawn lox");
    assert_eq!(output.status.code(), Some(70));
    assert_eq!(output.stdout, b"0.5\n");
    let stderr = String::from_utf8(output.stderr).expect("stderr is utf8");
    assert!(stderr.contains("Undefined variable 'undefinedVariable'"));
    assert!(stderr.contains("[line 6] in script"));
}

#[test]
fn a_missing_file_exits_74() {
    let output = lox()
        .arg(fixture("does_not_exist.lox"))
        .output()
        .expect("spawn lox");
    assert_eq!(output.status.code(), Some(74));
}

#[test]
fn more_than_one_argument_is_a_usage_error_exiting_64() {
    let output = lox()
        .arg(fixture("hello.lox"))
        .arg("extra")
        .output()
        .expect("spawn lox");
    assert_eq!(output.status.code(), Some(64));
    let stderr = String::from_utf8(output.stderr).expect("stderr is utf8");
    assert!(stderr.contains("Usage: lox [path]"));
}
