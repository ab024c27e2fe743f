//! Human-mode end-to-end tests.

use crate::common::cli::CliRunner;
use crate::common::init_test_logging;

#[test]
fn human_quick_start_is_not_json() {
    init_test_logging();
    let cli = CliRunner::new().with_env("RUST_LOG", "off");
    let result = cli.run(&[]);
    result.assert_success();

    let stdout = result.stdout.trim();
    assert!(
        serde_json::from_str::<serde_json::Value>(stdout).is_err(),
        "Human mode output should not be JSON"
    );
    result
        .assert_stdout_contains("QUICK START")
        .assert_stdout_contains("aircam probe")
        .assert_stdout_contains("ROBOT MODE");
}

#[test]
fn human_version_prints_tool_and_semver() {
    init_test_logging();
    let cli = CliRunner::new().with_env("RUST_LOG", "off");
    let result = cli.run(&["version"]);
    result
        .assert_success()
        .assert_stdout_matches(r"aircam \d+\.\d+\.\d+");
}

#[test]
fn help_lists_device_commands() {
    init_test_logging();
    let cli = CliRunner::new().with_env("RUST_LOG", "off");
    let result = cli.run(&["--help"]);
    result
        .assert_success()
        .assert_stdout_contains("probe")
        .assert_stdout_contains("set-setting")
        .assert_stdout_contains("stream-info")
        .assert_stdout_contains("--thermal-module");
}

#[test]
fn human_missing_module_error_has_hint() {
    init_test_logging();
    let cli = CliRunner::new().with_env("RUST_LOG", "off");
    let result = cli.run(&["probe", "--module", "/nonexistent/libpayload_camera.so"]);
    result
        .assert_exit_code(1)
        .assert_stderr_contains("Error")
        .assert_stderr_contains("Hint");
}

#[test]
fn completions_emit_shell_script() {
    init_test_logging();
    let cli = CliRunner::new().with_env("RUST_LOG", "off");
    let result = cli.run(&["completions", "bash"]);
    result.assert_success().assert_stdout_contains("aircam");
}
