//! Environment variable behavior end-to-end tests.

use crate::common::cli::CliRunner;
use crate::common::init_test_logging;

#[test]
fn aircam_format_env_sets_json_output() {
    init_test_logging();
    let cli = CliRunner::new()
        .with_env("RUST_LOG", "off")
        .with_env("AIRCAM_FORMAT", "json");
    let result = cli.run(&["version"]);
    result.assert_success();

    let json: serde_json::Value = serde_json::from_str(result.stdout.trim())
        .expect("Expected JSON output with AIRCAM_FORMAT=json");
    assert!(json.get("version").is_some());
}

#[test]
fn aircam_format_env_sets_compact_json() {
    init_test_logging();
    let cli = CliRunner::new()
        .with_env("RUST_LOG", "off")
        .with_env("AIRCAM_FORMAT", "json-compact");
    let result = cli.run(&["version"]);
    result.assert_success();

    let stdout = result.stdout.trim_end();
    let json: serde_json::Value = serde_json::from_str(stdout)
        .expect("Expected JSON output with AIRCAM_FORMAT=json-compact");
    assert!(json.get("version").is_some());
    assert_eq!(stdout.lines().count(), 1, "Expected compact JSON single line");
}

#[test]
fn cli_format_flag_overrides_env() {
    init_test_logging();
    let cli = CliRunner::new()
        .with_env("RUST_LOG", "off")
        .with_env("AIRCAM_FORMAT", "json");
    let result = cli.run(&["version", "--format=text"]);
    result.assert_success();

    assert!(
        serde_json::from_str::<serde_json::Value>(result.stdout.trim()).is_err(),
        "--format=text should override AIRCAM_FORMAT=json"
    );
}

#[test]
fn no_color_strips_ansi_from_human_output() {
    init_test_logging();
    let cli = CliRunner::new()
        .with_env("RUST_LOG", "off")
        .with_env("NO_COLOR", "1");
    let result = cli.run(&[]);
    result.assert_success();

    assert!(
        !result.stdout.contains('\u{1b}'),
        "NO_COLOR output must not contain ANSI escapes"
    );
}

#[test]
fn module_env_is_honored_for_device_commands() {
    init_test_logging();
    let cli = CliRunner::new()
        .with_env("RUST_LOG", "off")
        .with_env("AIRCAM_PRIMARY_MODULE", "/nonexistent/from_env.so");
    let result = cli.run_robot(&["status"]);
    result.assert_exit_code(1);

    let json: serde_json::Value = serde_json::from_str(result.stderr.trim())
        .expect("Expected error envelope on stderr");
    assert!(
        json.get("error")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|m| m.contains("/nonexistent/from_env.so")),
        "error names the module path taken from the environment"
    );
}
