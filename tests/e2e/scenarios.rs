use super::helpers::TestProject;

fn sample_project() -> TestProject {
    let test_env = TestProject::new();
    test_env.init_node_project("sample-app", "MIT", &["left-pad", "gpl-thing"]);
    test_env.install("left-pad", "1.3.0", "WTFPL");
    test_env.install("gpl-thing", "2.0.0", "GPL-3.0");
    test_env
}

#[test]
fn test_json_report_lists_every_package() {
    let test_env = sample_project();

    let output = test_env.run_validator(&[
        "check", "--format", "json", "-l", "MIT", "-l", "WTFPL", "-l", "GPL-3.0",
    ]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["packages"]["sample-app@1.0.0"], "MIT");
    assert_eq!(report["packages"]["left-pad@1.3.0"], "WTFPL");
    assert_eq!(report["invalids"].as_array().unwrap().len(), 0);
    assert!(report["generated_at"].is_string());
    assert!(report["summary"].as_str().unwrap().contains("LICENSES:"));
}

#[test]
fn test_violations_exit_non_zero() {
    let test_env = sample_project();

    let output = test_env.run_validator(&["check", "-l", "MIT", "-l", "WTFPL"]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("gpl-thing@2.0.0"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("License violations found"));
}

#[test]
fn test_exit_zero_and_exceptions() {
    let test_env = sample_project();

    let output = test_env.run_validator(&["check", "-l", "MIT", "--exit-zero"]);
    assert!(output.status.success());

    let output = test_env.run_validator(&[
        "check", "--format", "json", "-l", "MIT", "-e", "left-pad@^1.0.0", "-e", "gpl-thing",
    ]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        report["packages"]["left-pad@1.3.0"],
        "WTFPL (exception: left-pad@^1.0.0)"
    );
    assert_eq!(report["licenses"], serde_json::json!(["MIT"]));
}

#[test]
fn test_policy_initialization_and_checking() {
    let test_env = sample_project();

    // Red policy does not fail on violations
    let init_output = test_env.run_validator(&["init", "red"]);
    assert!(init_output.status.success());
    assert!(test_env.read_policy().contains("Red License Policy"));

    let check_output = test_env.run_validator(&["check", "--format", "json"]);
    assert!(check_output.status.success());

    let stdout = String::from_utf8_lossy(&check_output.stdout);
    assert!(stdout.contains("invalids"));
}

#[test]
fn test_fix_subcommand() {
    let test_env = sample_project();

    let init_output = test_env.run_validator(&["init", "green"]);
    assert!(init_output.status.success());

    let dry_run_output = test_env.run_validator(&["fix", "--dry-run"]);
    assert!(dry_run_output.status.success());
    let stdout = String::from_utf8_lossy(&dry_run_output.stdout);
    assert!(stdout.contains("Would add 2 exceptions"));
    assert!(!test_env.read_policy().contains("gpl-thing@2.0.0"));

    let fix_output = test_env.run_validator(&["fix"]);
    assert!(fix_output.status.success());
    let policy = test_env.read_policy();
    assert!(policy.contains("left-pad@1.3.0"));
    assert!(policy.contains("gpl-thing@2.0.0"));

    // Everything is covered by an exception now
    let check_output = test_env.run_validator(&["check"]);
    assert!(check_output.status.success());
}

#[test]
fn test_missing_package_json() {
    let test_env = TestProject::new();

    let output = test_env.run_validator(&["check", "-l", "MIT"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No package.json file found"));
}

#[test]
fn test_empty_policy_is_rejected() {
    let test_env = sample_project();

    let output = test_env.run_validator(&["check"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no licenses or packages specified"));
}

#[test]
fn test_global_options() {
    let test_env = sample_project();

    let quiet_output = test_env.run_validator(&["--quiet", "init", "green"]);
    assert!(quiet_output.status.success());
    assert!(quiet_output.stdout.is_empty());

    let validate_output = test_env.run_validator(&["config", "--validate"]);
    assert!(validate_output.status.success());

    test_env.write_policy("[policy]\npackages = [\"@\"]\n");
    let invalid_output = test_env.run_validator(&["config", "--validate"]);
    assert!(!invalid_output.status.success());
}

#[test]
fn test_fix_covers_loose_versions() {
    let test_env = TestProject::new();
    test_env.init_node_project("loose-app", "MIT", &["old-thing"]);
    test_env.install("old-thing", "1.0", "GPL-3.0");
    test_env.run_validator(&["init", "green"]);

    let fix_output = test_env.run_validator(&["fix"]);
    assert!(fix_output.status.success());
    assert!(String::from_utf8_lossy(&fix_output.stderr).contains("no range can match"));
    assert!(test_env.read_policy().contains("\"old-thing\""));

    let check_output = test_env.run_validator(&["check"]);
    assert!(check_output.status.success());
}
