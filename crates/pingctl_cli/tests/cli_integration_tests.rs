//! Integration tests for the pingctl binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn pingctl(config: &Path, args: &[&str]) -> Output {
    pingctl_with_env(config, args, &[])
}

fn pingctl_with_env(config: &Path, args: &[&str], vars: &[(&str, &str)]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pingctl"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_clear()
        .envs(vars.iter().copied())
        .output()
        .expect("failed to run pingctl")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

#[test]
fn test_profile_lifecycle() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("config.yaml");

    let output = pingctl(&config, &["config", "profile", "create", "production", "--description", "prod"]);
    assert!(output.status.success());
    assert!(config.exists());

    let output = pingctl(&config, &["config", "profile", "set-active", "production"]);
    assert!(output.status.success());

    let output = pingctl(&config, &["config", "profile", "list"]);
    assert_eq!(stdout(&output), "  default\n* production");

    let output = pingctl(&config, &["config", "profile", "delete", "production"]);
    assert_eq!(output.status.code(), Some(3));

    let output = pingctl(&config, &["config", "profile", "delete", "missing"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_set_get_unset() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("config.yaml");

    let output = pingctl(&config, &["config", "set", "export.pingone.region", "eu"]);
    assert!(output.status.success());

    let output = pingctl(&config, &["config", "get", "export.pingone.region"]);
    assert_eq!(stdout(&output), "export.pingone.region=EU (profile)");

    let output = pingctl(&config, &["config", "get", "export.pingone.region", "--pingone-region", "NA"]);
    assert_eq!(stdout(&output), "export.pingone.region=NA (flag)");

    let output = pingctl(&config, &["config", "unset", "export.pingone.region"]);
    assert!(output.status.success());
    let content = fs::read_to_string(&config).unwrap();
    assert!(content.contains("region: ''"));

    let output = pingctl(&config, &["config", "set", "export.overwrite", "true"]);
    assert!(output.status.success());
    let output = pingctl(&config, &["config", "unset", "export.overwrite", "extra", "args"]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Ignoring extra arguments: extra args"));
    let output = pingctl(&config, &["config", "get", "export.overwrite"]);
    assert_eq!(stdout(&output), "export.overwrite=false (profile)");
}

#[test]
fn test_bad_stored_output_format_can_be_repaired() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("config.yaml");
    fs::write(
        &config,
        "activeProfile: default\ndefault:\n    description: broken\n    pingctl:\n        outputFormat: yaml\n",
    )
    .unwrap();

    let output = pingctl(&config, &["config", "get", "pingctl.outputFormat"]);
    assert_eq!(output.status.code(), Some(3));

    let output = pingctl(&config, &["config", "profile", "list"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "* default");

    let output = pingctl(&config, &["config", "set", "pingctl.outputFormat", "text"]);
    assert!(output.status.success());

    let output = pingctl(&config, &["config", "get", "pingctl.outputFormat"]);
    assert_eq!(stdout(&output), "pingctl.outputFormat=text (profile)");
}

#[test]
fn test_bad_output_format_env_does_not_block_other_commands() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("config.yaml");
    let vars = [("PINGCTL_OUTPUT_FORMAT", "yaml")];

    let output = pingctl_with_env(&config, &["config", "profile", "create", "prod"], &vars);
    assert!(output.status.success());

    let output = pingctl_with_env(&config, &["config", "get", "pingctl.outputFormat"], &vars);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_invalid_values_map_to_exit_codes() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("config.yaml");

    let output = pingctl(&config, &["config", "set", "export.overwrite", "maybe"]);
    assert_eq!(output.status.code(), Some(3));

    let output = pingctl(&config, &["config", "set", "export.nope", "true"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("export.nope"));

    let output = pingctl(&config, &["config", "profile", "create", "bad name!"]);
    assert_eq!(output.status.code(), Some(2));

    let output = pingctl(
        &config,
        &["config", "get", "export.pingone.region", "--pingone-region", "XX"],
    );
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("from flag"));
}

#[test]
fn test_json_output() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("config.yaml");

    let output = pingctl(&config, &["-O", "json", "config", "get", "export.services"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["source"], "default");
    assert_eq!(value["value"].as_array().unwrap().len(), 4);
}

#[test]
fn test_view_masks_secrets() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("config.yaml");

    let output = pingctl(
        &config,
        &["config", "set", "export.pingfederate.basicAuth.password", "hunter2"],
    );
    assert!(output.status.success());
    assert!(!stdout(&output).contains("hunter2"));

    let output = pingctl(&config, &["config", "view"]);
    let text = stdout(&output);
    assert!(text.contains("export.pingfederate.basicAuth.password=********"));
    assert!(!text.contains("hunter2"));
}
