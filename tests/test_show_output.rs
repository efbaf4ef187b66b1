mod helpers;

use helpers::{sample_clients, TestEnvironment};
use predicates::prelude::*;
use serde_json::{json, Value};

fn ready_env() -> TestEnvironment {
    let env = TestEnvironment::new();
    env.write_clients(&sample_clients());
    env.save_replay_login();
    env
}

fn stdout_of(cmd: &mut assert_cmd::Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

fn names_in_order(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .skip(2)
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.split_whitespace().next().map(str::to_string))
        .collect()
}

#[test]
fn test_show_renders_formatted_table() {
    let env = ready_env();
    let stdout = stdout_of(env.command().arg("show"));

    assert!(stdout.starts_with("USERNAME"));
    assert!(stdout.contains("SSID/NETWORK"));
    assert!(stdout.contains("HomeNet"));
    assert!(stdout.contains("Hallway AP"));
    assert!(stdout.contains("Core Port 4"));
    assert!(stdout.contains("1.5 KB/s"));
    assert!(stdout.contains("1.0 MB"));
    assert!(stdout.contains("5.0 GB"));
    assert!(stdout.contains("1:02:05"));
    assert!(stdout.contains("1d 1:01:01"));
    assert!(stdout.contains("Last updated: "));
    assert!(stdout.contains("(3 clients)"));
    assert!(stdout.contains("Sorted by UPTIME (ascending)"));
    assert!(!stdout.contains("s3cret-pass"));
}

#[test]
fn test_default_sort_is_uptime_ascending() {
    let env = ready_env();
    let stdout = stdout_of(env.command().arg("show"));
    assert_eq!(names_in_order(&stdout), vec!["ghost", "laptop", "nas"]);
}

#[test]
fn test_sort_flags_reorder_rows() {
    let env = ready_env();

    let by_ip = stdout_of(env.command().args(["show", "--sort", "ip"]));
    assert_eq!(names_in_order(&by_ip), vec!["ghost", "nas", "laptop"]);

    let by_download = stdout_of(env.command().args(["show", "--sort", "DOWNLOAD", "--desc"]));
    assert_eq!(names_in_order(&by_download), vec!["nas", "laptop", "ghost"]);
    assert!(by_download.contains("Sorted by DOWNLOAD (descending)"));
}

#[test]
fn test_config_file_sets_default_sort() {
    let env = ready_env();
    env.write_config("[monitor]\nsort_column = \"name\"\ndescending = true\n");

    let stdout = stdout_of(env.command().arg("show"));
    assert_eq!(names_in_order(&stdout), vec!["nas", "laptop", "ghost"]);
}

#[test]
fn test_json_output() {
    let env = ready_env();
    let stdout = stdout_of(env.command().args(["show", "--json"]));
    let parsed: Value = serde_json::from_str(&stdout).expect("JSON output should be valid JSON");

    assert_eq!(parsed["count"], 3);
    assert_eq!(parsed["sorted_by"], "uptime");
    assert!(parsed["updated"].is_string());
    assert!(parsed["error"].is_null());

    let clients = parsed["clients"].as_array().unwrap();
    assert_eq!(clients[0]["name"]["display"], "ghost");
    assert_eq!(clients[0]["ip"]["display"], "--");
    assert_eq!(clients[0]["ip"]["sort"], json!([-1, -1, -1, -1]));
    assert_eq!(clients[0]["uptime"]["display"], "--");
    assert_eq!(clients[0]["trafficDown"]["display"], "0.0 B");
    assert_eq!(clients[1]["ip"]["sort"], json!([192, 168, 0, 20]));
    assert_eq!(clients[2]["uptime"]["sort"], 90061.0);
}

#[test]
fn test_missing_login_without_prompt_fails() {
    let env = TestEnvironment::new();
    env.write_clients(&sample_clients());

    env.command()
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot log in to the controller"))
        .stderr(predicate::str::contains("interactive login is disabled"));
}

#[test]
fn test_unsupported_controller_url_fails() {
    let env = TestEnvironment::new();
    env.save_login(&omada_monitor::models::CredentialRecord::new(
        "admin",
        "pw",
        "https://controller:8043",
        "Default",
        true,
    ));

    env.command()
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no controller driver for 'https://controller:8043'"));
}

#[test]
fn test_unreadable_snapshot_reports_refresh_error() {
    let env = ready_env();
    std::fs::write(env.clients_path(), "{ not json").unwrap();

    env.command()
        .arg("show")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Error refreshing data:"))
        .stderr(predicate::str::contains("Error refreshing data:"));
}

#[test]
fn test_invalid_config_is_fatal() {
    let env = ready_env();
    env.write_config("[monitor]\nrefresh_interval = 0\n");

    env.command()
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid refresh interval: 0"));
}

#[test]
fn test_login_command_needs_a_terminal() {
    let env = TestEnvironment::new();

    env.command()
        .arg("login")
        .assert()
        .failure()
        .stderr(predicate::str::contains("interactive login needs a terminal"));
}
