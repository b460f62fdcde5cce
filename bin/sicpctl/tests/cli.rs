//! ---
//! sicp_section: "15-testing-qa-runbook"
//! sicp_subsection: "tests"
//! sicp_type: "test"
//! sicp_scope: "code"
//! sicp_description: "End-to-end runs of sicpctl against a loopback panel."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
use std::io::Write;

use assert_cmd::Command;
use sicp_testharness::{PanelServer, SimulatedDisplay};
use tempfile::NamedTempFile;

fn sicpctl() -> Command {
    let mut cmd = Command::cargo_bin("sicpctl").unwrap();
    cmd.env_remove("SICP_CONFIG").env("SICP_LOG", "off");
    cmd
}

fn against(server: &PanelServer) -> Command {
    let mut cmd = sicpctl();
    cmd.args(["--host", "127.0.0.1", "--port", &server.port().to_string()]);
    cmd
}

/// Configuration naming one loopback display per server.
fn wall_config(servers: &[(&str, u8, &PanelServer)]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for (name, monitor_id, server) in servers {
        writeln!(
            file,
            "[displays.{name}]\nhost = \"127.0.0.1\"\nport = {}\nmonitor_id = {monitor_id}\n",
            server.port()
        )
        .unwrap();
    }
    file
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn lists_the_catalog_without_a_target() {
    let output = sicpctl().assert().success().get_output().clone();
    let text = stdout(&output);
    assert!(text.contains("get-power-state"));
    assert!(text.contains("set-input-source"));
    assert!(text.contains("status"));
}

#[test]
fn reads_power_state_over_tcp() {
    let server = PanelServer::spawn(SimulatedDisplay::new(1)).unwrap();
    let output = against(&server)
        .args(["1", "get-power-state"])
        .assert()
        .success()
        .get_output()
        .clone();
    assert_eq!(stdout(&output).trim(), "on");
}

#[test]
fn set_then_get_round_trips() {
    let display = SimulatedDisplay::new(1);
    let server = PanelServer::spawn(display.clone()).unwrap();
    against(&server)
        .args(["1", "set-brightness-level", "35"])
        .assert()
        .success();
    assert_eq!(display.register(0x33), Some(vec![35]));

    let output = against(&server)
        .args(["1", "get_brightness_level"])
        .assert()
        .success()
        .get_output()
        .clone();
    assert_eq!(stdout(&output).trim(), "35%");
}

#[test]
fn rejected_command_exits_with_two() {
    let server = PanelServer::spawn(SimulatedDisplay::new(1).without("get_volume")).unwrap();
    against(&server).args(["1", "get-volume"]).assert().code(2);
}

#[test]
fn invalid_argument_never_reaches_the_display() {
    let display = SimulatedDisplay::new(1);
    let server = PanelServer::spawn(display.clone()).unwrap();
    against(&server)
        .args(["1", "set-brightness-level", "150"])
        .assert()
        .code(1);
    assert_eq!(display.request_count(), 0);
}

#[test]
fn json_report_carries_the_outcome() {
    let server = PanelServer::spawn(SimulatedDisplay::new(4)).unwrap();
    let output = against(&server)
        .args(["--json", "4", "get-picture-style"])
        .assert()
        .success()
        .get_output()
        .clone();
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["command"], "get_picture_style");
    assert_eq!(report["address"]["monitor_id"], 4);
    assert_eq!(report["result"]["outcome"], "success");
    assert_eq!(report["result"]["detail"]["value"], "standard");
}

#[test]
fn unknown_display_name_is_an_error() {
    sicpctl().args(["hall", "get-power-state"]).assert().code(1);
}

#[test]
fn all_reaches_every_configured_display() {
    let left = SimulatedDisplay::new(1);
    let right = SimulatedDisplay::new(2).with_register(0x19, &[0x01]);
    let left_server = PanelServer::spawn(left.clone()).unwrap();
    let right_server = PanelServer::spawn(right.clone()).unwrap();
    let config = wall_config(&[("left", 1, &left_server), ("right", 2, &right_server)]);

    let output = sicpctl()
        .arg("--config")
        .arg(config.path())
        .args(["all", "get-power-state"])
        .assert()
        .success()
        .get_output()
        .clone();
    let lines: Vec<String> = stdout(&output).lines().map(str::to_owned).collect();
    assert_eq!(lines, vec!["left: on", "right: off"]);
    assert_eq!(left.request_count(), 1);
    assert_eq!(right.request_count(), 1);
}

#[test]
fn all_reports_the_worst_outcome() {
    let left_server = PanelServer::spawn(SimulatedDisplay::new(1)).unwrap();
    let right_server =
        PanelServer::spawn(SimulatedDisplay::new(2).without("get_volume")).unwrap();
    let config = wall_config(&[("left", 1, &left_server), ("right", 2, &right_server)]);

    let output = sicpctl()
        .arg("--config")
        .arg(config.path())
        .args(["--json", "all", "get-volume"])
        .assert()
        .code(2)
        .get_output()
        .clone();
    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["display"], "left");
    assert_eq!(reports[0]["result"]["outcome"], "success");
    assert_eq!(reports[1]["display"], "right");
    assert_eq!(reports[1]["result"]["outcome"], "device_rejected");
}
