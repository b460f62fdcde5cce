//! ---
//! sicp_section: "15-testing-qa-runbook"
//! sicp_subsection: "tests"
//! sicp_type: "test"
//! sicp_scope: "code"
//! sicp_description: "Configured clients driving simulated panels over loopback TCP."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use sicp_client::{Client, Reading, RecordingSink};
use sicp_common::AppConfig;
use sicp_proto::{
    InputSelection, InputSource, ModelInfoField, Outcome, PictureStyle, PowerState, RejectReason,
};
use sicp_testharness::{PanelServer, SimulatedDisplay};

const SCHEDULING_SLACK: Duration = Duration::from_millis(300);

fn config_for(servers: &[(&str, &PanelServer, u8)], timeout_ms: u64) -> Result<AppConfig> {
    let mut toml = format!("[transport]\ntimeout = {timeout_ms}\nattempts = 2\n");
    for (name, server, monitor_id) in servers {
        toml.push_str(&format!(
            "\n[displays.{name}]\nhost = \"127.0.0.1\"\nport = {}\nmonitor_id = {monitor_id}\n",
            server.port()
        ));
    }
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("sicp.toml");
    fs::write(&path, toml)?;
    AppConfig::load(&[&path])
}

#[test]
fn configured_displays_are_addressed_independently() -> Result<()> {
    let lobby = SimulatedDisplay::new(3);
    let hall = SimulatedDisplay::new(8).without("get_color_temperature_mode");
    let lobby_server = PanelServer::spawn(lobby.clone())?;
    let hall_server = PanelServer::spawn(hall.clone())?;
    let config = config_for(&[("lobby", &lobby_server, 3), ("hall", &hall_server, 8)], 500)?;

    let lobby_client = Client::connect(
        config.display("lobby").expect("lobby configured"),
        &config.transport,
    )?;
    let hall_client = Client::connect(
        config.display("hall").expect("hall configured"),
        &config.transport,
    )?
    .with_display_name("hall");

    assert_eq!(
        lobby_client.set_picture_style(PictureStyle::Vivid),
        Outcome::Success(())
    );
    assert_eq!(lobby_client.get_picture_style(), Outcome::Success(PictureStyle::Vivid));
    assert_eq!(hall_client.get_picture_style(), Outcome::Success(PictureStyle::Standard));
    assert_eq!(
        hall_client.get_color_temperature_mode(),
        Outcome::DeviceRejected(RejectReason::Unsupported)
    );

    let status = hall_client.fetch_status();
    assert_eq!(status.power_state(), Some(PowerState::On));
    assert_eq!(status.color_temperature, Reading::Unavailable(RejectReason::Unsupported));
    assert_eq!(status.model, Reading::Value("55BDL4511D/00".to_owned()));
    assert_eq!(lobby.request_count(), 2);
    Ok(())
}

#[test]
fn silent_display_fails_within_the_retry_budget() -> Result<()> {
    let display = SimulatedDisplay::new(1);
    display.go_silent();
    let server = PanelServer::spawn(display)?;
    let config = config_for(&[("mute", &server, 1)], 150)?;
    let client = Client::connect(config.display("mute").expect("configured"), &config.transport)?;

    let started = Instant::now();
    let outcome = client.get_power_state();
    let elapsed = started.elapsed();

    assert!(matches!(outcome, Outcome::TransportFailure(ref err) if err.is_timeout()));
    let budget = config.transport.retry_policy().budget();
    assert!(elapsed <= budget + SCHEDULING_SLACK, "took {elapsed:?}, budget {budget:?}");

    let status = client.fetch_status();
    assert_eq!(status.power, Reading::Value(PowerState::Offline));
    Ok(())
}

#[test]
fn shared_client_serialises_concurrent_calls() -> Result<()> {
    let display = SimulatedDisplay::new(1);
    let server = PanelServer::spawn(display.clone())?;
    let config = config_for(&[("wall", &server, 1)], 1_000)?;
    let sink = Arc::new(RecordingSink::new());
    let client = Arc::new(
        Client::connect(config.display("wall").expect("configured"), &config.transport)?
            .with_sink(sink.clone()),
    );

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let client = client.clone();
            thread::spawn(move || {
                for level in 0..5u8 {
                    let outcome = client.set_brightness_level(worker * 10 + level);
                    assert_eq!(outcome, Outcome::Success(()));
                    assert!(client.get_power_state().is_success());
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker thread");
    }

    assert_eq!(sink.len(), 40);
    assert!(sink.events().iter().all(|event| event.outcome == "success"));
    assert_eq!(display.request_count(), 40);
    Ok(())
}

#[test]
fn input_switch_changes_what_the_panel_offers() -> Result<()> {
    let display = SimulatedDisplay::new(2);
    let server = PanelServer::spawn(display)?;
    let config = config_for(&[("kiosk", &server, 2)], 500)?;
    let client = Client::open(config.display("kiosk").expect("configured"), &config.transport);

    let mut selection = InputSelection::new(InputSource::Browser);
    selection.playlist = 2;
    assert_eq!(client.set_input_source(selection), Outcome::Success(()));
    let active = client.get_input_source().success().expect("input readable");
    assert_eq!((active.source, active.playlist), (InputSource::Browser, 2));
    assert!(client.get_brightness_level().is_unavailable());
    assert_eq!(
        client.get_model_info(ModelInfoField::FirmwareVersion),
        Outcome::Success("FB02.05".to_owned())
    );

    assert_eq!(
        client.set_input_source(InputSelection::new(InputSource::Hdmi2)),
        Outcome::Success(())
    );
    assert_eq!(client.get_brightness_level(), Outcome::Success(70));
    Ok(())
}
