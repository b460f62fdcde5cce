//! ---
//! sicp_section: "05-networking-external-interfaces"
//! sicp_subsection: "binary"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Control CLI for SICP display panels."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Serialize;
use sicp_client::{Client, DisplayStatus, Reading};
use sicp_common::{init_tracing, AppConfig};
use sicp_proto::{Address, Outcome, Registry, Value};
use tracing::debug;

mod catalog;
mod target;

use target::{Endpoint, Overrides, Target};

const CONFIG_CANDIDATES: [&str; 2] = ["sicp.toml", "configs/sicp.toml"];

/// Exit status when the display refused the command.
const EXIT_REJECTED: u8 = 2;
const EXIT_FAILED: u8 = 1;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Signage Control Protocol display control utility",
    long_about = "Run without a target to list every command."
)]
struct Cli {
    /// Configuration file with transport settings and named displays.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Display host name or address.
    #[arg(long)]
    host: Option<String>,
    /// TCP port, 5000 unless configured otherwise.
    #[arg(long)]
    port: Option<u16>,
    /// Group id carried in the frame.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=254))]
    group: Option<u8>,
    /// Print results as JSON.
    #[arg(long)]
    json: bool,
    /// Monitor id (1-255), `all` for every configured display (a broadcast
    /// with `--host`), or a configured display name.
    target: Option<String>,
    /// Command name, e.g. `get-power-state`, or `status`.
    command: Option<String>,
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CallReport<'a> {
    display: Option<&'a str>,
    address: Address,
    command: &'a str,
    result: Outcome<Value>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_FAILED)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;
    init_tracing("sicpctl", &config.logging)?;

    let Some(target) = cli.target.as_deref() else {
        print_catalog(cli.json)?;
        return Ok(ExitCode::SUCCESS);
    };
    let command = cli
        .command
        .as_deref()
        .ok_or_else(|| anyhow!("missing command; run sicpctl without arguments for the list"))?;

    let overrides = Overrides {
        host: cli.host.clone(),
        port: cli.port,
        group: cli.group,
    };
    let endpoints = target::resolve(&target.parse::<Target>()?, &overrides, &config)?;
    debug!(?endpoints, command, "resolved target");

    if command.eq_ignore_ascii_case("status") {
        if !cli.args.is_empty() {
            return Err(anyhow!("status takes no arguments"));
        }
        let statuses: Vec<DisplayStatus> = endpoints
            .iter()
            .map(|endpoint| open_client(endpoint, &config).fetch_status())
            .collect();
        if cli.json {
            print_json(&statuses)?;
        } else {
            statuses.iter().for_each(print_status);
        }
        let code = if statuses.iter().all(DisplayStatus::is_online) {
            0
        } else {
            EXIT_FAILED
        };
        return Ok(ExitCode::from(code));
    }

    let descriptor = Registry::global().resolve(command)?;
    let args: Vec<&str> = cli.args.iter().map(String::as_str).collect();
    let param = descriptor
        .request
        .parse_args(&args)
        .with_context(|| format!("invalid arguments for {}", descriptor.cli_name()))?;

    let several = endpoints.len() > 1;
    let mut reports = Vec::with_capacity(endpoints.len());
    let mut code = 0;
    for endpoint in &endpoints {
        let client = open_client(endpoint, &config);
        let outcome = client.call(descriptor.name, param.clone(), client.target());
        code = worst(code, exit_code(&outcome));
        if !cli.json {
            let prefix = if several {
                format!("{}: ", endpoint.label())
            } else {
                String::new()
            };
            if outcome.is_success() {
                println!("{prefix}{outcome}");
            } else {
                eprintln!("{prefix}{}: {outcome}", descriptor.cli_name());
            }
        }
        reports.push(CallReport {
            display: endpoint.name.as_deref(),
            address: client.target(),
            command: descriptor.name,
            result: outcome,
        });
    }
    if cli.json {
        print_json(&reports)?;
    }
    Ok(ExitCode::from(code))
}

/// One object for a single display, an array when the target expanded.
fn print_json<T: Serialize>(items: &[T]) -> Result<()> {
    let text = match items {
        [single] => serde_json::to_string_pretty(single)?,
        _ => serde_json::to_string_pretty(items)?,
    };
    println!("{text}");
    Ok(())
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    if let Some(path) = &cli.config {
        return AppConfig::from_path(path);
    }
    let candidates: Vec<PathBuf> = CONFIG_CANDIDATES.iter().map(PathBuf::from).collect();
    let env_override = std::env::var_os(AppConfig::ENV_CONFIG_PATH).is_some();
    if env_override || candidates.iter().any(|path| path.exists()) {
        let loaded = AppConfig::load_with_source(&candidates)?;
        debug!(source = %loaded.source.display(), "configuration loaded");
        return Ok(loaded.config);
    }
    Ok(AppConfig::default())
}

fn open_client(endpoint: &Endpoint, config: &AppConfig) -> Client {
    let client = Client::open(&endpoint.display, &config.transport);
    match &endpoint.name {
        Some(name) => client.with_display_name(name.clone()),
        None => client,
    }
}

fn exit_code<T>(outcome: &Outcome<T>) -> u8 {
    match outcome {
        Outcome::Success(_) => 0,
        Outcome::DeviceRejected(_) => EXIT_REJECTED,
        Outcome::TransportFailure(_) | Outcome::ProtocolViolation(_) => EXIT_FAILED,
    }
}

/// A failure anywhere outranks a rejection elsewhere.
fn worst(current: u8, next: u8) -> u8 {
    if current == EXIT_FAILED || next == EXIT_FAILED {
        EXIT_FAILED
    } else {
        current.max(next)
    }
}

fn print_catalog(json: bool) -> Result<()> {
    let registry = Registry::global();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&catalog::entries(registry))?
        );
    } else {
        print!("{}", catalog::render(registry));
    }
    Ok(())
}

fn print_status(status: &DisplayStatus) {
    let label = status.display.as_deref().unwrap_or("display");
    println!("{label} {}", status.address);
    print_reading("power", &status.power);
    if !status.is_online() {
        return;
    }
    print_reading("backlight", &map_reading(&status.backlight, on_off));
    print_reading("model", &status.model);
    print_reading("serial number", &status.serial_number);
    for info in &status.sicp_info {
        print_reading(&info.field.to_string(), &info.reading);
    }
    print_reading("input source", &status.input_source);
    print_reading(
        "video signal",
        &map_reading(&status.video_signal, |present| {
            let text = if *present { "present" } else { "none" };
            text.to_owned()
        }),
    );
    print_reading("brightness", &map_reading(&status.brightness, |level| format!("{level}%")));
    print_reading("picture style", &status.picture_style);
    print_reading("colour temperature", &status.color_temperature);
    print_reading(
        "colour temperature K",
        &map_reading(&status.precise_color_temperature, |kelvin| format!("{kelvin}K")),
    );
    print_reading("smart power", &status.smart_power_level);
    print_reading("power-on logo", &status.power_on_logo);
    print_reading("cold start", &status.cold_start_power_state);
    print_reading(
        "volume",
        &map_reading(&status.volume, |levels| Value::Volume(*levels).to_string()),
    );
    print_reading("mute", &map_reading(&status.mute, on_off));
    print_reading(
        "temperature",
        &map_reading(&status.temperature, |readings| {
            Value::Temperatures(readings.clone()).to_string()
        }),
    );
}

fn on_off(flag: &bool) -> String {
    let text = if *flag { "on" } else { "off" };
    text.to_owned()
}

fn map_reading<T>(reading: &Reading<T>, f: impl FnOnce(&T) -> String) -> Reading<String> {
    match reading {
        Reading::Value(value) => Reading::Value(f(value)),
        Reading::Unavailable(reason) => Reading::Unavailable(*reason),
        Reading::Failed(message) => Reading::Failed(message.clone()),
        Reading::Skipped => Reading::Skipped,
    }
}

fn print_reading<T: std::fmt::Display>(label: &str, reading: &Reading<T>) {
    match reading {
        Reading::Value(value) => println!("  {label:<20} {value}"),
        Reading::Unavailable(reason) => println!("  {label:<20} unavailable ({})", reason.as_str()),
        Reading::Failed(message) => println!("  {label:<20} failed: {message}"),
        Reading::Skipped => {}
    }
}
