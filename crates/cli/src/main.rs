//! QueryDesk CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse arguments** and pick a command.
//! 2. **Load configuration**: `querydesk.toml` (or `--config`), then
//!    `QUERYDESK_*` environment overrides, then validation.
//! 3. **Wire observability**: `tracing-subscriber` with JSON or plain output
//!    and, when an endpoint is configured, an OpenTelemetry OTLP exporter.
//! 4. **Run the command**:
//!    - `serve` runs the lookup backend.
//!    - `demo` builds middleware, services and BFF against the configured
//!      base URL and prints each envelope.

mod config;
mod demo;
mod serve;
mod telemetry;

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use config::CliConfig;
use demo::DemoArgs;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Serve,
    Demo(DemoArgs),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Invocation {
    Run {
        config: Option<PathBuf>,
        command: Command,
    },
    Help,
    Version,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Invocation, String> {
    let mut args = args.into_iter();
    let mut config = None;
    let mut command = None;
    let mut demo = DemoArgs::default();
    let mut username = None;
    let mut password = None;

    while let Some(arg) = args.next() {
        let mut value = |name: &str| args.next().ok_or_else(|| format!("{name} requires a value"));
        match arg.as_str() {
            "--help" | "-h" => return Ok(Invocation::Help),
            "--version" | "-v" => return Ok(Invocation::Version),
            "--config" | "-c" => config = Some(PathBuf::from(value("--config")?)),
            "--username" | "-u" => username = Some(value("--username")?),
            "--password" | "-p" => password = Some(value("--password")?),
            "--category" => demo.filter.category = Some(value("--category")?),
            "--status" => demo.filter.status = Some(value("--status")?),
            "--type" => demo.filter.kind = Some(value("--type")?),
            "--test-data" => {
                let raw = value("--test-data")?;
                let num = raw
                    .parse()
                    .map_err(|_| format!("--test-data expects an integer, got '{raw}'"))?;
                demo.test_data = Some(num);
            }
            "serve" if command.is_none() => command = Some("serve"),
            "demo" if command.is_none() => command = Some("demo"),
            other => return Err(format!("Unknown argument: {other}")),
        }
    }

    let command = match command {
        Some("serve") => Command::Serve,
        Some("demo") => {
            demo.username = username.ok_or("demo requires --username")?;
            demo.password = password.ok_or("demo requires --password")?;
            Command::Demo(demo)
        }
        _ => return Err("expected a command: serve or demo".to_string()),
    };
    Ok(Invocation::Run { config, command })
}

fn print_help() {
    println!(
        r"QueryDesk - filterable lookup data through a client middleware pipeline and BFF

USAGE:
    querydesk [OPTIONS] serve
    querydesk [OPTIONS] demo --username <USER> --password <PASS> [FILTERS]

COMMANDS:
    serve                  Run the lookup backend
    demo                   Log in, load options and run one search through the BFF

OPTIONS:
    -c, --config <PATH>    Path to a TOML configuration file (default: querydesk.toml)
    -h, --help             Print help information
    -v, --version          Print version information

DEMO OPTIONS:
    -u, --username <USER>  Account to log in with
    -p, --password <PASS>  Password for the account
        --category <C>     Only records in this category
        --status <S>       Only records with this status
        --type <T>         Only records of this type
        --test-data <N>    Append the test record first (the backend accepts only 100)

ENVIRONMENT VARIABLES:
    QUERYDESK_BASE_URL         Backend base URL for demo (default: http://localhost:3001)
    QUERYDESK_LISTEN_ADDR      Address serve binds (default: 127.0.0.1:3001)
    QUERYDESK_FRONTEND_ORIGIN  Origin admitted by CORS (default: http://localhost:3000)
    QUERYDESK_LOG_LEVEL        Log filter directive (default: info)
    QUERYDESK_LOG_JSON         JSON log output, true or false (default: true)
    QUERYDESK_OTLP_ENDPOINT    OpenTelemetry collector endpoint
"
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config_path, command) = match parse_args(std::env::args().skip(1)) {
        Ok(Invocation::Run { config, command }) => (config, command),
        Ok(Invocation::Help) => {
            print_help();
            return Ok(());
        }
        Ok(Invocation::Version) => {
            println!("querydesk {VERSION}");
            return Ok(());
        }
        Err(message) => {
            eprintln!("{message}");
            eprintln!("Use --help for usage information");
            std::process::exit(2);
        }
    };

    let config = CliConfig::load(config_path.as_deref())?.with_env_overrides();
    config.validate().context("invalid configuration")?;

    let _telemetry = telemetry::init(&config.logging)?;
    info!(version = VERSION, command = ?command, "Starting querydesk");

    match command {
        Command::Serve => serve::run(&config.backend).await,
        Command::Demo(args) => demo::run(&config.client, &args).await,
    }
}
