//! HestiaCP API IP diagnostic.
//!
//! Explains why the panel's API rejects a caller: detects the client IP the
//! way the panel does, reads the panel's API settings, and compares them.
//!
//! ```text
//!   check (standalone)                      serve (web)
//!   external lookup ─┐                      HTTP headers + peer ─┐
//!   --header / ...  ─┴→ RequestContext ←────────────────────────┘
//!                           │
//!                           ▼
//!   helpers present? → resolve IP → [sudo] v-list-sys-config json
//!                           │
//!                           ▼
//!              allow-list verdict + findings → text report
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tokio::net::TcpListener;

use panel_ip_debug::config::{load_or_default, validation::validate_config, DebugConfig};
use panel_ip_debug::diagnose::Doctor;
use panel_ip_debug::http::HttpServer;
use panel_ip_debug::lookup::{synthesize_context, HttpLookup, NoLookup};
use panel_ip_debug::observability::init_logging;
use panel_ip_debug::panel::CommandSource;
use panel_ip_debug::report::{render_failure, render_report, Mode};
use panel_ip_debug::request::SourceField;

#[derive(Parser)]
#[command(name = "panel-ip-debug", version)]
#[command(about = "Diagnose why the HestiaCP API rejects a client IP", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "PANEL_IP_DEBUG_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Panel helper module whose presence marks a panel install
    #[arg(long, global = true)]
    helpers_path: Option<PathBuf>,

    /// Directory with the panel's v-* commands
    #[arg(long, global = true)]
    bin_dir: Option<PathBuf>,

    /// Run the configuration dump without sudo
    #[arg(long, global = true)]
    no_sudo: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Diagnose from this host, simulating the request (default)
    Check(CheckArgs),
    /// Serve the report over HTTP using real request headers
    Serve(ServeArgs),
}

#[derive(Args, Default)]
struct CheckArgs {
    /// Use this connection address instead of looking it up
    #[arg(long)]
    remote_addr: Option<String>,

    /// Simulate a header, e.g. `X-Forwarded-For=203.0.113.5` (repeatable)
    #[arg(long = "header", value_name = "NAME=VALUE", value_parser = parse_header)]
    headers: Vec<(SourceField, String)>,

    /// Skip the external address lookup
    #[arg(long)]
    no_lookup: bool,
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address, overrides server.bind_address
    #[arg(short, long)]
    bind: Option<String>,
}

fn parse_header(raw: &str) -> Result<(SourceField, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let field = name.parse::<SourceField>().map_err(|e| e.to_string())?;
    Ok((field, value.to_string()))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_settings(&cli) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("ERROR: {message}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.observability);
    tracing::debug!(config = ?config, "Configuration resolved");

    match cli.command {
        Some(Commands::Serve(args)) => serve(config, args).await,
        Some(Commands::Check(args)) => check(config, args).await,
        None => check(config, CheckArgs::default()).await,
    }
}

/// Config file (or defaults) plus CLI overrides, validated once more.
fn load_settings(cli: &Cli) -> Result<DebugConfig, String> {
    let mut config = load_or_default(cli.config.as_deref()).map_err(|e| e.to_string())?;

    if let Some(level) = &cli.log_level {
        config.observability.log_level = level.clone();
    }
    if let Some(path) = &cli.helpers_path {
        config.panel.helpers_path = path.clone();
    }
    if let Some(dir) = &cli.bin_dir {
        config.panel.bin_dir = dir.clone();
    }
    if cli.no_sudo {
        config.panel.use_sudo = false;
    }
    if let Some(Commands::Serve(ServeArgs { bind: Some(bind) })) = &cli.command {
        config.server.bind_address = bind.clone();
    }

    validate_config(&config).map_err(|errors| {
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    })?;
    Ok(config)
}

async fn check(config: DebugConfig, args: CheckArgs) -> ExitCode {
    let (builder, lookup) = match &args.remote_addr {
        Some(addr) => synthesize_context(&NoLookup, addr).await,
        None if args.no_lookup || !config.lookup.enabled => {
            synthesize_context(&NoLookup, &config.lookup.fallback_address).await
        }
        None => {
            let lookup = HttpLookup::new(&config.lookup);
            synthesize_context(&lookup, &config.lookup.fallback_address).await
        }
    };

    let context = args
        .headers
        .into_iter()
        .fold(builder, |builder, (field, value)| builder.set(field, value))
        .build();

    let doctor = Doctor::new(config.panel.clone(), CommandSource::new(&config.panel));
    match doctor.diagnose(context).await {
        Ok(diagnosis) => {
            print!("{}", render_report(Mode::Standalone(&lookup), &diagnosis));
            ExitCode::SUCCESS
        }
        Err(e) => {
            print!("{}", render_failure(Mode::Standalone(&lookup), &e));
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: DebugConfig, _args: ServeArgs) -> ExitCode {
    let listener = match TcpListener::bind(&config.server.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(address = %config.server.bind_address, error = %e, "Failed to bind");
            eprintln!("ERROR: cannot bind {}: {e}", config.server.bind_address);
            return ExitCode::FAILURE;
        }
    };

    let doctor = Doctor::new(config.panel.clone(), CommandSource::new(&config.panel));
    let server = HttpServer::new(&config.server, doctor);
    match server.run(listener).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "HTTP server failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("X-Forwarded-For=203.0.113.5, 10.0.0.1"),
            Ok((SourceField::XForwardedFor, "203.0.113.5, 10.0.0.1".to_string()))
        );
        assert_eq!(
            parse_header("HTTP_CLIENT_IP="),
            Ok((SourceField::ClientIp, String::new()))
        );
        assert!(parse_header("X-Forwarded-For").is_err());
        assert!(parse_header("X-Real-IP=1.2.3.4").is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "panel-ip-debug",
            "--no-sudo",
            "--bin-dir",
            "/opt/hestia/bin",
            "serve",
            "--bind",
            "0.0.0.0:9000",
        ]);
        let config = load_settings(&cli).unwrap();
        assert!(!config.panel.use_sudo);
        assert_eq!(config.panel.bin_dir, PathBuf::from("/opt/hestia/bin"));
        assert_eq!(config.server.bind_address, "0.0.0.0:9000");
    }

    #[test]
    fn test_cli_overrides_are_validated() {
        let cli = Cli::parse_from(["panel-ip-debug", "--bin-dir", "bin", "check"]);
        let err = load_settings(&cli).unwrap_err();
        assert!(err.contains("panel.bin_dir"));

        let cli = Cli::parse_from(["panel-ip-debug", "--log-level", "verbose", "check"]);
        let err = load_settings(&cli).unwrap_err();
        assert!(err.contains("observability.log_level"));
    }

    #[test]
    fn test_check_args() {
        let cli = Cli::parse_from([
            "panel-ip-debug",
            "check",
            "--remote-addr",
            "10.0.0.1",
            "--header",
            "CF-Connecting-IP=203.0.113.5",
            "--header",
            "client-ip=198.51.100.1",
        ]);
        match cli.command {
            Some(Commands::Check(args)) => {
                assert_eq!(args.remote_addr.as_deref(), Some("10.0.0.1"));
                assert_eq!(args.headers.len(), 2);
                assert_eq!(args.headers[1].0, SourceField::ClientIp);
            }
            _ => panic!("expected check"),
        }
    }
}
