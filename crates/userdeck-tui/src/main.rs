//! `userdeck` — terminal console for managing user accounts and
//! per-user permission assignments against a remote backend.
//!
//! All business logic lives in the backend; the console is CRUD-over-REST
//! glue plus view rendering. Views map one-to-one to the backend console's
//! routes: the user list (home), create form, edit form, permission
//! assignment, and a not-found catch-all.
//!
//! Logs go to a file (default `/tmp/userdeck.log`) so they never corrupt
//! the terminal UI. Entry point: CLI argument parsing, tracing setup,
//! panic hooks, and app launch.

mod action;
mod app;
mod backend;
mod component;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use userdeck_api::{ApiClient, transport::TransportConfig};

use crate::app::App;

/// Terminal console for managing users and permissions.
#[derive(Parser, Debug)]
#[command(name = "userdeck", version, about)]
struct Cli {
    /// Backend base URL (e.g. http://localhost:8000); overrides the
    /// config file and USERDECK_PROTOCOL/HOST/PORT variables
    #[arg(short = 'u', long, env = "USERDECK_BACKEND_URL")]
    backend_url: Option<String>,

    /// Log file path
    #[arg(long, default_value = "/tmp/userdeck.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application so logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("userdeck_tui={log_level},userdeck_api={log_level}")));

    let log_dir = cli.log_file.parent().unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("userdeck.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    guard
}

/// Resolve the backend base URL: CLI flag first, then config file + env.
fn resolve_base_url(cli: &Cli) -> Result<Url> {
    if let Some(raw) = &cli.backend_url {
        return Ok(raw.parse()?);
    }
    let cfg = userdeck_config::load_config_or_default();
    Ok(cfg.base_url()?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let base_url = resolve_base_url(&cli)?;
    info!(%base_url, "starting userdeck");

    let api = ApiClient::new(base_url, &TransportConfig::default())?;
    let mut app = App::new(api);
    app.run().await
}
