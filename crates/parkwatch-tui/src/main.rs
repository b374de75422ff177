//! `parkwatch-tui`: live terminal dashboard for one parking lot.
//!
//! Built on [ratatui](https://ratatui.rs). A `StatusPoller` writes every
//! snapshot into a `DisplayBoard`; a background data bridge forwards board
//! changes into the TUI action loop, which renders the three values as
//! cards.
//!
//! Logs are written to a file (default `/tmp/parkwatch-tui.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod data_bridge;
mod event;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, bail};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use parkwatch_config::{Config, Profile};
use parkwatch_core::{PollerConfig, StalePolicy};

use crate::app::App;

/// Terminal dashboard showing live parking occupancy.
#[derive(Parser, Debug)]
#[command(name = "parkwatch-tui", version, about)]
struct Cli {
    /// Status server URL (e.g., http://127.0.0.1:5000)
    #[arg(short = 'S', long, env = "PARKWATCH_SERVER")]
    server: Option<String>,

    /// Dashboard profile from the config file
    #[arg(short = 'p', long, env = "PARKWATCH_PROFILE")]
    profile: Option<String>,

    /// Poll interval in milliseconds
    #[arg(short = 'i', long)]
    interval_ms: Option<u64>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Ignore responses that arrive after a newer one was shown
    #[arg(long)]
    discard_stale: bool,

    /// Log file path (defaults to /tmp/parkwatch-tui.log)
    #[arg(long, default_value = "/tmp/parkwatch-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may log to stdout/stderr while the
/// terminal is in raw mode. The returned guard flushes logs on drop.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "parkwatch_tui={log_level},parkwatch_core={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("parkwatch-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Resolve the poller config and a header label.
///
/// Same precedence as the CLI: flags > profile > defaults. `--server`
/// replaces only the profile's URL; without any profile it stands alone.
fn build_poller_config(cli: &Cli, cfg: &Config) -> Result<(PollerConfig, String)> {
    let profile_name = cli
        .profile
        .clone()
        .unwrap_or_else(|| cfg.default_profile_name().to_owned());

    let (profile, label) = match (cfg.profiles.get(&profile_name), &cli.server) {
        (Some(profile), server) => {
            let mut profile = profile.clone();
            if let Some(server) = server {
                profile.server.clone_from(server);
            }
            let label = profile.label(&profile_name).to_owned();
            (profile, label)
        }
        (None, Some(server)) if cli.profile.is_none() => {
            (Profile::new(server.clone()), server.clone())
        }
        (None, _) if cli.profile.is_some() => {
            bail!("profile '{profile_name}' not found in configuration");
        }
        (None, _) => bail!(
            "no status server configured; pass --server or run `parkwatch config init <URL>` (looked in {})",
            parkwatch_config::config_path().display()
        ),
    };

    let mut config = parkwatch_config::profile_to_poller_config(&profile, &cfg.defaults)?;
    if let Some(ms) = cli.interval_ms {
        config = config.with_poll_interval(Duration::from_millis(ms));
    }
    if let Some(ms) = cli.timeout_ms {
        config = config.with_request_timeout(Duration::from_millis(ms));
    }
    if cli.discard_stale {
        config = config.with_stale_policy(StalePolicy::DiscardStale);
    }
    config.validate()?;

    Ok((config, label))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file. Hold the guard so logs flush on exit.
    let _log_guard = setup_tracing(&cli);

    let cfg = parkwatch_config::load_config()
        .wrap_err_with(|| format!("reading {}", parkwatch_config::config_path().display()))?;
    let (config, label) = build_poller_config(&cli, &cfg)?;
    info!(
        server = %config.base_url,
        interval = ?config.poll_interval,
        stale_policy = %config.stale_policy,
        "starting parkwatch-tui"
    );

    let mut app = App::new(config, label)?;
    app.run().await?;

    Ok(())
}
