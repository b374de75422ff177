//! CLI configuration: thin wrapper around `parkwatch_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--profile, --server, --timeout-ms).

use std::time::Duration;

use parkwatch_core::PollerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use parkwatch_config::{
    Config, Profile, config_path, load_config, parse_server, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.default_profile_name().to_owned())
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Build a `PollerConfig` from the config file, profile, and CLI overrides.
///
/// Precedence: flag > env > profile > defaults. Without a profile, a
/// `--server` flag alone is enough.
pub fn resolve_poller_config(global: &GlobalOpts, cfg: &Config) -> Result<PollerConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut poller = if let Some(profile) = cfg.profiles.get(&profile_name) {
        let mut profile = profile.clone();
        if let Some(ref server) = global.server {
            profile.server.clone_from(server);
        }
        parkwatch_config::profile_to_poller_config(&profile, &cfg.defaults)?
    } else if let Some(ref server) = global.server {
        // An explicitly named profile must exist even with --server.
        if global.profile.is_some() {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(cfg),
            });
        }
        parkwatch_config::profile_to_poller_config(&Profile::new(server.clone()), &cfg.defaults)?
    } else if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(cfg),
        });
    } else {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    };

    if let Some(ms) = global.timeout_ms {
        poller = poller.with_request_timeout(Duration::from_millis(ms));
    }
    poller.validate().map_err(|e| CliError::Validation {
        field: "timeout-ms".into(),
        reason: e.to_string(),
    })?;

    tracing::debug!(
        profile = %profile_name,
        server = %poller.base_url,
        interval = ?poller.poll_interval,
        timeout = ?poller.request_timeout,
        "resolved poller config"
    );
    Ok(poller)
}
