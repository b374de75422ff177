//! CLI error types with miette diagnostics.
//!
//! Maps core and config errors into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use parkwatch_config::ConfigError;
use parkwatch_core::{CoreError, FailureKind};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const BAD_STATUS: i32 = 9;
    pub const BAD_BODY: i32 = 10;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Fetch ────────────────────────────────────────────────────────
    #[error("Could not connect to status server at {url}")]
    #[diagnostic(
        code(parkwatch::connection_failed),
        help(
            "Check that the status server is running and reachable.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(parkwatch::timeout),
        help("Increase the limit with --timeout-ms or check server responsiveness.")
    )]
    Timeout { url: String },

    #[error("Status server answered HTTP {status}")]
    #[diagnostic(
        code(parkwatch::bad_status),
        help("Expected 2xx from {url}. Check that --server points at the dashboard server.")
    )]
    BadStatus { url: String, status: u16 },

    #[error("Status server sent an unreadable response")]
    #[diagnostic(
        code(parkwatch::bad_body),
        help(
            "Expected JSON with occupied, available and last_updated from {url}.\n\
             {reason}"
        )
    )]
    BadBody { url: String, reason: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(parkwatch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(parkwatch::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: parkwatch config init <URL>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No status server configured")]
    #[diagnostic(
        code(parkwatch::no_config),
        help(
            "Pass --server <URL>, or create a profile with: parkwatch config init <URL>\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(parkwatch::config_exists),
        help("Use --force to overwrite it, or edit it with: parkwatch config set-server <URL>")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(parkwatch::config))]
    Config(ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    #[diagnostic(code(parkwatch::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to encode output: {0}")]
    #[diagnostic(code(parkwatch::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::BadStatus { .. } => exit_code::BAD_STATUS,
            Self::BadBody { .. } => exit_code::BAD_BODY,
            Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. }
            | Self::ConfigExists { .. }
            | Self::Config(_) => exit_code::USAGE,
            Self::Io(_) | Self::Json(_) | Self::Yaml(_) => exit_code::GENERAL,
        }
    }

    /// Classify a poll failure against `url`.
    pub fn from_core(err: CoreError, url: &str) -> Self {
        let failure = match err {
            CoreError::Config { message } => {
                return Self::Validation {
                    field: "config".into(),
                    reason: message,
                };
            }
            CoreError::Fetch(failure) => failure,
        };

        let url = url.to_owned();
        match failure.kind() {
            FailureKind::Network if failure.is_timeout() => Self::Timeout { url },
            FailureKind::Network => Self::ConnectionFailed {
                url,
                source: Box::new(failure),
            },
            FailureKind::Status => Self::BadStatus {
                url,
                status: failure.status_code().unwrap_or_default(),
            },
            FailureKind::Body => Self::BadBody {
                url,
                reason: failure.to_string(),
            },
        }
    }
}

// ── ConfigError → CliError mapping ──────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(other),
        }
    }
}
