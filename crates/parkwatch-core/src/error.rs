// ── Core error types ──
//
// The poll path has exactly one failure kind, `FetchOrParseFailure`.
// It wraps the transport-layer error so diagnostics keep the detail,
// but callers only ever log it. `CoreError` covers setup problems that
// happen before any poll runs.

use strum::{AsRefStr, Display};
use thiserror::Error;

/// Which stage of a poll went wrong. Diagnostic only; every kind is
/// handled the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// The server could not be reached, or the request timed out.
    Network,
    /// The server answered with a non-2xx status.
    Status,
    /// The body was not a well-formed status snapshot.
    Body,
}

/// A single poll failed somewhere between sending the request and
/// decoding the body.
#[derive(Debug, Error)]
#[error("{kind} failure: {source}")]
pub struct FetchOrParseFailure {
    kind: FailureKind,
    #[source]
    source: parkwatch_api::Error,
}

impl FetchOrParseFailure {
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// The underlying transport-layer error.
    pub fn api_error(&self) -> &parkwatch_api::Error {
        &self.source
    }

    pub fn is_timeout(&self) -> bool {
        self.source.is_timeout()
    }

    pub fn status_code(&self) -> Option<u16> {
        self.source.status_code()
    }
}

impl From<parkwatch_api::Error> for FetchOrParseFailure {
    fn from(source: parkwatch_api::Error) -> Self {
        let kind = match &source {
            parkwatch_api::Error::Status { .. } => FailureKind::Status,
            parkwatch_api::Error::Deserialization { .. } => FailureKind::Body,
            parkwatch_api::Error::Transport(e) if e.is_decode() || e.is_body() => {
                FailureKind::Body
            }
            parkwatch_api::Error::Transport(_)
            | parkwatch_api::Error::InvalidUrl(_)
            | parkwatch_api::Error::Client(_) => FailureKind::Network,
        };
        Self { kind, source }
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Fetch(#[from] FetchOrParseFailure),
}

impl From<parkwatch_api::Error> for CoreError {
    fn from(err: parkwatch_api::Error) -> Self {
        match err {
            parkwatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            parkwatch_api::Error::Client(message) => CoreError::Config { message },
            other => CoreError::Fetch(other.into()),
        }
    }
}
