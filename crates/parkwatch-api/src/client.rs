// Status endpoint HTTP client
//
// Wraps `reqwest::Client` with the fixed `/status` path, status-line
// checking, and JSON decoding into a `StatusSnapshot`.

use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, preview};
use crate::models::StatusSnapshot;
use crate::transport::TransportConfig;

/// Path of the status endpoint, resolved from the server root.
pub const STATUS_PATH: &str = "/status";

/// Raw HTTP client for the dashboard server's status endpoint.
///
/// Cheap to clone: `reqwest::Client` is reference-counted internally,
/// so every poll task can hold its own copy.
#[derive(Debug, Clone)]
pub struct StatusClient {
    http: reqwest::Client,
    base_url: Url,
    status_url: Url,
}

impl StatusClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the server root (e.g. `http://127.0.0.1:5000`). Any
    /// path on it is replaced by [`STATUS_PATH`].
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Result<Self, Error> {
        let status_url = base_url.join(STATUS_PATH)?;
        Ok(Self {
            http,
            base_url,
            status_url,
        })
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The fully resolved status endpoint URL.
    pub fn status_url(&self) -> &Url {
        &self.status_url
    }

    /// `GET /status` and decode the body.
    ///
    /// Non-2xx responses are errors even when their body is valid JSON.
    pub async fn fetch_status(&self) -> Result<StatusSnapshot, Error> {
        debug!("GET {}", self.status_url);

        let resp = self
            .http
            .get(self.status_url.clone())
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body: preview(&body).to_owned(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(bytes = body.len(), "status body received");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}
