// Transport configuration for building the reqwest::Client used by
// `StatusClient`.

use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("parkwatch/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout. `None` lets a hung request stay pending forever.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: USER_AGENT.into(),
        }
    }
}

impl TransportConfig {
    /// Set a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.as_str());

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map_err(|e| Error::Client(format!("failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_timeout() {
        let cfg = TransportConfig::default();
        assert!(cfg.timeout.is_none());
        assert!(cfg.user_agent.starts_with("parkwatch/"));
    }

    #[test]
    fn builds_with_timeout() {
        let cfg = TransportConfig::default().with_timeout(Duration::from_secs(5));
        assert_eq!(cfg.timeout, Some(Duration::from_secs(5)));
        assert!(cfg.build_client().is_ok());
    }
}
