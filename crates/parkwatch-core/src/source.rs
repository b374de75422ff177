// ── Status sources ──
//
// The poller only needs "give me a snapshot". `StatusClient` is the real
// implementation; tests plug in scripted sources to control latency and
// completion order.

use std::future::Future;

use parkwatch_api::{StatusClient, StatusSnapshot};

/// Anything the poller can fetch a `StatusSnapshot` from.
pub trait StatusSource: Send + Sync + 'static {
    /// Fetch one snapshot.
    fn fetch_status(
        &self,
    ) -> impl Future<Output = Result<StatusSnapshot, parkwatch_api::Error>> + Send;

    /// Human-readable endpoint description for logs.
    fn endpoint(&self) -> &str;
}

impl StatusSource for StatusClient {
    fn fetch_status(
        &self,
    ) -> impl Future<Output = Result<StatusSnapshot, parkwatch_api::Error>> + Send {
        StatusClient::fetch_status(self)
    }

    fn endpoint(&self) -> &str {
        self.status_url().as_str()
    }
}
