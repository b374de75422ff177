// ── Wire model for `GET /status` ──

use serde::{Deserialize, Serialize};

/// One self-contained set of status values retrieved from the server.
///
/// Every field is required: a body missing any of them (or carrying
/// `null`) fails to deserialize. Unknown fields are ignored. Counts are
/// taken as the server sends them; non-negativity is not checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub occupied: i64,
    pub available: i64,
    /// Server-formatted timestamp, rendered verbatim.
    pub last_updated: String,
}
