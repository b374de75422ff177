// parkwatch-api: Async Rust client for the parking status endpoint

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{STATUS_PATH, StatusClient};
pub use error::Error;
pub use models::StatusSnapshot;
pub use transport::TransportConfig;
