// ── Runtime connection configuration ──
//
// Describes *how* to reach the vending backend and how often each view's
// resource is re-polled. Built by the CLI (or another consumer) and handed
// to `FleetController` -- core never reads config files or the environment.

use std::time::Duration;

use url::Url;

/// Configuration for connecting to a single vending backend.
#[derive(Debug, Clone)]
pub struct FleetConfig {
    /// Backend base URL (e.g., `https://fleet.example.com`).
    pub base_url: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// Accept self-signed certificates.
    pub accept_invalid_certs: bool,
    /// Device list poll cadence. Zero disables device polling.
    pub device_poll_interval: Duration,
    /// Transaction list poll cadence. Zero disables.
    pub transaction_poll_interval: Duration,
    /// Account poll cadence. Zero disables.
    pub account_poll_interval: Duration,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://localhost:5000").expect("static URL is valid"),
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
            // Fixed cadences, no backoff or jitter -- failures are resolved
            // by the next tick or a manual refresh.
            device_poll_interval: Duration::from_secs(3),
            transaction_poll_interval: Duration::from_secs(10),
            account_poll_interval: Duration::from_secs(10),
        }
    }
}
