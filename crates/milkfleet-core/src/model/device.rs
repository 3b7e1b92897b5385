// ── Device domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Device operational status.
///
/// Independent of the tamper flag: a device can be online and tampered
/// at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl DeviceStatus {
    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

/// A milk-vending ATM in the fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub status: DeviceStatus,
    /// Backend-supplied tamper flag. The detection algorithm is opaque to
    /// this client; we only filter on the boolean.
    pub is_tampered: bool,
    pub last_updated: Option<DateTime<Utc>>,
    /// Remaining milk level, percent of tank capacity.
    pub capacity: Option<f64>,
    pub temperature: Option<f64>,
}

impl Device {
    pub fn is_online(&self) -> bool {
        self.status.is_online()
    }
}
