// ── Account domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vendor account: balance plus withdrawal history.
///
/// The balance is decremented transactionally by the backend on withdrawal;
/// the client never computes it locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub balance: f64,
    pub withdrawals: Vec<Withdrawal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Withdrawal {
    pub id: String,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}
