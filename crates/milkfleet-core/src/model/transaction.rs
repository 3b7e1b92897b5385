// ── Transaction domain types ──
//
// Transactions are append-only from the client's perspective: fetched as a
// list, never mutated locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a sale was paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum PaymentMethod {
    Cash,
    Mobile,
    Card,
    Unknown,
}

impl PaymentMethod {
    /// Lenient parse from the wire string; unrecognized methods collapse
    /// to [`Unknown`](Self::Unknown) rather than failing the whole payload.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "cash" => Self::Cash,
            "mobile" | "mpesa" => Self::Mobile,
            "card" => Self::Card,
            _ => Self::Unknown,
        }
    }
}

/// A single sale recorded by a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub device_id: String,
    pub device_name: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub timestamp: DateTime<Utc>,
    pub method: PaymentMethod,
}

/// A cash payment awaiting collection, listed under the account view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashPayment {
    pub id: String,
    pub device_id: String,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}
