// Wire DTOs for the vending backend API.
//
// Field names mirror the backend's camelCase JSON exactly; these types never
// leak above `milkfleet-core::convert`, which turns them into domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Entities ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorDto {
    pub id: String,
    pub name: String,
    pub shop_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDto {
    pub id: String,
    pub name: String,
    /// `"online"` or `"offline"`. Anything else is treated as offline.
    pub status: String,
    /// Opaque backend-supplied tamper flag. Independent of `status`.
    pub is_tampered: bool,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    /// Remaining milk level, percent of tank capacity.
    #[serde(default)]
    pub capacity: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: String,
    pub device_id: String,
    #[serde(default)]
    pub device_name: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingDto {
    pub price_per_litre: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub balance: f64,
    #[serde(default)]
    pub withdrawals: Vec<WithdrawalDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalDto {
    pub id: String,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashPaymentDto {
    pub id: String,
    pub device_id: String,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

// ── Write requests ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVendorRequest {
    pub name: String,
    pub shop_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeviceRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdate {
    pub price_per_litre: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AmountRequest {
    pub amount: f64,
}

// ── Response envelopes ──────────────────────────────────────────────

/// Ack envelope returned by write endpoints that don't echo an entity.
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}
