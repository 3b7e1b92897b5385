// ── Vendor and pricing domain types ──

use serde::{Deserialize, Serialize};

/// The vendor operating this fleet. Mutable via the edit form; sibling
/// views showing vendor data re-fetch on the invalidation signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub shop_name: String,
}

/// Fleet-wide price per litre. Singleton, mutated via POST.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub price_per_litre: f64,
}
