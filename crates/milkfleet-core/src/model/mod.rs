// ── Canonical domain model ──
//
// Plain value records mirroring backend state. The client never owns
// authoritative copies; everything here is a cached snapshot.

mod account;
mod device;
mod transaction;
mod vendor;

pub use account::{Account, Withdrawal};
pub use device::{Device, DeviceStatus};
pub use transaction::{CashPayment, PaymentMethod, Transaction};
pub use vendor::{Pricing, Vendor};
