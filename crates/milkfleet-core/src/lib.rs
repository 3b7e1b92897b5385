//! Reactive data layer between `milkfleet-api` and UI consumers.
//!
//! This crate owns the business logic, domain model, and reactive data
//! infrastructure for the milkfleet workspace:
//!
//! - **[`FleetController`]** — Central facade managing the full lifecycle:
//!   [`connect()`](FleetController::connect) performs an initial foreground
//!   load, then spawns fixed-cadence poll tasks that keep each resource fresh
//!   through the silent-diff path. All writes go through the controller and
//!   are reconciled against backend truth, never applied optimistically.
//!
//! - **[`SyncCell<T>`](sync::SyncCell)** — Per-resource state cell built on
//!   `tokio::sync::watch`. Tracks the Idle → Loading → {Ready, Error} state
//!   machine, suppresses no-op updates by payload fingerprint, and discards
//!   out-of-order fetch completions via monotonic sequence tickets.
//!
//! - **[`ResourceStream<T>`](sync::ResourceStream)** — Subscription handle
//!   vended by the controller. Exposes `current()` / `latest()` / `changed()`
//!   for reactive rendering.
//!
//! - **[`ChangeSignal`](signal::ChangeSignal)** — Cross-view invalidation
//!   counter. Bumped after every successful write; observers re-fetch on any
//!   change.
//!
//! - **[`metrics`]** — Pure derived-metric functions (online count, tamper
//!   filter, capacity bands, fleet uptime) computed over fetched snapshots.

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod metrics;
pub mod model;
pub mod signal;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::FleetConfig;
pub use controller::{ConnectionState, FleetController};
pub use error::CoreError;
pub use signal::ChangeSignal;
pub use sync::{Phase, ResourceState, ResourceStream, SyncCell};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Account, CashPayment, Device, DeviceStatus, PaymentMethod, Pricing, Transaction, Vendor,
    Withdrawal,
};
