//! Async client for the milk-vending fleet backend REST API.
//!
//! The backend owns all authoritative state; this crate only speaks the wire
//! contract under `/api/` and hands back plain DTOs. Consumers (notably
//! `milkfleet-core`) convert DTOs into domain types and decide caching and
//! refresh policy.
//!
//! Response envelope, normalized across every endpoint:
//! - non-2xx → `{ "error": string }`, surfaced as [`Error::Api`]
//! - 2xx writes → either the updated entity or `{ "success", "message" }`;
//!   a 2xx ack with `success: false` is surfaced as [`Error::Rejected`]

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::BackendClient;
pub use error::Error;
pub use transport::TransportConfig;
