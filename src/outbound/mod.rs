//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: SQLite-backed repositories using Diesel
//! - **qr**: PNG rendering of coupon codes as QR symbols
//!
//! Adapters translate between domain types and infrastructure-specific
//! representations; they contain no business logic.

pub mod persistence;
pub mod qr;
