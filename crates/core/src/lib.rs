//! Paywall Core - Shared domain library.
//!
//! This crate provides the domain types and logic shared by the paywall demo
//! components:
//! - `server` - Demo checkout server gluing hosted checkout to entitlements
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Everything here is testable without a network.
//!
//! # Modules
//!
//! - [`catalog`] - Price objects and billing-interval classification
//! - [`currency`] - ISO currency code to symbol lookup
//! - [`identity`] - End-user identity and per-session configuration
//! - [`offering`] - Offerings, packages, and price reconciliation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod currency;
pub mod identity;
pub mod offering;

pub use catalog::{PackageDuration, Price, Recurring, RecurringInterval};
pub use identity::{ConfigureInput, SessionConfig, UserIdentity};
pub use offering::{Offering, Package, reconcile};
