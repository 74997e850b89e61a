//! Server-side services.

pub mod catalog;

pub use catalog::{CatalogEntry, CatalogService};
