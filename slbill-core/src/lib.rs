// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `slbill` Core
//!
//! Core types, models, and traits for `slbill`.
//!
//! This crate provides the foundational abstractions shared by the other
//! `slbill` crates:
//!
//! - Domain models (query filters, billing resources, report tables)
//! - Error types
//! - The [`BillingQuery`] trait implemented by billing API clients
//!
//! ## Key Types
//!
//! ### Query
//! - [`QueryFilters`] - Optional date range and resource-type filters
//!
//! ### Billing Data
//! - [`BillingResource`] - One billed resource as returned by the API
//! - [`ResourceField`] - The display fields of a resource, with wire names
//! - [`Amount`] - A monetary value, textual or numeric
//!
//! ### Reports
//! - [`ReportTable`] - Fixed-column cost report
//! - [`CostTotal`] - Accumulated cost across resources

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Query
    QueryFilters,
    // Billing data
    Amount,
    BillingResource,
    ResourceField,
    // Reports
    CostTotal,
    ReportTable,
};

// Re-export traits
pub use traits::BillingQuery;
