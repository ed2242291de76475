//! Domain models for slbill.
//!
//! ## Submodules
//!
//! - [`filters`] - Query filters built from command-line arguments
//! - [`resource`] - Billed resources and their display fields
//! - [`report`] - Report tables and cost totals

mod filters;
mod report;
mod resource;

pub use filters::QueryFilters;
pub use report::{CostTotal, ReportTable};
pub use resource::{Amount, BillingResource, ResourceField};
#[cfg(test)]
mod serde_tests;
