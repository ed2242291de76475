//! Trait definitions for slbill.
//!
//! This module defines the seam between the CLI commands and the client that
//! actually talks to the billing API.

use crate::models::{BillingResource, QueryFilters};

/// A service that can list billed resources.
///
/// Implementors are responsible for:
/// - Authenticating with the billing API
/// - Applying the date range and resource-type filters
/// - Returning resources in the order the API reports them
///
/// Each unset filter means "no constraint" for that dimension. Validation of
/// filter values (date formats, known resource types) is up to the
/// implementor, and failures are reported through [`BillingQuery::Error`].
pub trait BillingQuery: Send + Sync {
    /// Error returned when the query fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Lists billed resources matching the filters.
    ///
    /// Returns an empty vector when nothing matches.
    fn list_resources(
        &self,
        filters: &QueryFilters,
    ) -> impl std::future::Future<Output = Result<Vec<BillingResource>, Self::Error>> + Send;
}
