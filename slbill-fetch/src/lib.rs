// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # slbill Fetch
//!
//! SoftLayer billing API client for slbill.
//!
//! - [`billing::BillingManager`] - [`slbill_core::BillingQuery`] implementation
//!   over the SoftLayer REST API
//! - [`client::HttpClient`] - HTTP client with basic auth and retry
//! - [`credentials::Credentials`] - Username and API key resolution
//! - [`keychain`] - System keychain access for stored API keys
//!
//! ## Example
//!
//! ```ignore
//! use slbill_core::{BillingQuery, QueryFilters};
//! use slbill_fetch::{BillingManager, Credentials, HttpClient, SystemKeychain};
//!
//! let credentials = Credentials::from_env_or_keychain(Some("alice"), &SystemKeychain::new()).await?;
//! let manager = BillingManager::new(HttpClient::new()?, credentials);
//!
//! let filters = QueryFilters::new().with_from_date(Some("2014-03-01"));
//! let resources = manager.list_resources(&filters).await?;
//! ```

pub mod billing;
pub mod client;
pub mod credentials;
pub mod error;
pub mod keychain;
pub mod retry;

#[cfg(test)]
mod test_server;

// Errors
pub use error::{FetchError, KeychainError};

// Client
pub use billing::{BillingItem, BillingManager, DEFAULT_ENDPOINT};
pub use client::HttpClient;
pub use credentials::Credentials;
pub use keychain::{KeychainApi, SystemKeychain};
pub use retry::RetryStrategy;
