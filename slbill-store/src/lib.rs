// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # slbill Store
//!
//! Settings persistence for slbill.
//!
//! - **SettingsStore**: username, endpoint, and transport settings
//! - **Persistence**: atomic, owner-only JSON file helpers
//!
//! ## Usage
//!
//! ```ignore
//! use slbill_store::SettingsStore;
//!
//! let store = SettingsStore::load_default().await;
//! store.update(|s| s.username = Some("alice".into())).await?;
//! store.save().await?;
//! ```

pub mod error;
pub mod persistence;
pub mod settings;

pub use error::StoreError;
pub use persistence::{default_config_dir, default_settings_path, load_json, save_json};
pub use settings::{Settings, SettingsStore, ENDPOINT_ENV, USERNAME_ENV};
