//! User settings.
//!
//! Settings hold everything needed to reach the billing API except the API
//! key, which lives in the system keychain or the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, remove_file, save_json};

/// Environment variable overriding the username.
pub const USERNAME_ENV: &str = "SL_USERNAME";

/// Environment variable overriding the API endpoint.
pub const ENDPOINT_ENV: &str = "SL_ENDPOINT_URL";

// ============================================================================
// Settings
// ============================================================================

/// Persisted user settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// SoftLayer username.
    pub username: Option<String>,

    /// REST endpoint. Unset means the public SoftLayer endpoint.
    pub endpoint_url: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Total attempts per request, including the first.
    pub max_attempts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            username: None,
            endpoint_url: None,
            timeout_secs: 30,
            max_attempts: 3,
        }
    }
}

impl Settings {
    /// Applies environment overrides using the given lookup.
    ///
    /// Empty values are ignored.
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(username) = get(USERNAME_ENV) {
            debug!(env = USERNAME_ENV, "Username overridden from environment");
            self.username = Some(username);
        }
        if let Some(endpoint) = get(ENDPOINT_ENV) {
            debug!(env = ENDPOINT_ENV, "Endpoint overridden from environment");
            self.endpoint_url = Some(endpoint);
        }
        self
    }

    /// Applies overrides from the process environment.
    #[must_use]
    pub fn with_process_env(self) -> Self {
        self.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for a zero timeout or attempt count.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.timeout_secs == 0 {
            return Err(StoreError::Config("timeout must be at least 1 second".to_string()));
        }
        if self.max_attempts == 0 {
            return Err(StoreError::Config("max attempts must be at least 1".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Settings loaded from, and saved to, a JSON file.
pub struct SettingsStore {
    settings: RwLock<Settings>,
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store with default settings.
    pub fn new(path: PathBuf) -> Self {
        Self {
            settings: RwLock::new(Settings::default()),
            path,
        }
    }

    /// Loads settings from the default path.
    pub async fn load_default() -> Self {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing or unreadable file yields defaults.
    pub async fn load(path: PathBuf) -> Self {
        let settings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            load_json(&path).await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            })
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        Self {
            settings: RwLock::new(settings),
            path,
        }
    }

    /// Returns the settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings, rejecting changes that fail validation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the updated settings are invalid;
    /// the stored settings are left unchanged.
    pub async fn update<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.write().await;
        let mut updated = settings.clone();
        f(&mut updated);
        updated.validate()?;
        *settings = updated;
        Ok(())
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Deletes the settings file and resets to defaults.
    ///
    /// Returns whether a file was removed.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be removed.
    pub async fn reset(&self) -> Result<bool, StoreError> {
        let removed = remove_file(&self.path).await?;
        *self.settings.write().await = Settings::default();
        if removed {
            info!(path = %self.path.display(), "Settings reset");
        }
        Ok(removed)
    }
}
