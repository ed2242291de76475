//! SoftLayer API credentials.
//!
//! The username comes from settings (or `SL_USERNAME`); the API key comes
//! from `SL_API_KEY` or, failing that, the system keychain.

use std::fmt;

use tracing::debug;

use crate::error::FetchError;
use crate::keychain::{KeychainApi, SOFTLAYER_SERVICE};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "SL_API_KEY";

/// Username and API key for HTTP basic auth.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// SoftLayer username.
    pub username: String,
    api_key: String,
}

impl Credentials {
    /// Creates credentials from a username and API key.
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
        }
    }

    /// Returns the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Resolves credentials for a username.
    ///
    /// `env_key` takes precedence over the keychain so that scripted runs
    /// never touch the credential store.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingCredentials`] if no username is configured
    /// or no API key can be found.
    pub async fn resolve(
        username: Option<&str>,
        env_key: Option<String>,
        keychain: &dyn KeychainApi,
    ) -> Result<Self, FetchError> {
        let username = username.filter(|u| !u.is_empty()).ok_or_else(|| {
            FetchError::MissingCredentials(
                "no username configured (run `sl config set-username` or set SL_USERNAME)"
                    .to_string(),
            )
        })?;

        if let Some(key) = env_key.filter(|k| !k.is_empty()) {
            debug!(username = %username, "Using API key from environment");
            return Ok(Self::new(username, key));
        }

        match keychain.get(SOFTLAYER_SERVICE, username).await? {
            Some(key) => {
                debug!(username = %username, "Using API key from keychain");
                Ok(Self::new(username, key))
            }
            None => Err(FetchError::MissingCredentials(format!(
                "no API key for {username} (run `sl config set-api-key` or set {API_KEY_ENV})"
            ))),
        }
    }

    /// Resolves credentials reading the API key from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Credentials::resolve`].
    pub async fn from_env_or_keychain(
        username: Option<&str>,
        keychain: &dyn KeychainApi,
    ) -> Result<Self, FetchError> {
        Self::resolve(username, std::env::var(API_KEY_ENV).ok(), keychain).await
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
