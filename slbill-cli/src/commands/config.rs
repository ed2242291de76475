//! Config command - manage configuration.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use slbill_fetch::billing::parse_endpoint;
use slbill_fetch::keychain::SOFTLAYER_SERVICE;
use slbill_fetch::{KeychainApi, SystemKeychain, DEFAULT_ENDPOINT};
use slbill_store::{default_config_dir, Settings, SettingsStore};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Set the SoftLayer username.
    SetUsername {
        /// Account username.
        username: String,
    },

    /// Set the REST endpoint.
    SetEndpoint {
        /// Endpoint URL, e.g. https://api.service.softlayer.com/rest/v3.1
        url: String,
    },

    /// Set the request timeout.
    SetTimeout {
        /// Timeout in seconds.
        seconds: u64,
    },

    /// Set how many times a request is attempted.
    SetMaxAttempts {
        /// Total attempts, including the first.
        attempts: u32,
    },

    /// Store the API key in the system keychain.
    SetApiKey {
        /// API key for the configured username.
        api_key: String,
    },

    /// Remove the API key from the system keychain.
    ClearApiKey,

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    let store = SettingsStore::load_default().await;

    match &args.action {
        ConfigAction::Show => show_config(&store, cli).await,
        ConfigAction::Path => show_paths(&store, cli),
        ConfigAction::SetUsername { username } => set_username(&store, username).await,
        ConfigAction::SetEndpoint { url } => set_endpoint(&store, url).await,
        ConfigAction::SetTimeout { seconds } => set_timeout(&store, *seconds).await,
        ConfigAction::SetMaxAttempts { attempts } => set_max_attempts(&store, *attempts).await,
        ConfigAction::SetApiKey { api_key } => {
            set_api_key(&store, &SystemKeychain::new(), api_key).await
        }
        ConfigAction::ClearApiKey => clear_api_key(&store, &SystemKeychain::new()).await,
        ConfigAction::Reset => reset_config(&store).await,
    }
}

/// Effective configuration as shown to the user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigOutput {
    username: Option<String>,
    endpoint_url: String,
    timeout_secs: u64,
    max_attempts: u32,
    api_key_stored: bool,
}

/// Configuration paths as shown to the user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PathsOutput {
    config_dir: String,
    settings_file: String,
}

async fn show_config(store: &SettingsStore, cli: &Cli) -> Result<()> {
    let settings = store.get().await.with_process_env();
    let api_key_stored = match settings.username.as_deref() {
        Some(username) => SystemKeychain::new().exists(SOFTLAYER_SERVICE, username).await,
        None => false,
    };
    let output = config_output(settings, api_key_stored);

    match cli.format {
        OutputFormat::Text => {
            println!("slbill Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!(
                "Username:       {}",
                output.username.as_deref().unwrap_or("(not set)")
            );
            println!("Endpoint:       {}", output.endpoint_url);
            println!("Timeout:        {}s", output.timeout_secs);
            println!("Max attempts:   {}", output.max_attempts);
            println!(
                "API key:        {}",
                if output.api_key_stored { "stored in keychain" } else { "not stored" }
            );
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&output)?);
        }
    }

    Ok(())
}

fn config_output(settings: Settings, api_key_stored: bool) -> ConfigOutput {
    ConfigOutput {
        username: settings.username,
        endpoint_url: settings
            .endpoint_url
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        timeout_secs: settings.timeout_secs,
        max_attempts: settings.max_attempts,
        api_key_stored,
    }
}

fn show_paths(store: &SettingsStore, cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = store.path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
        }
        OutputFormat::Json => {
            let paths = PathsOutput {
                config_dir: config_dir.display().to_string(),
                settings_file: settings_path.display().to_string(),
            };
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn set_username(store: &SettingsStore, username: &str) -> Result<()> {
    let username = username.trim();
    anyhow::ensure!(!username.is_empty(), "Username must not be empty");

    store
        .update(|s| s.username = Some(username.to_string()))
        .await?;
    store.save().await?;

    info!(username = %username, "Username set");
    println!("Username: {username}");
    Ok(())
}

async fn set_endpoint(store: &SettingsStore, url: &str) -> Result<()> {
    let endpoint = parse_endpoint(url)?;
    let value = url.trim().trim_end_matches('/').to_string();

    store.update(|s| s.endpoint_url = Some(value)).await?;
    store.save().await?;

    info!(endpoint = %endpoint, "Endpoint set");
    println!("Endpoint: {endpoint}");
    Ok(())
}

async fn set_timeout(store: &SettingsStore, seconds: u64) -> Result<()> {
    store.update(|s| s.timeout_secs = seconds).await?;
    store.save().await?;

    println!("Timeout: {seconds}s");
    Ok(())
}

async fn set_max_attempts(store: &SettingsStore, attempts: u32) -> Result<()> {
    store.update(|s| s.max_attempts = attempts).await?;
    store.save().await?;

    println!("Max attempts: {attempts}");
    Ok(())
}

/// Returns the configured username or an error telling how to set one.
async fn require_username(store: &SettingsStore) -> Result<String> {
    store
        .get()
        .await
        .with_process_env()
        .username
        .context("No username configured; run `sl config set-username <USERNAME>` first")
}

async fn set_api_key(
    store: &SettingsStore,
    keychain: &dyn KeychainApi,
    api_key: &str,
) -> Result<()> {
    let api_key = api_key.trim();
    anyhow::ensure!(!api_key.is_empty(), "API key must not be empty");

    let username = require_username(store).await?;
    keychain.set(SOFTLAYER_SERVICE, &username, api_key).await?;

    info!(username = %username, "API key stored");
    println!("API key stored for {username}");
    Ok(())
}

async fn clear_api_key(store: &SettingsStore, keychain: &dyn KeychainApi) -> Result<()> {
    let username = require_username(store).await?;
    keychain.delete(SOFTLAYER_SERVICE, &username).await?;

    info!(username = %username, "API key removed");
    println!("API key removed for {username}");
    Ok(())
}

async fn reset_config(store: &SettingsStore) -> Result<()> {
    if store.reset().await? {
        println!("Configuration reset to defaults");
    } else {
        println!("Configuration already at defaults");
    }
    Ok(())
}
