//! Plugin settings.
//!
//! Settings are read from a JSON file. Every field has a default, so an empty
//! object is a valid file; only the database URL has to be provided before
//! changes can be saved.

use std::path::Path;
use std::time::Duration;

use imscp_daemon::{DEFAULT_CLIENT_NAME, DEFAULT_HOST, DEFAULT_PORT, DaemonConfig};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Settings shared by the password and autoresponder plugins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSettings {
    /// Database holding the `mail_users` table.
    pub database_url: Option<String>,
    /// Daemon endpoint.
    pub daemon: DaemonSettings,
    /// Password change rules.
    pub password: PasswordPolicy,
}

impl PluginSettings {
    /// Loads settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parses settings from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Daemon endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonSettings {
    /// Daemon host.
    pub host: String,
    /// Daemon port.
    pub port: u16,
    /// Name sent with `helo`.
    pub client_name: String,
    /// Connect timeout in seconds, `null` to disable.
    pub connect_timeout_secs: Option<u64>,
    /// Read/write timeout in seconds, `null` to disable.
    pub io_timeout_secs: Option<u64>,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            connect_timeout_secs: Some(5),
            io_timeout_secs: Some(5),
        }
    }
}

impl From<&DaemonSettings> for DaemonConfig {
    fn from(settings: &DaemonSettings) -> Self {
        Self::builder()
            .host(settings.host.as_str())
            .port(settings.port)
            .client_name(settings.client_name.as_str())
            .connect_timeout(settings.connect_timeout_secs.map(Duration::from_secs))
            .io_timeout(settings.io_timeout_secs.map(Duration::from_secs))
            .build()
    }
}

/// Rules applied to a new password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    /// Minimum number of characters.
    pub minimum_length: usize,
    /// Require the current password before changing it.
    pub confirm_current: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            minimum_length: 8,
            confirm_current: true,
        }
    }
}
