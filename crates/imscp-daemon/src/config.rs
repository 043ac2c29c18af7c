//! Notifier configuration.

use std::time::Duration;

use crate::{DEFAULT_CLIENT_NAME, DEFAULT_HOST, DEFAULT_PORT};

/// Default connect and I/O timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Daemon connection configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    /// Daemon host.
    pub host: String,
    /// Daemon port.
    pub port: u16,
    /// Name announced in the `helo` command.
    pub client_name: String,
    /// Connection timeout. `None` waits for the OS.
    pub connect_timeout: Option<Duration>,
    /// Timeout for each read and each write. `None` waits forever.
    pub io_timeout: Option<Duration>,
}

impl DaemonConfig {
    /// Creates a configuration for the given endpoint with default timeouts.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            connect_timeout: Some(DEFAULT_TIMEOUT),
            io_timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Returns the `host:port` address string.
    ///
    /// IPv6 hosts are bracketed, as in `[::1]:9876`.
    #[must_use]
    pub fn addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

/// Builder for [`DaemonConfig`].
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: DaemonConfig,
}

impl ConfigBuilder {
    /// Creates a builder starting from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: DaemonConfig::default(),
        }
    }

    /// Sets the host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Sets the port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets the client name sent with `helo`.
    #[must_use]
    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.config.client_name = name.into();
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Sets the read/write timeout.
    #[must_use]
    pub const fn io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.io_timeout = timeout;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> DaemonConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let config = DaemonConfig::default();
        assert_eq!(config.addr(), "127.0.0.1:9876");
        assert_eq!(config.client_name, "roundcube");
        assert_eq!(config.connect_timeout, Some(DEFAULT_TIMEOUT));
        assert_eq!(config.io_timeout, Some(DEFAULT_TIMEOUT));
    }

    #[test]
    fn test_builder() {
        let config = DaemonConfig::builder()
            .host("::1")
            .port(10_000)
            .client_name("webmail")
            .connect_timeout(None)
            .io_timeout(Some(Duration::from_millis(250)))
            .build();

        assert_eq!(config.host, "::1");
        assert_eq!(config.port, 10_000);
        assert_eq!(config.client_name, "webmail");
        assert_eq!(config.connect_timeout, None);
        assert_eq!(config.io_timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_addr_brackets_ipv6() {
        assert_eq!(DaemonConfig::new("::1", 9876).addr(), "[::1]:9876");
        assert_eq!(DaemonConfig::new("[::1]", 9876).addr(), "[::1]:9876");
        assert_eq!(DaemonConfig::new("localhost", 9876).addr(), "localhost:9876");
    }
}
