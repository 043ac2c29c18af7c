//! Mail user model types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A mail address identifying a `mail_users` row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MailAddress(String);

impl MailAddress {
    /// Parses and validates a `local@domain` address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if the address is empty, contains
    /// whitespace, or does not have exactly one `@` with text on both sides.
    pub fn parse(address: impl Into<String>) -> Result<Self> {
        let address = address.into();
        let valid = match address.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !address.chars().any(char::is_whitespace)
            }
            None => false,
        };

        if valid {
            Ok(Self(address))
        } else {
            Err(Error::InvalidAddress(address))
        }
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for MailAddress {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<MailAddress> for String {
    fn from(address: MailAddress) -> Self {
        address.0
    }
}

/// Value of the `status` column.
///
/// The daemon picks up rows whose status asks for an action and sets them
/// back to [`MailStatus::Ok`] once applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailStatus {
    /// Applied, nothing pending.
    Ok,
    /// Waiting to be created.
    ToAdd,
    /// Settings changed (autoresponder).
    Change,
    /// Credentials changed (password).
    ToChange,
    /// Waiting to be deleted.
    ToDelete,
    /// Waiting to be enabled.
    ToEnable,
    /// Waiting to be disabled.
    ToDisable,
    /// Disabled.
    Disabled,
    /// Any other value, kept verbatim (daemon error messages end up here).
    Other(String),
}

impl MailStatus {
    /// Returns the column value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "ok",
            Self::ToAdd => "toadd",
            Self::Change => "change",
            Self::ToChange => "tochange",
            Self::ToDelete => "todelete",
            Self::ToEnable => "toenable",
            Self::ToDisable => "todisable",
            Self::Disabled => "disabled",
            Self::Other(s) => s,
        }
    }

    /// Parses a column value.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "ok" => Self::Ok,
            "toadd" => Self::ToAdd,
            "change" => Self::Change,
            "tochange" => Self::ToChange,
            "todelete" => Self::ToDelete,
            "toenable" => Self::ToEnable,
            "todisable" => Self::ToDisable,
            "disabled" => Self::Disabled,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns true if the row waits for the daemon.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(
            self,
            Self::ToAdd | Self::Change | Self::ToChange | Self::ToDelete | Self::ToEnable | Self::ToDisable
        )
    }
}

impl fmt::Display for MailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Autoresponder settings of a mail account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoresponderSettings {
    /// Whether automatic replies are sent.
    pub enabled: bool,
    /// Reply text.
    pub message: String,
}

impl AutoresponderSettings {
    /// Creates new settings.
    #[must_use]
    pub fn new(enabled: bool, message: impl Into<String>) -> Self {
        Self {
            enabled,
            message: message.into(),
        }
    }
}

/// The logged-in webmail user.
#[derive(Clone)]
pub struct MailSession {
    /// Mail account the session belongs to.
    pub address: MailAddress,
    /// Password the user logged in with.
    pub password: String,
}

impl MailSession {
    /// Creates a new session.
    #[must_use]
    pub fn new(address: MailAddress, password: impl Into<String>) -> Self {
        Self {
            address,
            password: password.into(),
        }
    }
}

impl fmt::Debug for MailSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailSession")
            .field("address", &self.address)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        let addr = MailAddress::parse("john@example.com").unwrap();
        assert_eq!(addr.as_str(), "john@example.com");
        assert_eq!(addr.to_string(), "john@example.com");
    }

    #[test]
    fn test_invalid_addresses() {
        for bad in ["", "john", "@example.com", "john@", "a@b@c", "john doe@example.com"] {
            assert!(
                matches!(MailAddress::parse(bad), Err(Error::InvalidAddress(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_address_serde() {
        let addr: MailAddress = serde_json::from_str("\"john@example.com\"").unwrap();
        assert_eq!(addr.as_str(), "john@example.com");
        assert!(serde_json::from_str::<MailAddress>("\"nope\"").is_err());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            MailStatus::Ok,
            MailStatus::ToAdd,
            MailStatus::Change,
            MailStatus::ToChange,
            MailStatus::ToDelete,
            MailStatus::ToEnable,
            MailStatus::ToDisable,
            MailStatus::Disabled,
        ] {
            assert_eq!(MailStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn test_unknown_status_kept() {
        let status = MailStatus::parse("postfix reload failed");
        assert_eq!(status, MailStatus::Other("postfix reload failed".into()));
        assert_eq!(status.as_str(), "postfix reload failed");
        assert!(!status.is_pending());
    }

    #[test]
    fn test_pending() {
        assert!(MailStatus::ToChange.is_pending());
        assert!(MailStatus::Change.is_pending());
        assert!(!MailStatus::Ok.is_pending());
        assert!(!MailStatus::Disabled.is_pending());
    }

    #[test]
    fn test_session_debug_hides_password() {
        let session = MailSession::new(MailAddress::parse("john@example.com").unwrap(), "s3cret");
        let debug = format!("{session:?}");
        assert!(debug.contains("john@example.com"));
        assert!(!debug.contains("s3cret"));
    }
}
