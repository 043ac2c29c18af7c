//! # imscp-roundcube
//!
//! Server-side logic of the i-MSCP Roundcube plugins.
//!
//! This crate provides:
//! - Mail user storage (`mail_users` table)
//! - Password changes
//! - Autoresponder settings
//! - Plugin settings
//!
//! A change is always written to the database first and marked for the
//! i-MSCP daemon, which is then notified through [`imscp_daemon`]. The two
//! steps are not atomic: a failed notification leaves the change saved and
//! pending, reported as [`SaveOutcome::Pending`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod mailbox;
pub mod service;
pub mod settings;

pub use error::{Error, Result};
pub use mailbox::{
    AutoresponderSettings, DatabaseKind, DatabasePool, MailAddress, MailSession, MailStatus,
    MailUserRepository, MailUserStore,
};
pub use service::{
    AutoresponderService, ChangeNotifier, PasswordChange, PasswordService, SaveOutcome,
    ValidationError,
};
pub use settings::{DaemonSettings, PasswordPolicy, PluginSettings};
