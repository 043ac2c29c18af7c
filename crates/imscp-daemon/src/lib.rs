//! # imscp-daemon
//!
//! Client for the i-MSCP daemon notification protocol.
//!
//! After a mail account change has been written to the `mail_users` table,
//! the daemon has to be told to apply it. The daemon listens on a loopback
//! TCP port and speaks a tiny line-oriented protocol; the client greets it,
//! asks it to execute its pending queries and says goodbye. The change itself
//! is never sent over the wire: the daemon re-reads pending rows from the
//! database.
//!
//! ## Quick Start
//!
//! ```ignore
//! use imscp_daemon::{DaemonConfig, DaemonNotifier};
//!
//! #[tokio::main]
//! async fn main() -> imscp_daemon::Result<()> {
//!     let notifier = DaemonNotifier::new(DaemonConfig::default());
//!     notifier.notify().await
//! }
//! ```
//!
//! ## Session
//!
//! ```text
//!  connect ──→ welcome ──→ helo roundcube ──→ execute query ──→ bye ──→ close
//!                 │              │                  │             │
//!                 └──────────────┴──── 999 ─────────┴─────────────┴──→ close
//! ```
//!
//! ## Modules
//!
//! - [`command`]: Client commands
//! - [`connection`]: Stream, session and notifier
//! - [`parser`]: Reply line parser
//! - [`types`]: Replies and session steps

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
mod config;
pub mod connection;
mod error;
pub mod parser;
pub mod types;

pub use config::{ConfigBuilder, DaemonConfig};
pub use connection::{DaemonNotifier, DaemonSession, DaemonStream};
pub use error::{Error, Result};
pub use types::{Reply, Step};

/// Default daemon host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default daemon port.
pub const DEFAULT_PORT: u16 = 9876;

/// Name the client announces in the `helo` command.
pub const DEFAULT_CLIENT_NAME: &str = "roundcube";
