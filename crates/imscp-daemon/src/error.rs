//! Error types for daemon notification.

use std::io;

use crate::types::Step;

/// Result type alias for daemon operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Daemon notification errors.
///
/// None of these affect the already persisted change: the row stays marked
/// for the daemon, only the immediate application is lost.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The daemon could not be reached.
    #[error("Could not connect to daemon at {addr}: {source}")]
    Connect {
        /// Target address (`host:port`).
        addr: String,
        /// Underlying error (refused, timed out, ...).
        #[source]
        source: io::Error,
    },

    /// The daemon answered with status `999`.
    #[error("Daemon rejected {step} step: {reply}")]
    Protocol {
        /// Step at which the rejection was received.
        step: Step,
        /// Raw reply line.
        reply: String,
    },

    /// Read or write failure in the middle of the session.
    #[error("I/O error during {step} step: {source}")]
    Io {
        /// Step that was in progress.
        step: Step,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The blocking wrapper could not start its runtime.
    #[error("Failed to start runtime: {0}")]
    Runtime(#[source] io::Error),
}

impl Error {
    /// Creates a protocol error for a rejected step.
    #[must_use]
    pub fn protocol(step: Step, reply: impl Into<String>) -> Self {
        Self::Protocol {
            step,
            reply: reply.into(),
        }
    }

    /// Creates an I/O error for a step.
    #[must_use]
    pub const fn io(step: Step, source: io::Error) -> Self {
        Self::Io { step, source }
    }

    /// Returns true if the daemon actively rejected the request.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Protocol { .. })
    }

    /// Returns true if the daemon could not be reached at all.
    #[must_use]
    pub const fn is_connect(&self) -> bool {
        matches!(self, Self::Connect { .. })
    }

    /// Returns true if the failure was caused by an expired timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Connect { source, .. } | Self::Io { source, .. } => {
                source.kind() == io::ErrorKind::TimedOut
            }
            Self::Protocol { .. } | Self::Runtime(_) => false,
        }
    }

    /// Returns the session step the error belongs to, if any.
    #[must_use]
    pub const fn step(&self) -> Option<Step> {
        match self {
            Self::Protocol { step, .. } | Self::Io { step, .. } => Some(*step),
            Self::Connect { .. } | Self::Runtime(_) => None,
        }
    }
}
