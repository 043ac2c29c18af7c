//! Daemon reply types.

use std::fmt;

/// Status code the daemon uses to reject a request.
pub const REJECTED: &str = "999";

/// A reply line from the daemon.
///
/// Only the status token carries meaning. It is kept as text because the
/// daemon's success codes are never interpreted, only compared against
/// [`REJECTED`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Leading whitespace-delimited token.
    pub code: String,
    /// Remainder of the line.
    pub message: String,
}

impl Reply {
    /// Creates a new reply.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Returns true if the daemon rejected the request.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        self.code == REJECTED
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str(&self.code)
        } else {
            write!(f, "{} {}", self.code, self.message)
        }
    }
}
