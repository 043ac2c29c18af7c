//! Daemon command builder.

use crate::types::Step;

/// A command sent to the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `helo` - Identify the client
    Helo {
        /// Client name
        client: String,
    },
    /// `execute query` - Apply pending changes
    ExecuteQuery,
    /// `bye` - End the session
    Bye,
}

impl Command {
    /// Serializes the command to a `\n` terminated line.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        match self {
            Self::Helo { client } => {
                buf.extend_from_slice(b"helo ");
                buf.extend_from_slice(client.as_bytes());
            }
            Self::ExecuteQuery => buf.extend_from_slice(b"execute query"),
            Self::Bye => buf.extend_from_slice(b"bye"),
        }

        buf.push(b'\n');
        buf
    }

    /// Returns the session step this command belongs to.
    #[must_use]
    pub const fn step(&self) -> Step {
        match self {
            Self::Helo { .. } => Step::Hello,
            Self::ExecuteQuery => Step::Execute,
            Self::Bye => Step::Bye,
        }
    }
}
