//! Daemon reply parser.

use crate::types::Reply;

/// Parses a reply line.
///
/// The status code is the first whitespace-delimited token; the message is
/// the rest of the line with surrounding whitespace removed. Line terminators
/// are expected to be stripped already, but are tolerated. A blank line yields
/// an empty code, which is not a rejection.
#[must_use]
pub fn parse_reply(line: &str) -> Reply {
    let line = line.trim_start();
    match line.split_once(char::is_whitespace) {
        Some((code, rest)) => Reply::new(code, rest.trim()),
        None => Reply::new(line.trim_end(), ""),
    }
}

/// Returns true if the byte terminates a reply line.
#[must_use]
pub const fn is_line_terminator(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}
