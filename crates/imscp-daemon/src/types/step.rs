//! Session steps.

use std::fmt;

/// A step of the notification session, in protocol order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    /// Reading the greeting sent on connect.
    Welcome,
    /// `helo` exchange.
    Hello,
    /// `execute query` exchange.
    Execute,
    /// `bye` exchange.
    Bye,
}

impl Step {
    /// All steps in the order they are performed.
    pub const ALL: [Self; 4] = [Self::Welcome, Self::Hello, Self::Execute, Self::Bye];

    /// Returns the lowercase step name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Hello => "hello",
            Self::Execute => "execute",
            Self::Bye => "bye",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order() {
        assert!(Step::Welcome < Step::Hello);
        assert!(Step::Hello < Step::Execute);
        assert!(Step::Execute < Step::Bye);
        let mut sorted = Step::ALL;
        sorted.sort();
        assert_eq!(sorted, Step::ALL);
    }

    #[test]
    fn test_display() {
        assert_eq!(Step::Welcome.to_string(), "welcome");
        assert_eq!(Step::Execute.to_string(), "execute");
    }
}
