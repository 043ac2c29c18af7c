//! Validation of submitted changes.

/// Reason a submitted change was rejected before it was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Autoresponder enabled without a message.
    EmptyMessage,
    /// New password is empty.
    EmptyPassword,
    /// New password and confirmation differ.
    PasswordMismatch,
    /// New password is shorter than the policy allows.
    PasswordTooShort {
        /// Required number of characters.
        minimum: usize,
    },
    /// Current password does not match the session.
    IncorrectCurrentPassword,
    /// New password equals the current one.
    SamePassword,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "An autoresponder message is required",
            Self::EmptyPassword => "Please enter a new password",
            Self::PasswordMismatch => "Passwords do not match",
            Self::PasswordTooShort { .. } => "Password is too short",
            Self::IncorrectCurrentPassword => "Current password is incorrect",
            Self::SamePassword => "New password must differ from the current one",
        }
    }

    /// Returns the localization label shown to the user.
    #[must_use]
    pub const fn message_key(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "nomessage",
            Self::EmptyPassword => "nopassword",
            Self::PasswordMismatch => "passwordinconsistency",
            Self::PasswordTooShort { .. } => "passwordshort",
            Self::IncorrectCurrentPassword => "passwordincorrect",
            Self::SamePassword => "passwordsame",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PasswordTooShort { minimum } => {
                write!(f, "{} (minimum {minimum} characters)", self.message())
            }
            _ => f.write_str(self.message()),
        }
    }
}

impl std::error::Error for ValidationError {}
