//! Password change service.

use tracing::info;

use super::validation::ValidationError;
use super::{ChangeNotifier, SaveOutcome, notify_daemon};
use crate::Result;
use crate::mailbox::{MailSession, MailUserStore};
use crate::settings::PasswordPolicy;

/// A submitted password change form.
#[derive(Clone, Default)]
pub struct PasswordChange {
    /// Current password as entered by the user.
    pub current_password: String,
    /// New password.
    pub new_password: String,
    /// New password, repeated.
    pub confirm_password: String,
}

impl PasswordChange {
    /// Creates a password change.
    #[must_use]
    pub fn new(
        current_password: impl Into<String>,
        new_password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            current_password: current_password.into(),
            new_password: new_password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// Checks the change against the policy and the logged-in session.
    ///
    /// # Errors
    ///
    /// Returns the first rule the change violates.
    pub fn validate(
        &self,
        policy: &PasswordPolicy,
        session: &MailSession,
    ) -> std::result::Result<(), ValidationError> {
        if policy.confirm_current && self.current_password != session.password {
            return Err(ValidationError::IncorrectCurrentPassword);
        }
        if self.new_password.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        if self.new_password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.new_password.chars().count() < policy.minimum_length {
            return Err(ValidationError::PasswordTooShort {
                minimum: policy.minimum_length,
            });
        }
        if self.new_password == session.password {
            return Err(ValidationError::SamePassword);
        }
        Ok(())
    }
}

impl std::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordChange").finish_non_exhaustive()
    }
}

/// Changes mailbox passwords.
#[derive(Debug)]
pub struct PasswordService<S, N> {
    store: S,
    notifier: N,
    policy: PasswordPolicy,
}

impl<S, N> PasswordService<S, N>
where
    S: MailUserStore,
    N: ChangeNotifier,
{
    /// Creates a new service.
    pub const fn new(store: S, notifier: N, policy: PasswordPolicy) -> Self {
        Self {
            store,
            notifier,
            policy,
        }
    }

    /// Validates and stores a new password, then notifies the daemon.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] if the change is rejected, or a
    /// storage error if the password could not be saved. In both cases the
    /// daemon is not contacted.
    pub async fn change_password(
        &self,
        session: &MailSession,
        change: &PasswordChange,
    ) -> Result<SaveOutcome> {
        change.validate(&self.policy, session)?;

        self.store
            .update_password(&session.address, &change.new_password)
            .await?;
        info!(address = %session.address, "Password change saved");

        Ok(notify_daemon(&self.notifier).await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::mailbox::{MailAddress, MailStatus, MailUserRepository};
    use crate::service::testing::{RecordingNotifier, sqlite_pool};

    const OLD: &str = "old-password";
    const NEW: &str = "correct horse battery";

    fn session() -> MailSession {
        MailSession::new(MailAddress::parse("john@example.com").unwrap(), OLD)
    }

    async fn service(notifier: RecordingNotifier) -> PasswordService<MailUserRepository, RecordingNotifier> {
        let repo = MailUserRepository::in_memory().await.unwrap();
        sqlx::query("INSERT INTO mail_users (mail_addr, mail_pass) VALUES ('john@example.com', ?)")
            .bind(OLD)
            .execute(sqlite_pool(&repo))
            .await
            .unwrap();
        PasswordService::new(repo, notifier, PasswordPolicy::default())
    }

    #[test]
    fn test_validate_rules() {
        let policy = PasswordPolicy::default();
        let session = session();

        let cases = [
            (PasswordChange::new("wrong", NEW, NEW), ValidationError::IncorrectCurrentPassword),
            (PasswordChange::new(OLD, "", ""), ValidationError::EmptyPassword),
            (PasswordChange::new(OLD, NEW, "typo"), ValidationError::PasswordMismatch),
            (
                PasswordChange::new(OLD, "short", "short"),
                ValidationError::PasswordTooShort { minimum: 8 },
            ),
            (PasswordChange::new(OLD, OLD, OLD), ValidationError::SamePassword),
        ];

        for (change, expected) in cases {
            assert_eq!(change.validate(&policy, &session), Err(expected));
        }
        assert_eq!(PasswordChange::new(OLD, NEW, NEW).validate(&policy, &session), Ok(()));
    }

    #[test]
    fn test_validate_without_current_password() {
        let policy = PasswordPolicy {
            minimum_length: 0,
            confirm_current: false,
        };
        let change = PasswordChange::new("", "x", "x");
        assert_eq!(change.validate(&policy, &session()), Ok(()));
    }

    #[test]
    fn test_debug_hides_passwords() {
        let debug = format!("{:?}", PasswordChange::new(OLD, NEW, NEW));
        assert!(!debug.contains(OLD));
        assert!(!debug.contains(NEW));
    }

    #[tokio::test]
    async fn test_change_password_applied() {
        let service = service(RecordingNotifier::default()).await;
        let session = session();

        let outcome = service
            .change_password(&session, &PasswordChange::new(OLD, NEW, NEW))
            .await
            .unwrap();

        assert!(outcome.is_applied());
        assert_eq!(service.notifier.calls(), 1);
        assert_eq!(
            service.store.status(&session.address).await.unwrap(),
            MailStatus::ToChange
        );
    }

    #[tokio::test]
    async fn test_change_password_daemon_unreachable() {
        let service = service(RecordingNotifier::unreachable()).await;
        let session = session();

        let outcome = service
            .change_password(&session, &PasswordChange::new(OLD, NEW, NEW))
            .await
            .unwrap();

        assert!(matches!(outcome, SaveOutcome::Pending(_)));
        assert_eq!(outcome.message_key(), "connecterror");
        assert_eq!(
            service.store.status(&session.address).await.unwrap(),
            MailStatus::ToChange
        );
    }

    #[tokio::test]
    async fn test_invalid_change_is_not_saved() {
        let service = service(RecordingNotifier::default()).await;
        let session = session();

        let err = service
            .change_password(&session, &PasswordChange::new(OLD, NEW, "typo"))
            .await
            .unwrap_err();

        assert_eq!(err.message_key(), "passwordinconsistency");
        assert_eq!(service.notifier.calls(), 0);
        assert_eq!(service.store.status(&session.address).await.unwrap(), MailStatus::Ok);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_notified() {
        let service = service(RecordingNotifier::default()).await;
        let session = MailSession::new(MailAddress::parse("jane@example.com").unwrap(), OLD);

        let err = service
            .change_password(&session, &PasswordChange::new(OLD, NEW, NEW))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MailUserNotFound(_)));
        assert_eq!(err.message_key(), "internalerror");
        assert_eq!(service.notifier.calls(), 0);
    }
}
