//! Change services.
//!
//! Both services follow the same sequence: validate, write the change with a
//! pending status, notify the daemon. Only the first two steps can fail the
//! request; the notification result is reported through [`SaveOutcome`].

mod autoresponder;
mod password;
mod validation;

use std::future::Future;

use imscp_daemon::DaemonNotifier;
use tracing::warn;

pub use autoresponder::AutoresponderService;
pub use password::{PasswordChange, PasswordService};
pub use validation::ValidationError;

/// Something that tells the daemon to apply pending changes.
pub trait ChangeNotifier {
    /// Sends the notification.
    fn notify(&self) -> impl Future<Output = imscp_daemon::Result<()>> + Send;
}

impl ChangeNotifier for DaemonNotifier {
    fn notify(&self) -> impl Future<Output = imscp_daemon::Result<()>> + Send {
        Self::notify(self)
    }
}

/// Result of a saved change.
#[derive(Debug)]
pub enum SaveOutcome {
    /// Saved, and the daemon accepted it.
    Applied,
    /// Saved, but the daemon could not be notified. The row stays pending.
    Pending(imscp_daemon::Error),
}

impl SaveOutcome {
    /// Returns true if the daemon accepted the change.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// Returns the localization label shown to the user.
    #[must_use]
    pub const fn message_key(&self) -> &'static str {
        match self {
            Self::Applied => "successfullysaved",
            Self::Pending(_) => "connecterror",
        }
    }
}

async fn notify_daemon<N: ChangeNotifier>(notifier: &N) -> SaveOutcome {
    match notifier.notify().await {
        Ok(()) => SaveOutcome::Applied,
        Err(e) => {
            warn!(error = %e, "Change saved but daemon notification failed");
            SaveOutcome::Pending(e)
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use sqlx::sqlite::SqlitePool;

    use super::ChangeNotifier;
    use crate::mailbox::{DatabasePool, MailUserRepository};

    /// Returns the pool of an in-memory repository.
    pub fn sqlite_pool(repo: &MailUserRepository) -> &SqlitePool {
        let DatabasePool::Sqlite(pool) = repo.pool() else {
            panic!("in-memory repository is not SQLite");
        };
        pool
    }

    /// Notifier that records calls instead of connecting.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        calls: AtomicUsize,
        unreachable: bool,
    }

    impl RecordingNotifier {
        pub fn unreachable() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                unreachable: true,
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ChangeNotifier for RecordingNotifier {
        async fn notify(&self) -> imscp_daemon::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.unreachable {
                Err(imscp_daemon::Error::Connect {
                    addr: "127.0.0.1:9876".into(),
                    source: io::Error::from(io::ErrorKind::ConnectionRefused),
                })
            } else {
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::testing::RecordingNotifier;
    use super::*;

    #[tokio::test]
    async fn test_applied_outcome() {
        let notifier = RecordingNotifier::default();
        let outcome = notify_daemon(&notifier).await;
        assert!(outcome.is_applied());
        assert_eq!(outcome.message_key(), "successfullysaved");
        assert_eq!(notifier.calls(), 1);
    }

    #[tokio::test]
    async fn test_pending_outcome() {
        let notifier = RecordingNotifier::unreachable();
        let outcome = notify_daemon(&notifier).await;
        assert!(matches!(outcome, SaveOutcome::Pending(ref e) if e.is_connect()));
        assert_eq!(outcome.message_key(), "connecterror");
    }
}
