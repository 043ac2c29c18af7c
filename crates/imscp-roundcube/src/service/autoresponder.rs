//! Autoresponder service.

use tracing::info;

use super::validation::ValidationError;
use super::{ChangeNotifier, SaveOutcome, notify_daemon};
use crate::Result;
use crate::mailbox::{AutoresponderSettings, MailAddress, MailUserStore};

/// Loads and saves autoresponder settings.
#[derive(Debug)]
pub struct AutoresponderService<S, N> {
    store: S,
    notifier: N,
}

impl<S, N> AutoresponderService<S, N>
where
    S: MailUserStore,
    N: ChangeNotifier,
{
    /// Creates a new service.
    pub const fn new(store: S, notifier: N) -> Self {
        Self { store, notifier }
    }

    /// Loads the current settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the mail user does not exist or the query fails.
    pub async fn load(&self, address: &MailAddress) -> Result<AutoresponderSettings> {
        self.store.load_autoresponder(address).await
    }

    /// Stores new settings, then notifies the daemon.
    ///
    /// A disabled autoresponder keeps its message so it can be re-enabled
    /// later.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] if the autoresponder is enabled
    /// with a blank message, or a storage error if the settings could not be
    /// saved. In both cases the daemon is not contacted.
    pub async fn save(
        &self,
        address: &MailAddress,
        enabled: bool,
        message: &str,
    ) -> Result<SaveOutcome> {
        if enabled && message.trim().is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }

        let settings = AutoresponderSettings::new(enabled, message);
        self.store.save_autoresponder(address, &settings).await?;
        info!(%address, enabled, "Autoresponder settings saved");

        Ok(notify_daemon(&self.notifier).await)
    }
}
