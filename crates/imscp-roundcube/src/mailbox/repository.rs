//! Mail user storage.

use std::future::Future;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::debug;

use super::model::{AutoresponderSettings, MailAddress, MailStatus};
use crate::settings::PluginSettings;
use crate::{Error, Result};

const MAX_CONNECTIONS: u32 = 5;

const UPDATE_PASSWORD: &str = "UPDATE mail_users SET mail_pass = ?, status = ? WHERE mail_addr = ?";

const UPDATE_AUTORESPONDER: &str = r"
    UPDATE mail_users SET mail_auto_respond = ?, mail_auto_respond_text = ?, status = ?
    WHERE mail_addr = ?
";

const SELECT_AUTORESPONDER_SQLITE: &str = r"
    SELECT mail_auto_respond, mail_auto_respond_text
    FROM mail_users
    WHERE mail_addr = ?
    LIMIT 1
";

// `mail_auto_respond` is a TINYINT(1) in the control panel schema.
const SELECT_AUTORESPONDER_MYSQL: &str = r"
    SELECT CAST(mail_auto_respond AS SIGNED), mail_auto_respond_text
    FROM mail_users
    WHERE mail_addr = ?
    LIMIT 1
";

const SELECT_STATUS: &str = "SELECT status FROM mail_users WHERE mail_addr = ? LIMIT 1";

/// Storage backend for the `mail_users` columns the plugins touch.
///
/// Every write marks the row for the daemon in the same statement, so a
/// successful write is always a pending change.
pub trait MailUserStore {
    /// Stores a new password and marks the row `tochange`.
    fn update_password(
        &self,
        address: &MailAddress,
        password: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Loads the autoresponder settings.
    fn load_autoresponder(
        &self,
        address: &MailAddress,
    ) -> impl Future<Output = Result<AutoresponderSettings>> + Send;

    /// Stores autoresponder settings and marks the row `change`.
    fn save_autoresponder(
        &self,
        address: &MailAddress,
        settings: &AutoresponderSettings,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Returns the current `status` value.
    fn status(&self, address: &MailAddress) -> impl Future<Output = Result<MailStatus>> + Send;
}

/// SQL backend selected from the database URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseKind {
    /// `sqlite:` URLs.
    Sqlite,
    /// `mysql://` URLs, the i-MSCP control panel database.
    MySql,
}

impl DatabaseKind {
    /// Selects the backend for a database URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for any other scheme.
    pub fn from_url(database_url: &str) -> Result<Self> {
        let scheme = database_url.split_once(':').map_or("", |(scheme, _)| scheme);
        match scheme.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "mysql" => Ok(Self::MySql),
            _ => Err(Error::Config(format!(
                "unsupported database URL scheme '{scheme}'"
            ))),
        }
    }

    /// Returns the scheme name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::MySql => "mysql",
        }
    }
}

/// Connection pool of one of the supported backends.
#[derive(Debug, Clone)]
pub enum DatabasePool {
    /// SQLite pool.
    Sqlite(SqlitePool),
    /// MySQL pool.
    MySql(MySqlPool),
}

impl DatabasePool {
    /// Returns the backend of this pool.
    #[must_use]
    pub const fn kind(&self) -> DatabaseKind {
        match self {
            Self::Sqlite(_) => DatabaseKind::Sqlite,
            Self::MySql(_) => DatabaseKind::MySql,
        }
    }
}

/// SQL implementation of [`MailUserStore`].
#[derive(Debug, Clone)]
pub struct MailUserRepository {
    pool: DatabasePool,
}

impl MailUserRepository {
    /// Connects to the database at the given URL.
    ///
    /// `mysql://` URLs use the MySQL driver, `sqlite:` URLs the SQLite one.
    /// The `mail_users` table is owned by the control panel and must exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unsupported URL scheme, or an error
    /// if the database connection fails.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = match DatabaseKind::from_url(database_url)? {
            DatabaseKind::Sqlite => DatabasePool::Sqlite(
                SqlitePoolOptions::new()
                    .max_connections(MAX_CONNECTIONS)
                    .connect(database_url)
                    .await?,
            ),
            DatabaseKind::MySql => DatabasePool::MySql(
                MySqlPoolOptions::new()
                    .max_connections(MAX_CONNECTIONS)
                    .connect(database_url)
                    .await?,
            ),
        };
        debug!(backend = pool.kind().as_str(), "Connected to mail database");
        Ok(Self { pool })
    }

    /// Creates a pool that opens connections on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unsupported URL scheme, or an error
    /// if the URL cannot be parsed.
    pub fn connect_lazy(database_url: &str) -> Result<Self> {
        let pool = match DatabaseKind::from_url(database_url)? {
            DatabaseKind::Sqlite => DatabasePool::Sqlite(
                SqlitePoolOptions::new()
                    .max_connections(MAX_CONNECTIONS)
                    .connect_lazy(database_url)?,
            ),
            DatabaseKind::MySql => DatabasePool::MySql(
                MySqlPoolOptions::new()
                    .max_connections(MAX_CONNECTIONS)
                    .connect_lazy(database_url)?,
            ),
        };
        Ok(Self { pool })
    }

    /// Connects using the configured database URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no database URL is configured, or an
    /// error if the connection fails.
    pub async fn from_settings(settings: &PluginSettings) -> Result<Self> {
        let url = settings
            .database_url
            .as_deref()
            .ok_or_else(|| Error::Config("database_url is not set".into()))?;
        Self::connect(url).await
    }

    /// Create an in-memory repository for testing.
    ///
    /// Creates a `mail_users` table with only the columns used here.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS mail_users (
                mail_id INTEGER PRIMARY KEY AUTOINCREMENT,
                mail_addr TEXT NOT NULL UNIQUE,
                mail_pass TEXT NOT NULL DEFAULT '_no_',
                mail_auto_respond INTEGER NOT NULL DEFAULT 0,
                mail_auto_respond_text TEXT,
                status TEXT NOT NULL DEFAULT 'ok'
            )
            ",
        )
        .execute(&pool)
        .await?;

        Ok(Self {
            pool: DatabasePool::Sqlite(pool),
        })
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

impl MailUserStore for MailUserRepository {
    async fn update_password(&self, address: &MailAddress, password: &str) -> Result<()> {
        let rows_affected = match &self.pool {
            DatabasePool::Sqlite(pool) => sqlx::query(UPDATE_PASSWORD)
                .bind(password)
                .bind(MailStatus::ToChange.as_str())
                .bind(address.as_str())
                .execute(pool)
                .await?
                .rows_affected(),
            DatabasePool::MySql(pool) => sqlx::query(UPDATE_PASSWORD)
                .bind(password)
                .bind(MailStatus::ToChange.as_str())
                .bind(address.as_str())
                .execute(pool)
                .await?
                .rows_affected(),
        };

        expect_single_row(rows_affected, address)?;
        debug!(%address, "Stored new mail password");
        Ok(())
    }

    async fn load_autoresponder(&self, address: &MailAddress) -> Result<AutoresponderSettings> {
        let row: Option<(i64, Option<String>)> = match &self.pool {
            DatabasePool::Sqlite(pool) => {
                sqlx::query_as(SELECT_AUTORESPONDER_SQLITE)
                    .bind(address.as_str())
                    .fetch_optional(pool)
                    .await?
            }
            DatabasePool::MySql(pool) => {
                sqlx::query_as(SELECT_AUTORESPONDER_MYSQL)
                    .bind(address.as_str())
                    .fetch_optional(pool)
                    .await?
            }
        };
        let (enabled, message) =
            row.ok_or_else(|| Error::MailUserNotFound(address.to_string()))?;

        Ok(AutoresponderSettings {
            enabled: enabled == 1,
            message: message.unwrap_or_default(),
        })
    }

    async fn save_autoresponder(
        &self,
        address: &MailAddress,
        settings: &AutoresponderSettings,
    ) -> Result<()> {
        let enabled = i64::from(settings.enabled);
        let rows_affected = match &self.pool {
            DatabasePool::Sqlite(pool) => sqlx::query(UPDATE_AUTORESPONDER)
                .bind(enabled)
                .bind(&settings.message)
                .bind(MailStatus::Change.as_str())
                .bind(address.as_str())
                .execute(pool)
                .await?
                .rows_affected(),
            DatabasePool::MySql(pool) => sqlx::query(UPDATE_AUTORESPONDER)
                .bind(enabled)
                .bind(&settings.message)
                .bind(MailStatus::Change.as_str())
                .bind(address.as_str())
                .execute(pool)
                .await?
                .rows_affected(),
        };

        expect_single_row(rows_affected, address)?;
        debug!(%address, enabled = settings.enabled, "Stored autoresponder settings");
        Ok(())
    }

    async fn status(&self, address: &MailAddress) -> Result<MailStatus> {
        let status: Option<String> = match &self.pool {
            DatabasePool::Sqlite(pool) => {
                sqlx::query_scalar(SELECT_STATUS)
                    .bind(address.as_str())
                    .fetch_optional(pool)
                    .await?
            }
            DatabasePool::MySql(pool) => {
                sqlx::query_scalar(SELECT_STATUS)
                    .bind(address.as_str())
                    .fetch_optional(pool)
                    .await?
            }
        };
        let status = status.ok_or_else(|| Error::MailUserNotFound(address.to_string()))?;

        Ok(MailStatus::parse(&status))
    }
}

fn expect_single_row(rows_affected: u64, address: &MailAddress) -> Result<()> {
    if rows_affected == 1 {
        Ok(())
    } else {
        Err(Error::MailUserNotFound(address.to_string()))
    }
}
