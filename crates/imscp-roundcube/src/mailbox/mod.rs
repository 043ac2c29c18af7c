//! Mail user module.
//!
//! Provides the mail user model and the `mail_users` storage.

mod model;
mod repository;

pub use model::{AutoresponderSettings, MailAddress, MailSession, MailStatus};
pub use repository::{DatabaseKind, DatabasePool, MailUserRepository, MailUserStore};
