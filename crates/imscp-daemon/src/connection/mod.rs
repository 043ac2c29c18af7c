//! Daemon connection handling.

mod notifier;
mod session;
mod stream;

pub use notifier::DaemonNotifier;
pub use session::DaemonSession;
pub use stream::{DaemonStream, MAX_LINE_LENGTH};
