//! Notification session state machine.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, warn};

use super::DaemonStream;
use crate::DEFAULT_CLIENT_NAME;
use crate::command::Command;
use crate::error::{Error, Result};
use crate::parser::parse_reply;
use crate::types::{Reply, Step};

/// One notification exchange over an established connection.
///
/// The session performs welcome, hello, execute and bye in that order and
/// stops at the first rejection or I/O failure. It is consumed by
/// [`run`](Self::run), which closes the stream once on every path.
#[derive(Debug)]
pub struct DaemonSession<S> {
    stream: DaemonStream<S>,
    client_name: String,
    step: Step,
    last_reply: Option<Reply>,
}

impl<S> DaemonSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a session over a connected stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream: DaemonStream::new(stream),
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            step: Step::Welcome,
            last_reply: None,
        }
    }

    /// Sets the name announced with `helo`.
    #[must_use]
    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into();
        self
    }

    /// Sets the timeout applied to each read and write.
    #[must_use]
    pub fn io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.stream = self.stream.with_io_timeout(timeout);
        self
    }

    /// Runs the full exchange and closes the connection.
    ///
    /// Returns the daemon's answer to `execute query`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the daemon answers `999` at any step and
    /// [`Error::Io`] if a read or write fails or times out.
    pub async fn run(mut self) -> Result<Reply> {
        let result = self.exchange_all().await;

        if let Err(e) = self.stream.shutdown().await {
            debug!(step = %self.step, error = %e, "Error closing daemon connection");
        }

        if let Err(e) = &result {
            warn!(step = %self.step, last_reply = ?self.last_reply, "Daemon session failed: {e}");
        }
        result
    }

    async fn exchange_all(&mut self) -> Result<Reply> {
        let welcome = self.read_reply().await?;
        debug!(code = %welcome.code, "Daemon welcome");

        let client = self.client_name.clone();
        self.send_command(Command::Helo { client }).await?;
        let executed = self.send_command(Command::ExecuteQuery).await?;
        self.send_command(Command::Bye).await?;

        Ok(executed)
    }

    async fn send_command(&mut self, cmd: Command) -> Result<Reply> {
        self.step = cmd.step();
        self.stream
            .write_line(&cmd.serialize())
            .await
            .map_err(|e| Error::io(self.step, e))?;
        self.read_reply().await
    }

    async fn read_reply(&mut self) -> Result<Reply> {
        let line = self
            .stream
            .read_line()
            .await
            .map_err(|e| Error::io(self.step, e))?;

        let reply = parse_reply(&line);
        if reply.is_rejection() {
            return Err(Error::protocol(self.step, line));
        }

        self.last_reply = Some(reply.clone());
        Ok(reply)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_full_exchange() {
        let mock = Builder::new()
            .read(b"200 hello\n")
            .write(b"helo roundcube\n")
            .read(b"200 helo-ack\n")
            .write(b"execute query\n")
            .read(b"200 executed\n")
            .write(b"bye\n")
            .read(b"200 bye\n")
            .build();

        let reply = DaemonSession::new(mock).run().await.unwrap();
        assert_eq!(reply, Reply::new("200", "executed"));
    }

    #[tokio::test]
    async fn test_welcome_rejected() {
        let mock = Builder::new().read(b"999 maintenance\n").build();

        let err = DaemonSession::new(mock).run().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol { step: Step::Welcome, ref reply } if reply == "999 maintenance"
        ));
    }

    #[tokio::test]
    async fn test_hello_rejected() {
        let mock = Builder::new()
            .read(b"200 hello\n")
            .write(b"helo roundcube\n")
            .read(b"999 busy\n")
            .build();

        let err = DaemonSession::new(mock).run().await.unwrap_err();
        assert_eq!(err.step(), Some(Step::Hello));
        assert!(err.is_rejection());
    }

    #[tokio::test]
    async fn test_execute_rejected() {
        let mock = Builder::new()
            .read(b"200 hello\n")
            .write(b"helo roundcube\n")
            .read(b"250 ok\n")
            .write(b"execute query\n")
            .read(b"999 query failed\n")
            .build();

        let err = DaemonSession::new(mock).run().await.unwrap_err();
        assert_eq!(err.step(), Some(Step::Execute));
    }

    #[tokio::test]
    async fn test_bye_rejected() {
        let mock = Builder::new()
            .read(b"200 hello\n")
            .write(b"helo roundcube\n")
            .read(b"250 ok\n")
            .write(b"execute query\n")
            .read(b"250 ok\n")
            .write(b"bye\n")
            .read(b"999 error\n")
            .build();

        let err = DaemonSession::new(mock).run().await.unwrap_err();
        assert_eq!(err.step(), Some(Step::Bye));
    }

    #[tokio::test]
    async fn test_custom_client_name() {
        let mock = Builder::new()
            .read(b"200 hello\n")
            .write(b"helo webmail\n")
            .read(b"250 ok\n")
            .write(b"execute query\n")
            .read(b"250 ok\n")
            .write(b"bye\n")
            .read(b"221 bye\n")
            .build();

        DaemonSession::new(mock)
            .client_name("webmail")
            .run()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_eof_is_io_error() {
        let mock = Builder::new()
            .read(b"200 hello\n")
            .write(b"helo roundcube\n")
            .build();

        let err = DaemonSession::new(mock).run().await.unwrap_err();
        match err {
            Error::Io { step, source } => {
                assert_eq!(step, Step::Hello);
                assert_eq!(source.kind(), std::io::ErrorKind::UnexpectedEof);
            }
            other => panic!("expected I/O error, got {other:?}"),
        }
    }
}
