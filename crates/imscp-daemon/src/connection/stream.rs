//! Line-oriented stream handling.

use std::future::Future;
use std::io;
use std::time::Duration;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::parser::is_line_terminator;

/// Longest reply line accepted from the daemon, terminator excluded.
pub const MAX_LINE_LENGTH: usize = 1024;

/// Buffered line stream over a daemon connection.
///
/// Reads are buffered up to the next `\r` or `\n`, and a `\n` directly after
/// a `\r` belongs to the same terminator. Writes are looped until the
/// whole line has been accepted by the transport. Every read and write is
/// bounded by the optional I/O timeout.
#[derive(Debug)]
pub struct DaemonStream<S> {
    inner: S,
    buf: BytesMut,
    io_timeout: Option<Duration>,
    skip_lf: bool,
}

impl<S> DaemonStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps a stream without any I/O timeout.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(MAX_LINE_LENGTH),
            io_timeout: None,
            skip_lf: false,
        }
    }

    /// Sets the timeout applied to each read and write.
    #[must_use]
    pub const fn with_io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// Reads the next line, without its terminator.
    ///
    /// A blank line is returned as an empty string.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedEof` if the peer closes before a full line,
    /// `InvalidData` if the line exceeds [`MAX_LINE_LENGTH`], `TimedOut` if
    /// the timeout expires, or any transport error.
    pub async fn read_line(&mut self) -> io::Result<String> {
        loop {
            if self.skip_lf && !self.buf.is_empty() {
                if self.buf[0] == b'\n' {
                    self.buf.advance(1);
                }
                self.skip_lf = false;
            }

            if !self.skip_lf {
                if let Some(pos) = self.buf.iter().position(|&b| is_line_terminator(b)) {
                    let line = self.buf.split_to(pos);
                    self.skip_lf = self.buf[0] == b'\r';
                    self.buf.advance(1);
                    return Ok(String::from_utf8_lossy(&line).into_owned());
                }

                if self.buf.len() > MAX_LINE_LENGTH {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("reply line exceeds {MAX_LINE_LENGTH} bytes"),
                    ));
                }
            }

            let read = with_timeout(self.io_timeout, self.inner.read_buf(&mut self.buf)).await?;
            if read == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed before end of line",
                ));
            }
        }
    }

    /// Writes a full line, continuing after partial writes.
    ///
    /// # Errors
    ///
    /// Returns `WriteZero` if the transport stops accepting data, `TimedOut`
    /// if the timeout expires, or any transport error.
    pub async fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        let mut offset = 0;
        while offset < line.len() {
            let written = with_timeout(self.io_timeout, self.inner.write(&line[offset..])).await?;
            if written == 0 {
                return Err(io::Error::from(io::ErrorKind::WriteZero));
            }
            offset += written;
            if offset < line.len() {
                tracing::trace!(written, remaining = line.len() - offset, "partial write");
            }
        }
        with_timeout(self.io_timeout, self.inner.flush()).await
    }

    /// Shuts down the write half of the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the shutdown fails or times out.
    pub async fn shutdown(&mut self) -> io::Result<()> {
        with_timeout(self.io_timeout, self.inner.shutdown()).await
    }
}

/// Runs an I/O future, failing with `TimedOut` once the timeout expires.
pub(crate) async fn with_timeout<F, T>(timeout: Option<Duration>, fut: F) -> io::Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| {
            io::Error::new(
                io::ErrorKind::TimedOut,
                format!("operation timed out after {limit:?}"),
            )
        })?,
        None => fut.await,
    }
}
