//! TCP transport.
//!
//! A plain TCP connection to the chat server. Reads arrive as raw byte
//! chunks (framing happens in `petirc_proto::LineFramer`); outgoing lines
//! are terminated with CRLF on the wire.

use std::io;

use thiserror::Error;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};

/// Default server port.
pub const DEFAULT_PORT: u16 = 6667;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// I/O error from the socket.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The server closed the connection.
    #[error("connection closed by server")]
    Closed,
}

/// A connected TCP transport.
pub struct Transport {
    stream: TcpStream,
}

impl Transport {
    /// Connect to `host:port` and send the registration handshake for
    /// `nick`. Registration completes when the server replies with the
    /// welcome numeric; the caller tracks that in its session state.
    pub async fn connect(host: &str, port: u16, nick: &str) -> Result<Self, TransportError> {
        let stream = TcpStream::connect((host, port)).await?;
        tracing::info!(host, port, "connected");

        let mut transport = Self { stream };
        transport.send_line(&format!("NICK {nick}")).await?;
        transport.send_line(&format!("USER {nick} 0 * :{nick}")).await?;
        Ok(transport)
    }

    /// Read the next chunk of bytes from the server into `buf`.
    ///
    /// Returns [`TransportError::Closed`] on clean EOF so the caller can
    /// tear the session down the same way as on an I/O error.
    pub async fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let n = self.stream.read(buf).await?;
        if n == 0 {
            return Err(TransportError::Closed);
        }
        Ok(n)
    }

    /// Send one protocol line, appending the CRLF terminator.
    pub async fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        tracing::trace!(line, "send");
        self.stream.write_all(line.as_bytes()).await?;
        self.stream.write_all(b"\r\n").await?;
        self.stream.flush().await?;
        Ok(())
    }
}
