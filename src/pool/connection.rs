//! A live TCP connection, optionally wrapped in TLS.

use std::fmt;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

use log::trace;
use rustls::{ClientConnection, HandshakeKind, StreamOwned};

use crate::transport::ByteChannel;

enum Transport {
    Plain(TcpStream),
    Tls(Box<StreamOwned<ClientConnection, TcpStream>>),
}

/// One connection to `host:port`.
///
/// Owned by the pool while idle and by the caller while a request is in
/// flight. Once closed it is never handed out again; the TLS close-notify is
/// sent and the socket shut down on `close()` or on drop.
pub struct Connection {
    transport: Transport,
    host: String,
    port: u16,
    closed: bool,
}

/// Pool key for a host and port. The host is used exactly as supplied.
pub fn pool_key(host: &str, port: u16) -> String {
    format!("{host}:{port}")
}

impl Connection {
    pub(crate) fn plain(stream: TcpStream, host: &str, port: u16) -> Self {
        Self {
            transport: Transport::Plain(stream),
            host: host.to_string(),
            port,
            closed: false,
        }
    }

    pub(crate) fn tls(
        stream: StreamOwned<ClientConnection, TcpStream>,
        host: &str,
        port: u16,
    ) -> Self {
        Self {
            transport: Transport::Tls(Box::new(stream)),
            host: host.to_string(),
            port,
            closed: false,
        }
    }

    pub fn key(&self) -> String {
        pool_key(&self.host, self.port)
    }

    pub fn is_tls(&self) -> bool {
        matches!(self.transport, Transport::Tls(_))
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// How the TLS handshake went: full or resumed. `None` for plain TCP.
    pub fn handshake_kind(&self) -> Option<HandshakeKind> {
        match &self.transport {
            Transport::Plain(_) => None,
            Transport::Tls(stream) => stream.conn.handshake_kind(),
        }
    }

    fn socket(&self) -> &TcpStream {
        match &self.transport {
            Transport::Plain(stream) => stream,
            Transport::Tls(stream) => &stream.sock,
        }
    }

    /// Non-blocking liveness probe.
    ///
    /// Peeks one byte without consuming it: end-of-stream or a socket error
    /// means the peer is gone; "would block" or pending data means the
    /// connection can be used.
    pub(crate) fn peer_has_closed(&self) -> bool {
        let socket = self.socket();
        if socket.set_nonblocking(true).is_err() {
            return true;
        }
        let mut probe = [0u8; 1];
        let gone = match socket.peek(&mut probe) {
            Ok(0) => true,
            Ok(_) => false,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => false,
            Err(_) => true,
        };
        socket.set_nonblocking(false).is_err() || gone
    }

    /// Releases the connection. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        trace!("closing connection to {}:{}", self.host, self.port);
        if let Transport::Tls(stream) = &mut self.transport {
            stream.conn.send_close_notify();
            while stream.conn.wants_write() {
                match stream.conn.write_tls(&mut stream.sock) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
            }
        }
        let _ = self.socket().shutdown(Shutdown::Both);
    }
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.closed {
            return Ok(0);
        }
        match &mut self.transport {
            Transport::Plain(stream) => stream.read(buf),
            Transport::Tls(stream) => stream.read(buf),
        }
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.closed {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "connection already closed",
            ));
        }
        match &mut self.transport {
            Transport::Plain(stream) => stream.write(buf),
            Transport::Tls(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.transport {
            Transport::Plain(stream) => stream.flush(),
            Transport::Tls(stream) => stream.flush(),
        }
    }
}

impl ByteChannel for Connection {
    fn mark_closed(&mut self) {
        self.close();
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("tls", &self.is_tls())
            .field("closed", &self.closed)
            .finish()
    }
}
