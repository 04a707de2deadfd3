//! Connection pool and the caches that feed it.
//!
//! One idle connection is kept per `host:port`. A caller checks a connection
//! out for the duration of one request/response cycle and checks it back in
//! only if the response left it reusable; while it is checked out the pool
//! has no entry for that key. Before an idle connection is handed out it is
//! probed, and evicted if the peer has gone away.

mod connection;
mod dns;
mod session;

use std::collections::HashMap;
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, StreamOwned};

use crate::error_handling::FetchError;

pub use connection::{pool_key, Connection};
pub use dns::{DnsCache, Resolve};
pub use session::TlsSessionCache;

/// Connection reuse counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Idle connections handed out again.
    pub reused: usize,
    /// New TCP (and TLS) connections opened.
    pub established: usize,
    /// Idle connections found dead and dropped.
    pub evicted: usize,
}

pub struct ConnectionPool {
    idle: HashMap<String, Connection>,
    dns: DnsCache,
    tls_config: Arc<ClientConfig>,
    sessions: Arc<TlsSessionCache>,
    timeout: Duration,
    stats: PoolStats,
}

impl ConnectionPool {
    /// `sessions` must be the store installed in `tls_config` for
    /// `has_session` lookups to reflect real resumption state.
    pub fn new(
        dns: DnsCache,
        tls_config: Arc<ClientConfig>,
        sessions: Arc<TlsSessionCache>,
        timeout: Duration,
    ) -> Self {
        Self {
            idle: HashMap::new(),
            dns,
            tls_config,
            sessions,
            timeout,
            stats: PoolStats::default(),
        }
    }

    /// Returns a live connection to `host:port`.
    ///
    /// Reuses the idle connection for the key if the peer still holds it
    /// open, otherwise resolves the host, connects and (when `use_tls`)
    /// completes the handshake, offering any cached session for the host.
    pub fn checkout(
        &mut self,
        host: &str,
        port: u16,
        use_tls: bool,
    ) -> Result<Connection, FetchError> {
        let key = pool_key(host, port);
        if let Some(conn) = self.reclaim(&key, use_tls) {
            return Ok(conn);
        }
        let conn = self.establish(host, port, use_tls)?;
        self.stats.established += 1;
        Ok(conn)
    }

    fn reclaim(&mut self, key: &str, use_tls: bool) -> Option<Connection> {
        let mut conn = self.idle.remove(key)?;
        if conn.is_closed() || conn.is_tls() != use_tls || conn.peer_has_closed() {
            debug!("[pool] Evicting stale connection to {key}");
            conn.close();
            self.stats.evicted += 1;
            return None;
        }
        trace!("[pool] Reusing connection to {key}");
        self.stats.reused += 1;
        Some(conn)
    }

    fn establish(&mut self, host: &str, port: u16, use_tls: bool) -> Result<Connection, FetchError> {
        let ip = self.dns.resolve(host)?;
        let addr = SocketAddr::from((ip, port));
        let connect_err = |source| FetchError::Connect {
            addr: addr.to_string(),
            source,
        };

        debug!("[pool] Connecting to {host} ({addr})");
        let stream = TcpStream::connect_timeout(&addr, self.timeout).map_err(connect_err)?;
        stream.set_read_timeout(Some(self.timeout)).map_err(connect_err)?;
        stream.set_write_timeout(Some(self.timeout)).map_err(connect_err)?;
        stream.set_nodelay(true).map_err(connect_err)?;

        if !use_tls {
            return Ok(Connection::plain(stream, host, port));
        }
        self.handshake(stream, host, port)
    }

    fn handshake(&self, stream: TcpStream, host: &str, port: u16) -> Result<Connection, FetchError> {
        let tls_err = |reason: String| FetchError::TlsHandshake {
            host: host.to_string(),
            reason,
        };

        let server_name =
            ServerName::try_from(host.to_string()).map_err(|e| tls_err(e.to_string()))?;
        let offered = self.sessions.has_session(host);
        let conn = ClientConnection::new(Arc::clone(&self.tls_config), server_name)
            .map_err(|e| tls_err(e.to_string()))?;

        let mut tls = StreamOwned::new(conn, stream);
        while tls.conn.is_handshaking() {
            tls.conn
                .complete_io(&mut tls.sock)
                .map_err(|e| tls_err(e.to_string()))?;
        }
        let conn = Connection::tls(tls, host, port);
        debug!(
            "[tls] Handshake with {host} complete ({:?}, cached session offered: {offered})",
            conn.handshake_kind()
        );
        Ok(conn)
    }

    /// Returns a connection to the pool after a complete, reusable response.
    ///
    /// Closed connections are dropped. An idle connection already stored
    /// under the same key is released and replaced.
    pub fn checkin(&mut self, conn: Connection) {
        if conn.is_closed() {
            return;
        }
        let key = conn.key();
        trace!("[pool] Keeping connection to {key}");
        if let Some(mut previous) = self.idle.insert(key, conn) {
            previous.close();
        }
    }

    /// Whether an idle connection is stored for `host:port`.
    pub fn contains(&self, host: &str, port: u16) -> bool {
        self.idle.contains_key(&pool_key(host, port))
    }

    /// Number of idle connections.
    pub fn len(&self) -> usize {
        self.idle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idle.is_empty()
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    pub fn dns(&self) -> &DnsCache {
        &self.dns
    }

    pub fn sessions(&self) -> &TlsSessionCache {
        &self.sessions
    }

    /// Closes every idle connection.
    pub fn clear(&mut self) {
        for (_, mut conn) in self.idle.drain() {
            conn.close();
        }
    }
}
