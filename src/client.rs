//! The client context shared by fetches and downloads.

use std::sync::Arc;

use log::warn;

use crate::config::Config;
use crate::error_handling::{FetchError, FetchStats, InitializationError};
use crate::initialization::{init_resolver, init_tls_config};
use crate::pool::{ConnectionPool, DnsCache, Resolve, TlsSessionCache};

/// Persistent HTTP/1.1 client.
///
/// Owns the connection pool, the DNS and TLS session caches and the failure
/// counters. Every operation takes `&mut self`, so one client serves one
/// thread; all cached state is released when it is dropped.
///
/// # Examples
///
/// ```no_run
/// use pinoader::{Config, HttpClient};
///
/// let mut client = HttpClient::new(Config::default())?;
/// if let Some(page) = client.fetch("https://www.pinterest.com/pin/123/", 5) {
///     println!("{} bytes from {}", page.body.len(), page.final_url);
/// }
/// # Ok::<(), pinoader::InitializationError>(())
/// ```
pub struct HttpClient {
    pub(crate) config: Config,
    pub(crate) pool: ConnectionPool,
    stats: FetchStats,
}

impl HttpClient {
    /// Creates a client that resolves names with the system DNS configuration.
    ///
    /// # Errors
    ///
    /// Fails if `config` is invalid or the resolver or TLS configuration
    /// cannot be built.
    pub fn new(config: Config) -> Result<Self, InitializationError> {
        config.validate()?;
        let resolver = init_resolver()?;
        Self::with_resolver(config, Box::new(resolver))
    }

    /// Creates a client that resolves names through `resolver`.
    pub fn with_resolver(
        config: Config,
        resolver: Box<dyn Resolve>,
    ) -> Result<Self, InitializationError> {
        config.validate()?;
        let sessions = Arc::new(TlsSessionCache::new());
        let tls_config = init_tls_config(Arc::clone(&sessions))?;
        let pool = ConnectionPool::new(
            DnsCache::new(resolver),
            tls_config,
            sessions,
            config.timeout(),
        );
        Ok(Self {
            config,
            pool,
            stats: FetchStats::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Failure counters by category.
    pub fn stats(&self) -> &FetchStats {
        &self.stats
    }

    pub(crate) fn record_failure(&self, url: &str, error: &FetchError) {
        warn!("{url}: {error}");
        self.stats.increment_error(error.error_type());
    }
}
