//! DNS resolver initialization.

use std::time::Duration;

use log::debug;
use trust_dns_resolver::config::{LookupIpStrategy, ResolverConfig, ResolverOpts};
use trust_dns_resolver::{system_conf, Resolver};

use crate::config::{DNS_ATTEMPTS, DNS_TIMEOUT_SECS};
use crate::error_handling::InitializationError;

/// Builds the blocking resolver used to fill the DNS cache.
///
/// Reads the system configuration (`/etc/resolv.conf` on Unix) and falls
/// back to the library defaults if it cannot be read. Only A records are
/// queried, and lookups give up quickly on unresponsive servers.
///
/// # Errors
///
/// Returns `InitializationError::DnsResolverError` if the resolver's
/// runtime cannot be created.
pub fn init_resolver() -> Result<Resolver, InitializationError> {
    let (config, mut opts) = system_conf::read_system_conf().unwrap_or_else(|e| {
        debug!("[dns] System resolver configuration unavailable ({e}), using defaults");
        (ResolverConfig::default(), ResolverOpts::default())
    });

    opts.timeout = Duration::from_secs(DNS_TIMEOUT_SECS);
    opts.attempts = DNS_ATTEMPTS;
    opts.ip_strategy = LookupIpStrategy::Ipv4Only;

    Ok(Resolver::new(config, opts)?)
}
