//! Hostname → IPv4 cache.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};

use anyhow::{Error, Result};
use log::{debug, trace};

use crate::error_handling::FetchError;

/// Blocking IPv4 name resolution.
pub trait Resolve {
    /// Returns the first IPv4 address of `host`.
    fn lookup_ipv4(&self, host: &str) -> Result<Ipv4Addr>;
}

impl Resolve for trust_dns_resolver::Resolver {
    fn lookup_ipv4(&self, host: &str) -> Result<Ipv4Addr> {
        let response = self.lookup_ip(host).map_err(Error::new)?;
        response
            .iter()
            .find_map(|ip| match ip {
                IpAddr::V4(v4) => Some(v4),
                IpAddr::V6(_) => None,
            })
            .ok_or_else(|| Error::msg("No IPv4 addresses found"))
    }
}

/// Resolution results by hostname.
///
/// Entries are added on first lookup and never expire.
pub struct DnsCache {
    entries: HashMap<String, Ipv4Addr>,
    resolver: Box<dyn Resolve>,
}

impl DnsCache {
    pub fn new(resolver: Box<dyn Resolve>) -> Self {
        Self {
            entries: HashMap::new(),
            resolver,
        }
    }

    /// Returns the cached address of `host`, resolving it on a miss.
    ///
    /// IPv4 literals skip the resolver but are cached like any other name.
    pub fn resolve(&mut self, host: &str) -> Result<Ipv4Addr, FetchError> {
        if let Some(ip) = self.entries.get(host) {
            trace!("DNS cache hit: {host} -> {ip}");
            return Ok(*ip);
        }

        let ip = match host.parse::<Ipv4Addr>() {
            Ok(literal) => literal,
            Err(_) => self
                .resolver
                .lookup_ipv4(host)
                .map_err(|e| FetchError::Resolve {
                    host: host.to_string(),
                    reason: format!("{e:#}"),
                })?,
        };
        debug!("[dns] Resolved {host} -> {ip}");
        self.entries.insert(host.to_string(), ip);
        Ok(ip)
    }

    /// Cached address of `host`, without resolving.
    pub fn get(&self, host: &str) -> Option<Ipv4Addr> {
        self.entries.get(host).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
