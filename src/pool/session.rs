//! TLS session tickets by hostname, for abbreviated handshakes.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::trace;
use rustls::client::{ClientSessionStore, Tls12ClientSessionValue, Tls13ClientSessionValue};
use rustls::pki_types::ServerName;
use rustls::NamedGroup;

#[derive(Default)]
struct SessionEntry {
    kx_hint: Option<NamedGroup>,
    tls12: Option<Tls12ClientSessionValue>,
    tls13: Option<Tls13ClientSessionValue>,
}

impl SessionEntry {
    fn has_session(&self) -> bool {
        self.tls12.is_some() || self.tls13.is_some()
    }
}

/// Session store handed to rustls.
///
/// Keeps at most one resumable session per hostname: storing a new one,
/// TLS 1.2 session or TLS 1.3 ticket, replaces whatever was there. The port
/// is not part of the key. rustls offers the stored session on the next
/// handshake with the same name and falls back to a full handshake if the
/// server rejects it.
pub struct TlsSessionCache {
    entries: Mutex<HashMap<ServerName<'static>, SessionEntry>>,
}

impl TlsSessionCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ServerName<'static>, SessionEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a resumable session is stored for `host`.
    pub fn has_session(&self, host: &str) -> bool {
        let Ok(name) = ServerName::try_from(host.to_string()) else {
            return false;
        };
        self.lock().get(&name).is_some_and(SessionEntry::has_session)
    }

    /// Number of hostnames with a resumable session.
    pub fn len(&self) -> usize {
        self.lock().values().filter(|e| e.has_session()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TlsSessionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TlsSessionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsSessionCache")
            .field("sessions", &self.len())
            .finish()
    }
}

impl ClientSessionStore for TlsSessionCache {
    fn set_kx_hint(&self, server_name: ServerName<'static>, group: NamedGroup) {
        self.lock().entry(server_name).or_default().kx_hint = Some(group);
    }

    fn kx_hint(&self, server_name: &ServerName<'_>) -> Option<NamedGroup> {
        self.lock()
            .get(&server_name.to_owned())
            .and_then(|e| e.kx_hint)
    }

    fn set_tls12_session(&self, server_name: ServerName<'static>, value: Tls12ClientSessionValue) {
        trace!("storing TLS 1.2 session for {server_name:?}");
        let mut entries = self.lock();
        let entry = entries.entry(server_name).or_default();
        entry.tls12 = Some(value);
        entry.tls13 = None;
    }

    fn tls12_session(&self, server_name: &ServerName<'_>) -> Option<Tls12ClientSessionValue> {
        self.lock()
            .get(&server_name.to_owned())
            .and_then(|e| e.tls12.clone())
    }

    fn remove_tls12_session(&self, server_name: &ServerName<'static>) {
        if let Some(entry) = self.lock().get_mut(server_name) {
            entry.tls12 = None;
        }
    }

    fn insert_tls13_ticket(&self, server_name: ServerName<'static>, value: Tls13ClientSessionValue) {
        trace!("storing TLS 1.3 ticket for {server_name:?}");
        let mut entries = self.lock();
        let entry = entries.entry(server_name).or_default();
        entry.tls13 = Some(value);
        entry.tls12 = None;
    }

    fn take_tls13_ticket(&self, server_name: &ServerName<'static>) -> Option<Tls13ClientSessionValue> {
        self.lock()
            .get_mut(server_name)
            .and_then(|e| e.tls13.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(host: &str) -> ServerName<'static> {
        ServerName::try_from(host.to_string()).unwrap()
    }

    #[test]
    fn test_empty_cache() {
        let cache = TlsSessionCache::new();
        assert!(cache.is_empty());
        assert!(!cache.has_session("example.com"));
        assert!(cache.kx_hint(&name("example.com")).is_none());
        assert!(cache.tls12_session(&name("example.com")).is_none());
        assert!(cache.take_tls13_ticket(&name("example.com")).is_none());
    }

    #[test]
    fn test_kx_hint_alone_is_not_a_session() {
        let cache = TlsSessionCache::new();
        cache.set_kx_hint(name("example.com"), NamedGroup::X25519);
        assert_eq!(cache.kx_hint(&name("example.com")), Some(NamedGroup::X25519));
        assert!(!cache.has_session("example.com"));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_invalid_hostname_has_no_session() {
        let cache = TlsSessionCache::new();
        assert!(!cache.has_session("not a hostname"));
    }

    #[test]
    fn test_debug_reports_count() {
        let cache = TlsSessionCache::new();
        assert_eq!(format!("{cache:?}"), "TlsSessionCache { sessions: 0 }");
    }
}
