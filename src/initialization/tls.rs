//! TLS client configuration.

use std::sync::Arc;

use rustls::client::Resumption;
use rustls::crypto::{ring::default_provider, CryptoProvider};
use rustls::{ClientConfig, RootCertStore};

use crate::error_handling::InitializationError;
use crate::pool::TlsSessionCache;

/// Builds the shared client configuration.
///
/// Server certificates are verified against the Mozilla roots bundled by
/// `webpki-roots`, SNI is always sent, and resumable sessions are stored in
/// (and offered from) `sessions`.
///
/// Uses the process-wide crypto provider if one is installed, ring
/// otherwise.
pub fn init_tls_config(
    sessions: Arc<TlsSessionCache>,
) -> Result<Arc<ClientConfig>, InitializationError> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let provider = CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(default_provider()));

    let mut config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth();
    config.enable_sni = true;
    config.resumption = Resumption::store(sessions);

    Ok(Arc::new(config))
}
