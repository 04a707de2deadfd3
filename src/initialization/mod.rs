//! Process-wide setup: logging, crypto provider, DNS resolver and TLS
//! client configuration.

mod logger;
mod resolver;
mod tls;

use rustls::crypto::{ring::default_provider, CryptoProvider};

pub use logger::init_logger_with;
pub use resolver::init_resolver;
pub use tls::init_tls_config;

/// Installs ring as the process-wide `rustls` crypto provider.
///
/// Must run before the first TLS connection if another provider could be
/// installed later. Calling it twice is harmless.
pub fn init_crypto_provider() {
    let _ = CryptoProvider::install_default(default_provider());
}
