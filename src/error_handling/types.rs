//! Error type definitions.
//!
//! This module defines the structured errors carried internally by the client
//! and the flat `ErrorType` categories they are counted under.

use std::io;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::framing::FramingError;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error building the TLS client configuration.
    #[error("TLS configuration error: {0}")]
    TlsConfigError(#[from] rustls::Error),

    /// Error initializing the DNS resolver.
    #[error("DNS resolver initialization error: {0}")]
    DnsResolverError(#[from] io::Error),

    /// The supplied configuration was rejected.
    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::config::ConfigValidationError),
}

/// Everything that can go wrong while fetching or downloading one URL.
///
/// The public API reports these as an empty result; the variant is kept for
/// logging and for the per-category counters in [`super::FetchStats`].
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL could not be split into protocol, host, path and port.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Downloads are only performed over HTTPS.
    #[error("refusing to download over plain HTTP: {0}")]
    InsecureDownload(String),

    /// The host has no IPv4 address or the lookup failed.
    #[error("failed to resolve {host}: {reason}")]
    Resolve { host: String, reason: String },

    /// TCP connect failed or timed out.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The TLS handshake (with SNI) failed.
    #[error("TLS handshake with {host} failed: {reason}")]
    TlsHandshake { host: String, reason: String },

    /// Writing the request failed on every attempt.
    #[error("failed to send request to {host}: {source}")]
    Send {
        host: String,
        #[source]
        source: io::Error,
    },

    /// The response could not be framed.
    #[error("malformed response: {0}")]
    Framing(#[from] FramingError),

    /// Every allowed cycle ended in a redirect.
    #[error("gave up after {0} redirect cycles")]
    TooManyRedirects(usize),

    /// A redirect status without a `Location` header.
    #[error("redirect status {0} without a location header")]
    MissingLocation(u16),

    /// A terminal status other than 200.
    #[error("unexpected status {0}")]
    UnexpectedStatus(u16),

    /// Local file I/O while writing a download.
    #[error("file I/O error: {0}")]
    Io(#[from] io::Error),
}

impl FetchError {
    /// Category this error is counted under.
    pub fn error_type(&self) -> ErrorType {
        match self {
            FetchError::InvalidUrl(_) => ErrorType::InvalidUrl,
            FetchError::InsecureDownload(_) => ErrorType::InsecureDownload,
            FetchError::Resolve { .. } => ErrorType::DnsResolutionError,
            FetchError::Connect { source, .. }
                if matches!(
                    source.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
                ) =>
            {
                ErrorType::ConnectTimeout
            }
            FetchError::Connect { .. } => ErrorType::ConnectError,
            FetchError::TlsHandshake { .. } => ErrorType::TlsHandshakeError,
            FetchError::Send { .. } => ErrorType::SendError,
            FetchError::Framing(_) => ErrorType::FramingError,
            FetchError::TooManyRedirects(_) => ErrorType::RedirectLimitExceeded,
            FetchError::MissingLocation(_) | FetchError::UnexpectedStatus(_) => {
                ErrorType::UnexpectedStatus
            }
            FetchError::Io(_) => ErrorType::FileError,
        }
    }

    /// Whether a fresh connection may succeed where this attempt failed.
    pub(crate) fn is_retriable(&self) -> bool {
        matches!(
            self,
            FetchError::Send { .. } | FetchError::Framing(FramingError::ConnectionClosed)
        )
    }
}

/// Flat failure categories, one counter each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    InvalidUrl,
    InsecureDownload,
    // Network errors
    DnsResolutionError,
    ConnectError,
    ConnectTimeout,
    TlsHandshakeError,
    SendError,
    // Protocol errors
    FramingError,
    RedirectLimitExceeded,
    UnexpectedStatus,
    // Local errors
    FileError,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::InvalidUrl => "Invalid URL",
            ErrorType::InsecureDownload => "Insecure download URL",
            ErrorType::DnsResolutionError => "DNS resolution error",
            ErrorType::ConnectError => "TCP connect error",
            ErrorType::ConnectTimeout => "TCP connect timeout",
            ErrorType::TlsHandshakeError => "TLS handshake error",
            ErrorType::SendError => "Request send error",
            ErrorType::FramingError => "Malformed response",
            ErrorType::RedirectLimitExceeded => "Too many redirects",
            ErrorType::UnexpectedStatus => "Unexpected HTTP status",
            ErrorType::FileError => "File I/O error",
        }
    }
}
