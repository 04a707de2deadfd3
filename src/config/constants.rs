//! Configuration constants.
//!
//! This module defines the tunables used throughout the client: socket
//! timeouts, buffer sizes, redirect and retry limits, and the User-Agent pool.

// Network operation timeouts
/// Connect, read and write timeout applied to every socket, in seconds.
/// A single blocking call never suspends longer than this.
pub const SOCKET_TIMEOUT_SECS: u64 = 10;
/// DNS query timeout in seconds
pub const DNS_TIMEOUT_SECS: u64 = 3;
/// Number of DNS query attempts before a lookup is reported as failed
pub const DNS_ATTEMPTS: usize = 2;

// Buffering
/// Capacity of the read-ahead buffer owned by each `BufferedStream`.
pub const READ_BUFFER_SIZE: usize = 16 * 1024;
/// Scratch buffer used by the passthrough (read-until-close) mode.
pub const STREAM_CHUNK_SIZE: usize = 16 * 1024;

// Redirect handling
/// Default number of request/response cycles a fetch may spend following redirects.
pub const MAX_REDIRECT_HOPS: usize = 5;

// Retry strategy
/// Tries per request cycle: the initial attempt plus one retry on a dead pooled connection.
pub const REQUEST_ATTEMPTS: usize = 2;

// Ports
pub const DEFAULT_HTTP_PORT: u16 = 80;
pub const DEFAULT_HTTPS_PORT: u16 = 443;

/// Browser User-Agent strings; one is chosen at random for every request.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/117.0",
];

// Output naming
/// Base filename used when no pin ID can be extracted from the page URL.
pub const FALLBACK_BASENAME: &str = "pinterest_video";
pub const VIDEO_EXTENSION: &str = "mp4";
pub const THUMBNAIL_EXTENSION: &str = "jpg";
