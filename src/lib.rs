//! pinoader library: a small persistent HTTP/1.1 client and the Pinterest
//! media scraping built on it.
//!
//! The client keeps one idle keep-alive connection per `host:port`, caches
//! DNS answers and TLS sessions for the life of the process, and frames
//! responses delimited by `content-length`, chunked encoding or connection
//! close. Everything is synchronous and single-threaded.
//!
//! # Example
//!
//! ```no_run
//! use pinoader::{Config, HttpClient};
//!
//! let mut client = HttpClient::new(Config::default())?;
//! let page = client.fetch("https://pin.it/example", 5);
//! if let Some(page) = page {
//!     if let Some(video) = pinoader::media::find_video_url(&page.text()) {
//!         client.download(video, "video.mp4");
//!     }
//! }
//! # Ok::<(), pinoader::InitializationError>(())
//! ```

pub mod app;
mod client;
pub mod config;
mod download;
mod error_handling;
pub mod fetch;
pub mod framing;
pub mod initialization;
pub mod media;
pub mod pool;
pub mod transport;
mod user_agent;

// Re-export public API
pub use app::{download_pin, run, DownloadReport};
pub use client::HttpClient;
pub use config::{Config, ConfigValidationError, LogFormat, LogLevel, Opt};
pub use error_handling::{ErrorType, FetchError, FetchStats, InitializationError};
pub use fetch::{parse_url, FetchedPage, Target};
pub use pool::{PoolStats, Resolve};
