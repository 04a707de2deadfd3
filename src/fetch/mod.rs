//! Page fetching over pooled keep-alive connections.
//!
//! A fetch is a sequence of request/response cycles. Each cycle checks a
//! connection out of the pool, writes a `GET`, frames the response and
//! returns the connection if the response left it reusable. Redirects start
//! a new cycle against the resolved `location`.

mod redirects;
mod request;
mod url;

use std::borrow::Cow;

use crate::client::HttpClient;

pub use self::request::{build_request, ConnectionMode};
pub(crate) use self::request::send_request;
pub use self::url::{parse_url, resolve_location, Target};

/// Body of a successful fetch and the URL it was served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub body: Vec<u8>,
    /// Last URL requested, after redirects
    pub final_url: String,
}

impl FetchedPage {
    /// Body as text; invalid UTF-8 is replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

impl HttpClient {
    /// Fetches `url`, following redirects for at most `max_redirects`
    /// request cycles.
    ///
    /// Returns `None` on any failure; the cause is logged and counted in
    /// [`HttpClient::stats`].
    pub fn fetch(&mut self, url: &str, max_redirects: usize) -> Option<FetchedPage> {
        match self.try_fetch(url, max_redirects) {
            Ok(page) => Some(page),
            Err(e) => {
                self.record_failure(url, &e);
                None
            }
        }
    }

    /// [`HttpClient::fetch`] with the configured redirect limit.
    pub fn fetch_page(&mut self, url: &str) -> Option<FetchedPage> {
        let max_redirects = self.config.max_redirects;
        self.fetch(url, max_redirects)
    }
}
