//! Response types produced by the framer.

use std::collections::HashMap;

use thiserror::Error;

/// A fully read HTTP response.
///
/// Header names are lower-cased; when a header repeats, the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Looks up a header by its lower-case name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Whether the status is in the redirect range (300-399).
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status_code)
    }

    /// The `location` header, if any.
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }
}

/// Status line and header block, without a body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
}

impl ResponseHead {
    /// `connection` header asks the peer to close after this response.
    pub fn wants_close(&self) -> bool {
        self.headers
            .get("connection")
            .is_some_and(|v| v.to_ascii_lowercase().contains("close"))
    }

    /// Picks the body-delimiting strategy, in strict precedence order:
    /// content-length, then chunked transfer encoding, then read-until-close.
    pub fn body_framing(&self) -> Result<BodyFraming, FramingError> {
        if let Some(raw) = self.headers.get("content-length") {
            return raw
                .trim()
                .parse::<u64>()
                .map(BodyFraming::ContentLength)
                .map_err(|_| FramingError::InvalidContentLength(raw.clone()));
        }
        let chunked = self
            .headers
            .get("transfer-encoding")
            .is_some_and(|v| v.to_ascii_lowercase().contains("chunked"));
        Ok(if chunked {
            BodyFraming::Chunked
        } else {
            BodyFraming::UntilClose
        })
    }
}

/// How the end of a response body is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFraming {
    /// Exactly this many bytes follow the header block.
    ContentLength(u64),
    /// Hex-size-prefixed chunks ending with a zero-size chunk.
    Chunked,
    /// Everything until the peer closes; the connection cannot be reused.
    UntilClose,
}

/// A response together with what it means for the connection it came from.
#[derive(Debug, Clone)]
pub struct ParsedResponse {
    pub response: HttpResponse,
    pub framing: BodyFraming,
    /// False when the peer asked to close, the body was close-delimited, or
    /// the stream died while reading.
    pub reusable: bool,
}

/// Framing failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FramingError {
    /// The stream ended before any status line arrived.
    #[error("connection closed before a status line was received")]
    ConnectionClosed,

    /// The first line is not `HTTP/<version> <code> [reason]`.
    #[error("malformed status line: {0:?}")]
    MalformedStatusLine(String),

    /// `content-length` is not a non-negative integer.
    #[error("invalid content-length: {0:?}")]
    InvalidContentLength(String),
}
