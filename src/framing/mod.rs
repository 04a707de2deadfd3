//! HTTP/1.1 response framing.
//!
//! Turns the raw bytes of a `BufferedStream` into an `HttpResponse` for one
//! request/response cycle. The body is delimited by, in order of precedence:
//! - a `content-length` header
//! - `transfer-encoding: chunked`
//! - the peer closing the connection (never reusable)
//!
//! A `connection: close` header makes the connection non-reusable whatever
//! the body framing.

mod parse;
mod response;

pub use parse::{read_head, read_response};
pub use response::{BodyFraming, FramingError, HttpResponse, ParsedResponse, ResponseHead};

#[cfg(test)]
mod tests;
