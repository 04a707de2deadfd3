//! URL splitting and redirect target resolution.

use url::Url;

use crate::config::{DEFAULT_HTTPS_PORT, DEFAULT_HTTP_PORT};

/// A URL split into the parts needed to open a connection and write a
/// request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Scheme as written, e.g. `https`
    pub protocol: String,
    pub host: String,
    /// Path plus query, always starting with `/`
    pub path: String,
    pub port: u16,
}

impl Target {
    pub fn is_https(&self) -> bool {
        self.protocol.eq_ignore_ascii_case("https")
    }

    fn default_port(&self) -> u16 {
        if self.is_https() {
            DEFAULT_HTTPS_PORT
        } else {
            DEFAULT_HTTP_PORT
        }
    }

    /// Value of the `Host` header: the host, plus the port if it is not the
    /// scheme's default.
    pub fn host_header(&self) -> String {
        if self.port == self.default_port() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Splits `url` at `://` and at the first `/`, `?` or `#` after the host.
///
/// The path defaults to `/` and the port to 443 for `https`, 80 otherwise;
/// an explicit `:port` overrides it. A fragment is never sent and is
/// dropped. Returns `None` without a `://` separator, when the text before
/// it is not a scheme, with an empty host, or with an unparsable port.
pub fn parse_url(url: &str) -> Option<Target> {
    let (protocol, rest) = url.split_once("://")?;
    if !is_scheme(protocol) {
        return None;
    }

    let authority_end = rest
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(authority_end);

    let tail = tail.split('#').next().unwrap_or_default();
    let path = match tail {
        "" => "/".to_string(),
        t if t.starts_with('/') => t.to_string(),
        t => format!("/{t}"),
    };

    let mut target = Target {
        protocol: protocol.to_string(),
        host: authority.to_string(),
        path,
        port: 0,
    };
    target.port = target.default_port();

    if let Some((host, port)) = authority.rsplit_once(':') {
        if !port.is_empty() {
            target.port = port.parse().ok()?;
        }
        target.host = host.to_string();
    }
    if target.host.is_empty() {
        return None;
    }
    Some(target)
}

/// Resolves a `Location` header value against the URL that produced it.
///
/// Values that start with `scheme://` are used as-is; anything else, including
/// a path whose query embeds a URL, is joined onto `current`, so `/next` replaces the path and `next`
/// replaces the last path segment.
pub fn resolve_location(current: &str, location: &str) -> Option<String> {
    let absolute = location
        .split_once("://")
        .is_some_and(|(scheme, _)| is_scheme(scheme));
    if absolute {
        return Some(location.to_string());
    }
    Url::parse(current)
        .and_then(|base| base.join(location))
        .map(String::from)
        .ok()
}

/// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
fn is_scheme(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
