//! Request composition and the single request/response cycle.

use std::io::{self, Write};

use log::debug;

use crate::client::HttpClient;
use crate::config::REQUEST_ATTEMPTS;
use crate::error_handling::FetchError;
use crate::fetch::url::Target;
use crate::framing::{read_response, HttpResponse};
use crate::pool::Connection;
use crate::transport::BufferedStream;
use crate::user_agent::random_user_agent;

/// Value of the `Connection` request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    KeepAlive,
    Close,
}

impl ConnectionMode {
    fn as_str(self) -> &'static str {
        match self {
            ConnectionMode::KeepAlive => "keep-alive",
            ConnectionMode::Close => "close",
        }
    }
}

/// Builds the bytes of a `GET` request for `target`.
pub fn build_request(target: &Target, user_agent: &str, mode: ConnectionMode) -> String {
    format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nUser-Agent: {}\r\nConnection: {}\r\n\r\n",
        target.path,
        target.host_header(),
        user_agent,
        mode.as_str()
    )
}

pub(crate) fn send_request(conn: &mut Connection, request: &str) -> io::Result<()> {
    conn.write_all(request.as_bytes())?;
    conn.flush()
}

impl HttpClient {
    /// One request/response cycle for `target`, retried once on a fresh
    /// connection if the first one turns out to be dead.
    pub(crate) fn perform_request(&mut self, target: &Target) -> Result<HttpResponse, FetchError> {
        let mut attempt = 1;
        loop {
            match self.attempt_request(target) {
                Err(e) if e.is_retriable() && attempt < REQUEST_ATTEMPTS => {
                    debug!(
                        "[http] Attempt {attempt} to {} failed ({e}), retrying on a new connection",
                        target.host
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    fn attempt_request(&mut self, target: &Target) -> Result<HttpResponse, FetchError> {
        let mut conn = self
            .pool
            .checkout(&target.host, target.port, target.is_https())?;
        let request = build_request(
            target,
            random_user_agent(&self.config.user_agents),
            ConnectionMode::KeepAlive,
        );

        if let Err(source) = send_request(&mut conn, &request) {
            conn.close();
            return Err(FetchError::Send {
                host: target.host.clone(),
                source,
            });
        }

        let parsed = {
            let mut stream = BufferedStream::new(&mut conn);
            read_response(&mut stream)
        };
        match parsed {
            Ok(parsed) => {
                if parsed.reusable {
                    self.pool.checkin(conn);
                } else {
                    conn.close();
                }
                Ok(parsed.response)
            }
            Err(e) => {
                conn.close();
                Err(e.into())
            }
        }
    }
}
