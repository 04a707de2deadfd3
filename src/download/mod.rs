//! Streaming download path.
//!
//! Downloads use their own connection discipline: one `GET` with
//! `Connection: close`, the body streamed straight to disk until the peer
//! closes, and the connection always released afterwards.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::{debug, info};

use crate::client::HttpClient;
use crate::error_handling::FetchError;
use crate::fetch::{build_request, parse_url, send_request, ConnectionMode};
use crate::framing::read_head;
use crate::transport::{BufferedStream, ByteChannel};
use crate::user_agent::random_user_agent;

impl HttpClient {
    /// Downloads `url` into `destination`.
    ///
    /// Returns `false` on any failure; the cause is logged and counted in
    /// [`HttpClient::stats`]. Only `https` URLs are accepted.
    pub fn download(&mut self, url: &str, destination: impl AsRef<Path>) -> bool {
        match self.try_download(url, destination.as_ref()) {
            Ok(written) => {
                info!(
                    "Saved {} ({written} bytes)",
                    destination.as_ref().display()
                );
                true
            }
            Err(e) => {
                self.record_failure(url, &e);
                false
            }
        }
    }

    /// Downloads `url` into `destination` and returns the bytes written.
    ///
    /// # Errors
    ///
    /// Fails before any DNS or socket activity if `url` is not `https`.
    /// The destination is created only once a success status line has been
    /// read.
    pub fn try_download(&mut self, url: &str, destination: &Path) -> Result<u64, FetchError> {
        let target = parse_url(url).ok_or_else(|| FetchError::InvalidUrl(url.to_string()))?;
        if !target.is_https() {
            return Err(FetchError::InsecureDownload(url.to_string()));
        }

        debug!("[download] {url} -> {}", destination.display());
        let mut conn = self.pool.checkout(&target.host, target.port, true)?;
        let request = build_request(
            &target,
            random_user_agent(&self.config.user_agents),
            ConnectionMode::Close,
        );

        let result = match send_request(&mut conn, &request) {
            Ok(()) => receive_to_file(&mut conn, destination),
            Err(source) => Err(FetchError::Send {
                host: target.host.clone(),
                source,
            }),
        };
        conn.close();
        result
    }
}

/// Reads one response from `channel` and streams its body into a new file
/// at `destination`.
///
/// The status line and header block are consumed line by line; everything
/// after them, including bytes already buffered, goes to the file until the
/// peer closes.
pub(crate) fn receive_to_file<C: ByteChannel>(
    channel: &mut C,
    destination: &Path,
) -> Result<u64, FetchError> {
    let mut stream = BufferedStream::new(channel);
    let head = read_head(&mut stream)?;
    if !(200..300).contains(&head.status_code) {
        return Err(FetchError::UnexpectedStatus(head.status_code));
    }

    let mut file = BufWriter::new(File::create(destination)?);
    let written = stream.read_to_file(&mut file)?;
    debug!("[download] {written} bytes written to {}", destination.display());
    Ok(written)
}
