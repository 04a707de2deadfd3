//! Download path checks that need no TLS peer.

mod helpers;

use std::sync::atomic::Ordering;

use helpers::{test_client, Reply, ScriptedServer};
use pinoader::ErrorType;
use tempfile::tempdir;

#[test]
fn test_plain_http_download_is_rejected_before_any_network_activity() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("video.mp4");
    let (mut client, lookups) = test_client();

    assert!(!client.download("http://v1.pinimg.com/videos/720p/a.mp4", &path));
    assert_eq!(lookups.load(Ordering::SeqCst), 0);
    assert_eq!(client.pool().stats().established, 0);
    assert!(client.pool().dns().is_empty());
    assert!(!path.exists());
    assert_eq!(client.stats().get_error_count(ErrorType::InsecureDownload), 1);
}

#[test]
fn test_unparsable_download_url() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("video.mp4");
    let (mut client, _) = test_client();

    assert!(!client.download("v1.pinimg.com/a.mp4", &path));
    assert_eq!(client.stats().get_error_count(ErrorType::InvalidUrl), 1);
    assert!(!path.exists());
}

#[test]
fn test_failed_handshake_leaves_no_file_and_no_pool_entry() {
    // A plain HTTP server on the other end cannot complete a TLS handshake.
    let server = ScriptedServer::start(vec![vec![Reply::Send(
        "HTTP/1.1 400 Bad Request\r\n\r\n",
    )]]);
    let dir = tempdir().unwrap();
    let path = dir.path().join("video.mp4");
    let (mut client, lookups) = test_client();

    let url = format!("https://media.test:{}/video.mp4", server.port);
    assert!(!client.download(&url, &path));
    assert_eq!(lookups.load(Ordering::SeqCst), 1);
    assert!(!path.exists());
    assert!(client.pool().is_empty());
    assert_eq!(client.stats().get_error_count(ErrorType::TlsHandshakeError), 1);
}
