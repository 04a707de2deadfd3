// Framing module tests.

use super::parse::{parse_chunk_size, parse_header_line, parse_status_line};
use super::*;
use crate::transport::testing::ScriptedChannel;
use crate::transport::BufferedStream;

fn frame(raw: &str) -> (Result<ParsedResponse, FramingError>, ScriptedChannel) {
    let mut channel = ScriptedChannel::chunked(raw, 5);
    let parsed = {
        let mut stream = BufferedStream::new(&mut channel);
        read_response(&mut stream)
    };
    (parsed, channel)
}

#[test]
fn test_parse_status_line_variants() {
    assert_eq!(parse_status_line(b"HTTP/1.1 200 OK\r\n"), Ok(200));
    assert_eq!(parse_status_line(b"HTTP/1.0 404 Not Found\n"), Ok(404));
    assert_eq!(parse_status_line(b"HTTP/1.1 301\r\n"), Ok(301));
    assert_eq!(parse_status_line(b"HTTP/2 204 No Content\r\n"), Ok(204));
    assert_eq!(parse_status_line(b"HTTP/1.1 200OK\r\n"), Ok(200));
}

#[test]
fn test_parse_status_line_rejects_garbage() {
    assert!(matches!(
        parse_status_line(b"SSH-2.0-OpenSSH\r\n"),
        Err(FramingError::MalformedStatusLine(_))
    ));
    assert!(parse_status_line(b"HTTP/1.1 abc OK\r\n").is_err());
    assert!(parse_status_line(b"HTTP/1.1\r\n").is_err());
    assert!(parse_status_line(b"HTTP/1.1 OK200\r\n").is_err());
    assert!(parse_status_line(b"HTTP/x.y 200 OK\r\n").is_err());
}

#[test]
fn test_parse_header_line() {
    assert_eq!(
        parse_header_line(b"Content-Type: text/html\r\n"),
        Some(("content-type".to_string(), "text/html".to_string()))
    );
    // Only the first colon splits.
    assert_eq!(
        parse_header_line(b"Location: https://example.com/a\n"),
        Some(("location".to_string(), "https://example.com/a".to_string()))
    );
    // No space after the colon.
    assert_eq!(
        parse_header_line(b"X-Count:7\r\n"),
        Some(("x-count".to_string(), "7".to_string()))
    );
    assert_eq!(parse_header_line(b"not a header\r\n"), None);
}

#[test]
fn test_parse_chunk_size() {
    assert_eq!(parse_chunk_size(b"1a\r\n"), Some(26));
    assert_eq!(parse_chunk_size(b"FF\r\n"), Some(255));
    assert_eq!(parse_chunk_size(b"0\r\n"), Some(0));
    assert_eq!(parse_chunk_size(b"10;name=value\r\n"), Some(16));
    assert_eq!(parse_chunk_size(b"zz\r\n"), None);
    assert_eq!(parse_chunk_size(b"\r\n"), None);
    assert_eq!(parse_chunk_size(b""), None);
}

#[test]
fn test_content_length_body_consumes_exactly_n_bytes() {
    let mut channel = ScriptedChannel::new(
        "HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhelloHTTP/1.1 200 OK\r\n",
    );
    let mut stream = BufferedStream::new(&mut channel);
    let parsed = read_response(&mut stream).unwrap();
    assert_eq!(parsed.response.status_code, 200);
    assert_eq!(parsed.response.body, b"hello");
    assert_eq!(parsed.framing, BodyFraming::ContentLength(5));
    assert!(parsed.reusable);
    // The next response is untouched.
    assert_eq!(stream.buffered(), b"HTTP/1.1 200 OK\r\n");
}

#[test]
fn test_chunked_body_concatenates_chunks() {
    let (parsed, channel) = frame(
        "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n\
         3\r\nabc\r\n5\r\ndefgh\r\n1\r\ni\r\n0\r\n\r\n",
    );
    let parsed = parsed.unwrap();
    assert_eq!(parsed.response.body, b"abcdefghi");
    assert_eq!(parsed.framing, BodyFraming::Chunked);
    assert!(parsed.reusable);
    assert_eq!(channel.remaining(), 0);
    assert!(!channel.closed);
}

#[test]
fn test_chunk_data_may_contain_crlf() {
    let (parsed, _) = frame(
        "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\na\r\nb\r\n0\r\n\r\n",
    );
    assert_eq!(parsed.unwrap().response.body, b"a\r\nb");
}

#[test]
fn test_malformed_chunk_size_keeps_partial_body() {
    let (parsed, _) = frame(
        "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n3\r\nabc\r\nzz\r\nmore\r\n",
    );
    let parsed = parsed.unwrap();
    assert_eq!(parsed.response.status_code, 200);
    assert_eq!(parsed.response.body, b"abc");
}

#[test]
fn test_content_length_wins_over_chunked() {
    let (parsed, _) = frame(
        "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nContent-Length: 4\r\n\r\n3\r\nabc\r\n0\r\n\r\n",
    );
    let parsed = parsed.unwrap();
    assert_eq!(parsed.framing, BodyFraming::ContentLength(4));
    assert_eq!(parsed.response.body, b"3\r\na");
}

#[test]
fn test_close_delimited_body_is_never_reusable() {
    let (parsed, channel) = frame("HTTP/1.1 200 OK\r\nConnection: keep-alive\r\n\r\nall of the rest");
    let parsed = parsed.unwrap();
    assert_eq!(parsed.framing, BodyFraming::UntilClose);
    // Bytes buffered behind the header block are kept.
    assert_eq!(parsed.response.body, b"all of the rest");
    assert!(!parsed.reusable);
    assert!(channel.closed);
}

#[test]
fn test_connection_close_header_disables_reuse() {
    let (parsed, _) = frame("HTTP/1.1 200 OK\r\nConnection: close\r\nContent-Length: 2\r\n\r\nok");
    let parsed = parsed.unwrap();
    assert_eq!(parsed.response.body, b"ok");
    assert!(!parsed.reusable);
}

#[test]
fn test_headers_lowercased_and_last_wins() {
    let (parsed, _) = frame(
        "HTTP/1.1 302 Found\r\nX-Trace: first\r\nx-trace: second\r\nLOCATION: /next\r\nContent-Length: 0\r\n\r\n",
    );
    let response = parsed.unwrap().response;
    assert_eq!(response.header("x-trace"), Some("second"));
    assert_eq!(response.location(), Some("/next"));
    assert!(response.is_redirect());
    assert!(response.body.is_empty());
}

#[test]
fn test_bare_newline_terminators() {
    let (parsed, _) = frame("HTTP/1.1 200 OK\nContent-Length: 3\n\nabc");
    let parsed = parsed.unwrap();
    assert_eq!(parsed.response.body, b"abc");
    assert_eq!(parsed.response.header("content-length"), Some("3"));
}

#[test]
fn test_truncated_content_length_body_is_not_reusable() {
    let (parsed, channel) = frame("HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nabc");
    let parsed = parsed.unwrap();
    assert_eq!(parsed.response.body, b"abc");
    assert!(!parsed.reusable);
    assert!(channel.closed);
}

#[test]
fn test_empty_stream_is_connection_closed() {
    let (parsed, channel) = frame("");
    assert_eq!(parsed.unwrap_err(), FramingError::ConnectionClosed);
    assert!(channel.closed);
}

#[test]
fn test_invalid_content_length() {
    let (parsed, _) = frame("HTTP/1.1 200 OK\r\nContent-Length: -1\r\n\r\n");
    assert!(matches!(
        parsed.unwrap_err(),
        FramingError::InvalidContentLength(v) if v == "-1"
    ));
}

#[test]
fn test_read_head_stops_at_body() {
    let mut channel = ScriptedChannel::new("HTTP/1.1 200 OK\r\nContent-Type: video/mp4\r\n\r\nBODY");
    let mut stream = BufferedStream::new(&mut channel);
    let head = read_head(&mut stream).unwrap();
    assert_eq!(head.status_code, 200);
    assert_eq!(head.headers.get("content-type").map(String::as_str), Some("video/mp4"));
    assert_eq!(stream.buffered(), b"BODY");
}
