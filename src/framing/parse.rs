//! Status line, header block and body decoding.

use log::{debug, trace};

use super::response::{BodyFraming, FramingError, HttpResponse, ParsedResponse, ResponseHead};
use crate::transport::{BufferedStream, ByteChannel};

/// Reads one complete response: status line, headers and body.
///
/// Malformed chunk-size lines and truncated bodies are tolerated: the body
/// collected so far is returned and the connection is reported non-reusable
/// if the stream died.
pub fn read_response<C: ByteChannel>(
    stream: &mut BufferedStream<'_, C>,
) -> Result<ParsedResponse, FramingError> {
    let head = read_head(stream)?;
    let framing = head.body_framing()?;

    let mut body = Vec::new();
    match framing {
        BodyFraming::ContentLength(len) => {
            let got = stream.read_exact(&mut body, len);
            if got < len {
                debug!("body truncated: expected {len} bytes, got {got}");
            }
        }
        BodyFraming::Chunked => read_chunked_body(stream, &mut body),
        BodyFraming::UntilClose => {
            // Writing into a Vec cannot fail.
            let _ = stream.read_to_file(&mut body);
        }
    }

    let reusable =
        !head.wants_close() && framing != BodyFraming::UntilClose && !stream.is_errored();
    trace!(
        "framed response: status={} framing={:?} body={} bytes reusable={}",
        head.status_code,
        framing,
        body.len(),
        reusable
    );

    Ok(ParsedResponse {
        response: HttpResponse {
            status_code: head.status_code,
            headers: head.headers,
            body,
        },
        framing,
        reusable,
    })
}

/// Reads the status line and the header block, leaving the stream positioned
/// at the first body byte.
pub fn read_head<C: ByteChannel>(
    stream: &mut BufferedStream<'_, C>,
) -> Result<ResponseHead, FramingError> {
    let status_line = stream.read_line();
    if status_line.is_empty() {
        return Err(FramingError::ConnectionClosed);
    }
    let status_code = parse_status_line(&status_line)?;

    let mut head = ResponseHead {
        status_code,
        ..Default::default()
    };
    loop {
        let line = stream.read_line();
        if is_blank(&line) {
            break;
        }
        if let Some((name, value)) = parse_header_line(&line) {
            head.headers.insert(name, value);
        }
    }
    Ok(head)
}

/// Decodes chunks until the zero-size chunk, appending their data to `body`.
fn read_chunked_body<C: ByteChannel>(stream: &mut BufferedStream<'_, C>, body: &mut Vec<u8>) {
    loop {
        let size_line = stream.read_line();
        let Some(size) = parse_chunk_size(&size_line) else {
            debug!(
                "stopping chunked decoding at malformed size line {:?}",
                String::from_utf8_lossy(&size_line)
            );
            return;
        };
        if size == 0 {
            // Trailer line after the last chunk.
            stream.read_line();
            return;
        }
        stream.read_exact(body, size);
        // CRLF closing the chunk data.
        stream.read_line();
    }
}

/// An empty read or a bare line terminator ends the header block.
fn is_blank(line: &[u8]) -> bool {
    line.is_empty() || line == b"\r\n" || line == b"\n"
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    while end > 0 && matches!(line[end - 1], b'\r' | b'\n') {
        end -= 1;
    }
    &line[..end]
}

/// Extracts the status code from `HTTP/<version> <code> [reason]`.
///
/// The version and reason phrase are not kept. Only the leading digits of
/// the code field count, so `HTTP/1.1 200OK` reads as 200.
pub(crate) fn parse_status_line(line: &[u8]) -> Result<u16, FramingError> {
    let text = String::from_utf8_lossy(trim_line_end(line));
    let malformed = || FramingError::MalformedStatusLine(text.to_string());

    let mut parts = text.split_whitespace();
    let version = parts.next().ok_or_else(malformed)?;
    let version = version.strip_prefix("HTTP/").ok_or_else(malformed)?;
    if version.is_empty() || !version.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(malformed());
    }
    parts
        .next()
        .map(|field| {
            let digits = field.bytes().take_while(u8::is_ascii_digit).count();
            &field[..digits]
        })
        .and_then(|code| code.parse::<u16>().ok())
        .filter(|code| (100..1000).contains(code))
        .ok_or_else(malformed)
}

/// Splits a header line at its first colon.
///
/// The name is lower-cased; the value loses one leading space and any
/// trailing CR/LF. Lines without a colon yield `None`.
pub(crate) fn parse_header_line(line: &[u8]) -> Option<(String, String)> {
    let colon = line.iter().position(|&b| b == b':')?;
    let name = String::from_utf8_lossy(&line[..colon]).to_ascii_lowercase();
    let value = &line[colon + 1..];
    let value = value.strip_prefix(b" ").unwrap_or(value);
    let value = String::from_utf8_lossy(trim_line_end(value)).into_owned();
    Some((name, value))
}

/// Parses the leading hexadecimal digits of a chunk-size line.
///
/// Chunk extensions after the digits are ignored. A line with no leading hex
/// digit (including an empty read) yields `None`.
pub(crate) fn parse_chunk_size(line: &[u8]) -> Option<u64> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim_start();
    let digits: String = text.chars().take_while(|c| c.is_ascii_hexdigit()).collect();
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(&digits, 16).ok()
}
