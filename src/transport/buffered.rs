//! Read-ahead buffering over a `ByteChannel`.

use std::io::{self, Read, Write};

use log::trace;

use super::ByteChannel;
use crate::config::{READ_BUFFER_SIZE, STREAM_CHUNK_SIZE};

/// Upper bound on the up-front reservation made by `read_exact`, so a bogus
/// length header cannot trigger a huge allocation before any byte arrives.
const MAX_RESERVE: usize = 1024 * 1024;

/// A transient reader over one connection.
///
/// Unread bytes live in `buffer[pos..end]`; `0 <= pos <= end <= capacity`
/// holds at all times. The first read that yields end-of-stream or an error
/// marks the channel closed and leaves the stream errored for good.
pub struct BufferedStream<'a, C: ByteChannel> {
    channel: &'a mut C,
    buffer: Box<[u8]>,
    pos: usize,
    end: usize,
    errored: bool,
}

impl<'a, C: ByteChannel> BufferedStream<'a, C> {
    pub fn new(channel: &'a mut C) -> Self {
        Self::with_capacity(channel, READ_BUFFER_SIZE)
    }

    pub fn with_capacity(channel: &'a mut C, capacity: usize) -> Self {
        Self {
            channel,
            buffer: vec![0u8; capacity.max(1)].into_boxed_slice(),
            pos: 0,
            end: 0,
            errored: false,
        }
    }

    /// Whether the underlying channel has hit end-of-stream or an error.
    pub fn is_errored(&self) -> bool {
        self.errored
    }

    /// Bytes read from the channel but not yet consumed.
    pub fn buffered(&self) -> &[u8] {
        &self.buffer[self.pos..self.end]
    }

    /// Compacts unread bytes to the start of the buffer, then issues one
    /// blocking read into the free tail.
    ///
    /// Returns the number of bytes read. Zero means the stream is errored.
    pub fn fill(&mut self) -> usize {
        if self.errored {
            return 0;
        }
        if self.pos < self.end {
            self.buffer.copy_within(self.pos..self.end, 0);
            self.end -= self.pos;
        } else {
            self.end = 0;
        }
        self.pos = 0;

        if self.end == self.buffer.len() {
            // Full buffer: nothing to read into, but the stream is still healthy.
            return 0;
        }

        loop {
            match self.channel.read(&mut self.buffer[self.end..]) {
                Ok(0) => {
                    trace!("channel reached end of stream");
                    self.fail();
                    return 0;
                }
                Ok(n) => {
                    self.end += n;
                    return n;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    trace!("channel read failed: {e}");
                    self.fail();
                    return 0;
                }
            }
        }
    }

    /// Returns the next line including its trailing `\n`.
    ///
    /// If the stream errors before a newline shows up, whatever was collected
    /// (possibly nothing) is returned.
    pub fn read_line(&mut self) -> Vec<u8> {
        let mut line = Vec::new();
        while !self.errored {
            if self.pos >= self.end && self.fill() == 0 {
                break;
            }
            let available = &self.buffer[self.pos..self.end];
            if let Some(i) = available.iter().position(|&b| b == b'\n') {
                line.extend_from_slice(&available[..=i]);
                self.pos += i + 1;
                return line;
            }
            line.extend_from_slice(available);
            self.pos = self.end;
        }
        line
    }

    /// Appends exactly `n` bytes to `out`, refilling as needed.
    ///
    /// Stops early only when the stream errors; the return value is the number
    /// of bytes actually appended, so callers can detect a short read.
    pub fn read_exact(&mut self, out: &mut Vec<u8>, n: u64) -> u64 {
        let wanted = usize::try_from(n).unwrap_or(usize::MAX);
        out.reserve(wanted.min(MAX_RESERVE));

        let mut remaining = n;
        while remaining > 0 && !self.errored {
            if self.pos >= self.end && self.fill() == 0 {
                break;
            }
            let available = self.end - self.pos;
            let to_copy = usize::try_from(remaining)
                .map(|r| r.min(available))
                .unwrap_or(available);
            out.extend_from_slice(&self.buffer[self.pos..self.pos + to_copy]);
            self.pos += to_copy;
            remaining -= to_copy as u64;
        }
        n - remaining
    }

    /// Streams the rest of the connection into `sink`.
    ///
    /// Already-buffered bytes are written first; after that raw reads go
    /// through a fixed scratch buffer straight to the sink until the channel
    /// reports end-of-stream. Returns the total number of bytes written.
    /// Only sink errors are reported; the channel ending is the normal exit.
    pub fn read_to_file<W: Write>(&mut self, sink: &mut W) -> io::Result<u64> {
        let mut written = 0u64;
        if self.pos < self.end {
            sink.write_all(&self.buffer[self.pos..self.end])?;
            written += (self.end - self.pos) as u64;
            self.pos = self.end;
        }

        let mut scratch = vec![0u8; STREAM_CHUNK_SIZE];
        while !self.errored {
            match self.channel.read(&mut scratch) {
                Ok(0) => self.fail(),
                Ok(n) => {
                    sink.write_all(&scratch[..n])?;
                    written += n as u64;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    trace!("passthrough read ended: {e}");
                    self.fail();
                }
            }
        }
        sink.flush()?;
        Ok(written)
    }

    fn fail(&mut self) {
        self.errored = true;
        self.channel.mark_closed();
    }
}
