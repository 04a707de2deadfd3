//! Buffered transport over one live connection.
//!
//! This module provides:
//! - `ByteChannel`, the blocking byte source a stream reads from (a plain TCP
//!   socket or a TLS record layer, uniformly)
//! - `BufferedStream`, a fixed-capacity read-ahead buffer with line-oriented,
//!   exact-length and passthrough reads

mod buffered;

use std::io::Read;

pub use buffered::BufferedStream;

/// A blocking byte source that can be marked dead.
///
/// `BufferedStream` marks its channel closed the first time a read yields
/// end-of-stream or an error, so the pool never reuses it.
pub trait ByteChannel: Read {
    /// Flags the channel as no longer usable.
    fn mark_closed(&mut self);
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted in-memory channel for transport and framing tests.

    use std::io::{self, Read};

    use super::ByteChannel;

    /// Serves a fixed byte script, at most `max_read` bytes per `read` call,
    /// then reports end-of-stream.
    pub(crate) struct ScriptedChannel {
        data: Vec<u8>,
        offset: usize,
        max_read: usize,
        pub(crate) closed: bool,
        pub(crate) reads: usize,
    }

    impl ScriptedChannel {
        pub(crate) fn new(data: impl AsRef<[u8]>) -> Self {
            Self::chunked(data, usize::MAX)
        }

        /// Like `new`, but every read returns at most `max_read` bytes.
        pub(crate) fn chunked(data: impl AsRef<[u8]>, max_read: usize) -> Self {
            Self {
                data: data.as_ref().to_vec(),
                offset: 0,
                max_read,
                closed: false,
                reads: 0,
            }
        }

        /// Bytes not yet handed out.
        pub(crate) fn remaining(&self) -> usize {
            self.data.len() - self.offset
        }
    }

    impl Read for ScriptedChannel {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            let n = buf.len().min(self.max_read).min(self.remaining());
            buf[..n].copy_from_slice(&self.data[self.offset..self.offset + n]);
            self.offset += n;
            Ok(n)
        }
    }

    impl ByteChannel for ScriptedChannel {
        fn mark_closed(&mut self) {
            self.closed = true;
        }
    }

    /// A channel whose every read fails.
    pub(crate) struct BrokenChannel {
        pub(crate) closed: bool,
    }

    impl Read for BrokenChannel {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"))
        }
    }

    impl ByteChannel for BrokenChannel {
        fn mark_closed(&mut self) {
            self.closed = true;
        }
    }
}
